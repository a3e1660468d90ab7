use matchbook::prelude::*;

#[test]
fn test_same_tick_orders_fill_first_in_first_out() {
    let mut book = OrderBook::default();

    let first = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    let second = book
        .place_order(Order::limit_buy(10, 50.0).unwrap())
        .unwrap();
    let third = book
        .place_order(Order::limit_buy(2, 50.0).unwrap())
        .unwrap();

    let result = book
        .place_order(Order::limit_sell(10, 50.0).unwrap())
        .unwrap();

    // the first order fills whole, the second loses 5 of 10
    let fills: Vec<(f64, u64)> = result.trades.iter().map(|t| (t.price, t.volume)).collect();
    assert_eq!(fills, vec![(50.0, 5), (50.0, 5)]);
    assert_eq!(result.trades[0].buyer_id, first.id);
    assert_eq!(result.trades[1].buyer_id, second.id);

    // remaining queue: the second order (5 left) then the third (2)
    let remaining: Vec<(Option<Id>, u64)> = book
        .bids_at(50.0)
        .iter()
        .map(|o| (o.id(), o.volume()))
        .collect();
    assert_eq!(
        remaining,
        vec![(Some(second.id), 5), (Some(third.id), 2)]
    );
}

#[test]
fn test_admission_stamps_are_strictly_increasing() {
    let mut book = OrderBook::default();

    let a = book
        .place_order(Order::limit_buy(1, 50.0).unwrap())
        .unwrap();
    let b = book
        .place_order(Order::limit_buy(1, 50.0).unwrap())
        .unwrap();
    let c = book
        .place_order(Order::limit_buy(1, 50.0).unwrap())
        .unwrap();

    let ta = a.resting_order.unwrap().timestamp();
    let tb = b.resting_order.unwrap().timestamp();
    let tc = c.resting_order.unwrap().timestamp();
    assert!(ta < tb && tb < tc);
}

#[test]
fn test_in_place_decrease_keeps_queue_position() {
    let mut book = OrderBook::default();

    let first = book
        .place_order(Order::limit_sell(10, 50.0).unwrap())
        .unwrap();
    let second = book
        .place_order(Order::limit_sell(5, 50.0).unwrap())
        .unwrap();

    book.modify_volume(first.id, 2).unwrap();

    // the decreased order still fills first
    let result = book
        .place_order(Order::limit_buy(3, 50.0).unwrap())
        .unwrap();
    assert_eq!(result.trades[0].seller_id, first.id);
    assert_eq!(result.trades[0].volume, 2);
    assert_eq!(result.trades[1].seller_id, second.id);
    assert_eq!(result.trades[1].volume, 1);
}

#[test]
fn test_supersede_loses_time_priority() {
    let mut book = OrderBook::default();

    let first = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    let second = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();

    // increasing the first order's volume sends it to the tail
    let superseded = book.modify_volume(first.id, 6).unwrap();

    let queue: Vec<Option<Id>> = book.bids_at(50.0).iter().map(|o| o.id()).collect();
    assert_eq!(queue, vec![Some(second.id), Some(superseded.id)]);
}
