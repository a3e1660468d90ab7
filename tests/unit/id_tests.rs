use matchbook::prelude::*;
use uuid::Uuid;

#[test]
fn test_pool_holds_order_and_trade_ids() {
    let mut book = OrderBook::default();

    let buy = book
        .place_order(Order::limit_buy(3, 50.0).unwrap())
        .unwrap();
    let sell = book
        .place_order(Order::limit_sell(3, 50.0).unwrap())
        .unwrap();

    // two order ids plus one trade id
    assert_eq!(book.id_pool().len(), 3);
    assert!(book.id_pool().contains(&buy.id));
    assert!(book.id_pool().contains(&sell.id));
    assert!(book.id_pool().contains(&sell.trades[0].id));
}

#[test]
fn test_ids_survive_fills() {
    let mut book = OrderBook::default();

    let buy = book
        .place_order(Order::limit_buy(3, 50.0).unwrap())
        .unwrap();
    book.place_order(Order::limit_sell(3, 50.0).unwrap())
        .unwrap();

    // the order no longer rests, but its identifier stays comparable
    assert!(book.id_pool().contains(&buy.id));
    assert!(matches!(
        book.order_by_id(buy.id),
        Err(OrderBookError::NotFound { .. })
    ));
    assert_eq!(book.trade_log()[0].buyer_id, buy.id);
}

#[test]
fn test_order_by_id_reflects_live_state() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_sell(5, 50.0).unwrap())
        .unwrap();
    book.place_order(Order::limit_buy(2, 50.0).unwrap()).unwrap();

    let live = book.order_by_id(placed.id).unwrap();
    assert_eq!(live.volume(), 3);
    assert_eq!(live.price(), Some(50.0));
}

#[test]
fn test_id_factory_makes_runs_reproducible() {
    let namespace = Uuid::new_v4();

    let mut run = || {
        let mut book =
            OrderBook::with_id_factory(DEFAULT_TICK_SIZE, UuidFactory::new(namespace));
        let a = book
            .place_order(Order::limit_buy(3, 50.0).unwrap())
            .unwrap();
        let b = book
            .place_order(Order::limit_sell(3, 50.0).unwrap())
            .unwrap();
        (a.id, b.id, b.trades[0].id)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_distinct_books_issue_distinct_ids() {
    let mut first = OrderBook::default();
    let mut second = OrderBook::default();

    let a = first
        .place_order(Order::limit_buy(1, 50.0).unwrap())
        .unwrap();
    let b = second
        .place_order(Order::limit_buy(1, 50.0).unwrap())
        .unwrap();

    assert_ne!(a.id, b.id);
}

#[test]
fn test_every_admission_grows_the_pool() {
    let mut book = OrderBook::default();

    book.place_order(Order::limit_buy(1, 50.0).unwrap()).unwrap();
    book.place_order(Order::stop_sell(1, 45.0).unwrap()).unwrap();
    book.place_order(Order::market_buy(1).unwrap()).unwrap();

    // rejected market orders keep their identifier too
    assert_eq!(book.id_pool().len(), 3);
}
