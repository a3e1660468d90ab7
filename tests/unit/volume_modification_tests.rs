use matchbook::prelude::*;

#[test]
fn test_decrease_applies_in_place() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    let modified = book.modify_volume(placed.id, 2).unwrap();

    assert_eq!(modified.status, OrderStatus::Modified);
    assert_eq!(modified.message, "Volume decreased from 5 to 2");
    assert_eq!(modified.id, placed.id);
    assert_eq!(modified.resting_order.unwrap().volume(), 2);

    assert_eq!(book.volume_at(50.0), 2);
    assert_eq!(book.total_volume(), 2);

    // the decrease audits the new remaining volume
    assert_eq!(book.audit_log().len(), 1);
    assert_eq!(book.audit_log()[0].volume_delta, 2);
}

#[test]
fn test_same_volume_is_rejected_without_audit() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    let result = book.modify_volume(placed.id, 5).unwrap();

    assert_eq!(result.status, OrderStatus::Rejected);
    assert_eq!(result.message, "Volume unchanged");
    assert!(book.audit_log().is_empty());
    assert_eq!(book.volume_at(50.0), 5);
}

#[test]
fn test_increase_supersedes_with_a_new_identity() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    let original_stamp = placed.resting_order.as_ref().unwrap().timestamp();

    let modified = book.modify_volume(placed.id, 10).unwrap();

    assert_eq!(modified.status, OrderStatus::Modified);
    assert_eq!(
        modified.message,
        "Volume increased from 5 to 10. New ID generated."
    );
    assert_ne!(modified.id, placed.id);

    let resting = modified.resting_order.unwrap();
    assert_eq!(resting.volume(), 10);
    assert!(resting.timestamp() > original_stamp);

    // the level holds exactly one order, the replacement, at the tail
    let queue: Vec<Option<Id>> = book.bids_at(50.0).iter().map(|o| o.id()).collect();
    assert_eq!(queue, vec![Some(modified.id)]);

    // the cancel half of the supersede audits the old id
    assert_eq!(book.audit_log().len(), 1);
    assert_eq!(book.audit_log()[0].order_id, placed.id);
    assert!(book.audit_log()[0].is_removal());
}

#[test]
fn test_increase_can_rematch_on_readmission() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_buy(2, 50.0).unwrap())
        .unwrap();
    book.place_order(Order::limit_sell(5, 50.5).unwrap())
        .unwrap();

    // raising the bid's volume re-admits it; at 50.0 it still does not
    // cross the 50.5 ask, so it simply rests bigger
    let modified = book.modify_volume(placed.id, 8).unwrap();
    assert_eq!(modified.status, OrderStatus::Modified);
    assert!(modified.trades.is_empty());
    assert_eq!(book.volume_at(50.0), 8);
}

#[test]
fn test_zero_volume_fails_validation() {
    let mut book = OrderBook::default();

    let placed = book
        .place_order(Order::limit_buy(5, 50.0).unwrap())
        .unwrap();
    assert!(matches!(
        book.modify_volume(placed.id, 0),
        Err(OrderBookError::InvalidOrder { .. })
    ));
    assert_eq!(book.volume_at(50.0), 5);
}

#[test]
fn test_modify_unknown_order_fails() {
    let mut book = OrderBook::default();

    book.place_order(Order::limit_buy(1, 50.0).unwrap()).unwrap();
    let filled_buy = book
        .place_order(Order::limit_sell(1, 50.0).unwrap())
        .unwrap();

    assert!(matches!(
        book.modify_volume(filled_buy.id, 3),
        Err(OrderBookError::NotFound { .. })
    ));
}

#[test]
fn test_decrease_on_stop_order_stays_in_stop_book() {
    let mut book = OrderBook::default();

    let stop = book
        .place_order(Order::stop_buy(5, 55.0).unwrap())
        .unwrap();
    let modified = book.modify_volume(stop.id, 3).unwrap();

    assert_eq!(modified.status, OrderStatus::Modified);
    assert_eq!(modified.resting_order.unwrap().volume(), 3);
    // stop volume never counts toward the engine total
    assert_eq!(book.total_volume(), 0);
}
