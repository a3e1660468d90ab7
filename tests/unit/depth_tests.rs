use matchbook::prelude::*;

fn seeded_book() -> OrderBook {
    let mut book = OrderBook::default();
    book.place_order(Order::limit_buy(5, 50.0).unwrap()).unwrap();
    book.place_order(Order::limit_buy(3, 49.0).unwrap()).unwrap();
    book.place_order(Order::limit_buy(2, 48.0).unwrap()).unwrap();
    book.place_order(Order::limit_sell(4, 51.0).unwrap())
        .unwrap();
    book.place_order(Order::limit_sell(6, 52.0).unwrap())
        .unwrap();
    book
}

fn level(price: f64, volume: u64, order_count: usize) -> DepthLevel {
    DepthLevel {
        price,
        volume,
        order_count,
    }
}

#[test]
fn test_depth_returns_top_levels_each_side() {
    let book = seeded_book();
    let depth = book.depth(2);

    assert_eq!(depth.bids, vec![level(50.0, 5, 1), level(49.0, 3, 1)]);
    assert_eq!(depth.asks, vec![level(51.0, 4, 1), level(52.0, 6, 1)]);
    assert_eq!(depth.volume, 20);
    assert_eq!(depth.best_bid, 50.0);
    assert_eq!(depth.best_ask, 51.0);
    assert_eq!(depth.market_price, -1.0);
}

#[test]
fn test_depth_with_fewer_levels_than_requested() {
    let book = seeded_book();
    let depth = book.depth(10);

    assert_eq!(depth.bids.len(), 3);
    assert_eq!(depth.asks.len(), 2);
}

#[test]
fn test_depth_counts_orders_per_level() {
    let mut book = seeded_book();
    book.place_order(Order::limit_buy(1, 50.0).unwrap()).unwrap();

    let depth = book.depth(1);
    assert_eq!(depth.bids, vec![level(50.0, 6, 2)]);
}

#[test]
fn test_empty_book_uses_sentinels() {
    let book = OrderBook::default();
    let depth = book.depth(5);

    assert!(depth.bids.is_empty());
    assert!(depth.asks.is_empty());
    assert_eq!(depth.volume, 0);
    assert_eq!(depth.best_bid, -1.0);
    assert_eq!(depth.best_ask, -1.0);
    assert_eq!(depth.market_price, -1.0);
}

#[test]
fn test_depth_at_price_inside_the_bids() {
    let book = seeded_book();
    let depth = book.depth_at_price(49.0, 1);

    // bids start at the level at/below 49 and walk down; asks come from
    // the top of the book
    assert_eq!(depth.bids, vec![level(49.0, 3, 1)]);
    assert_eq!(depth.asks, vec![level(51.0, 4, 1)]);
}

#[test]
fn test_depth_at_price_inside_the_asks() {
    let book = seeded_book();
    let depth = book.depth_at_price(52.0, 1);

    assert_eq!(depth.asks, vec![level(52.0, 6, 1)]);
    assert_eq!(depth.bids, vec![level(50.0, 5, 1)]);
}

#[test]
fn test_depth_at_price_in_the_spread_matches_depth() {
    let book = seeded_book();
    assert_eq!(book.depth_at_price(50.5, 2), book.depth(2));
    assert_eq!(book.depth_at_price(50.0, 2), book.depth(2));
    assert_eq!(book.depth_at_price(51.0, 2), book.depth(2));
}

#[test]
fn test_depth_in_range_straddling_the_spread() {
    let book = seeded_book();
    let depth = book.depth_in_range(48.5, 51.5);

    assert_eq!(depth.bids, vec![level(50.0, 5, 1), level(49.0, 3, 1)]);
    assert_eq!(depth.asks, vec![level(51.0, 4, 1)]);
}

#[test]
fn test_depth_in_range_one_sided() {
    let book = seeded_book();

    let asks_only = book.depth_in_range(51.5, 52.5);
    assert!(asks_only.bids.is_empty());
    assert_eq!(asks_only.asks, vec![level(52.0, 6, 1)]);

    let bids_only = book.depth_in_range(47.0, 48.5);
    assert_eq!(bids_only.bids, vec![level(48.0, 2, 1)]);
    assert!(bids_only.asks.is_empty());
}

#[test]
fn test_volume_at_routes_by_side() {
    let book = seeded_book();

    assert_eq!(book.volume_at(50.0), 5);
    assert_eq!(book.volume_at(48.0), 2);
    assert_eq!(book.volume_at(51.0), 4);
    // unknown tick below the best bid
    assert_eq!(book.volume_at(47.0), 0);
    // a price in the spread belongs to neither side
    assert_eq!(book.volume_at(50.5), 0);
}

#[test]
fn test_orders_at_routes_by_side() {
    let book = seeded_book();

    assert_eq!(book.orders_at(50.0).len(), 1);
    assert_eq!(book.orders_at(51.0).len(), 1);
    assert!(book.orders_at(50.5).is_empty());
    assert!(book.orders_at(47.0).is_empty());
}

#[test]
fn test_depth_serializes_to_json() {
    let book = seeded_book();
    let json = serde_json::to_string(&book.depth(2)).unwrap();

    let parsed: Depth = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, book.depth(2));
}

#[test]
fn test_scalar_accessors_fail_before_initialisation() {
    let book = OrderBook::default();

    assert!(matches!(
        book.best_bid(),
        Err(OrderBookError::NotInitialized { .. })
    ));
    assert!(matches!(
        book.best_ask(),
        Err(OrderBookError::NotInitialized { .. })
    ));
    assert!(matches!(
        book.market_price(),
        Err(OrderBookError::NotInitialized { .. })
    ));
    assert!(matches!(
        book.spread(),
        Err(OrderBookError::NotInitialized { .. })
    ));
}
