//! Depth snapshots and ranged market-data queries.

use super::book::OrderBook;
use super::level::PriceLevel;
use super::ticks::{price_to_tick, tick_to_price};
use serde::{Deserialize, Serialize};

/// Aggregate view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Displayed price (tick × tick size).
    pub price: f64,
    /// Total resting volume at the level.
    pub volume: u64,
    /// Number of orders queued at the level.
    pub order_count: usize,
}

/// Snapshot of the book: the requested levels of each side plus the
/// engine scalars.
///
/// The float scalars carry the −1.0 sentinel when the underlying value is
/// not initialised, where the accessors on [`OrderBook`] would fail with
/// [`crate::OrderBookError::NotInitialized`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    /// Bid levels, best (highest) first.
    pub bids: Vec<DepthLevel>,
    /// Ask levels, best (lowest) first.
    pub asks: Vec<DepthLevel>,
    /// Total resting volume across bids and asks.
    pub volume: u64,
    /// Best bid price, or −1.0 while the bid book is empty.
    pub best_bid: f64,
    /// Best ask price, or −1.0 while the ask book is empty.
    pub best_ask: f64,
    /// Last traded price, or −1.0 before the first trade.
    pub market_price: f64,
}

impl OrderBook {
    fn snapshot_level(&self, tick: i64, level: &PriceLevel) -> DepthLevel {
        DepthLevel {
            price: tick_to_price(tick, self.tick_size()),
            volume: level.volume,
            order_count: level.len(),
        }
    }

    fn assemble(&self, bids: Vec<DepthLevel>, asks: Vec<DepthLevel>) -> Depth {
        let tick_size = self.tick_size();
        Depth {
            bids,
            asks,
            volume: self.total_volume(),
            best_bid: self
                .best_bid_tick()
                .map_or(-1.0, |tick| tick_to_price(tick, tick_size)),
            best_ask: self
                .best_ask_tick()
                .map_or(-1.0, |tick| tick_to_price(tick, tick_size)),
            market_price: self
                .market_tick
                .map_or(-1.0, |tick| tick_to_price(tick, tick_size)),
        }
    }

    /// The top `levels` levels of each side (fewer when a side is
    /// shallower), plus the engine scalars.
    #[must_use]
    pub fn depth(&self, levels: usize) -> Depth {
        let bids = self
            .bids
            .iter()
            .rev()
            .take(levels)
            .map(|(&tick, level)| self.snapshot_level(tick, level))
            .collect();
        let asks = self
            .asks
            .iter()
            .take(levels)
            .map(|(&tick, level)| self.snapshot_level(tick, level))
            .collect();
        self.assemble(bids, asks)
    }

    /// Depth centred on a given price.
    ///
    /// When `price` sits strictly inside the bids, the bid side starts at
    /// the level at or below `price` and walks downward while the asks are
    /// the top `levels` from the best ask; symmetric for a price strictly
    /// inside the asks. For a price in the spread or at the best of either
    /// side this is identical to [`Self::depth`].
    #[must_use]
    pub fn depth_at_price(&self, price: f64, levels: usize) -> Depth {
        let tick = price_to_tick(price, self.tick_size());

        if self.best_bid_tick().is_some_and(|best| tick < best) {
            let bids = self
                .bids
                .range(..=tick)
                .rev()
                .take(levels)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            let asks = self
                .asks
                .iter()
                .take(levels)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            self.assemble(bids, asks)
        } else if self.best_ask_tick().is_some_and(|best| tick > best) {
            let asks = self
                .asks
                .range(tick..)
                .take(levels)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            let bids = self
                .bids
                .iter()
                .rev()
                .take(levels)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            self.assemble(bids, asks)
        } else {
            self.depth(levels)
        }
    }

    /// All levels whose displayed price falls in the inclusive range,
    /// split by side.
    ///
    /// When the whole range sits on one side of the spread, only that side
    /// is populated. When the range straddles the spread, the asks run
    /// from the best ask up to `max_price` and the bids from the best bid
    /// down to `min_price`.
    #[must_use]
    pub fn depth_in_range(&self, min_price: f64, max_price: f64) -> Depth {
        let tick_size = self.tick_size();
        let min_tick = price_to_tick(min_price, tick_size);
        let max_tick = price_to_tick(max_price, tick_size);

        if min_tick > max_tick {
            return self.assemble(Vec::new(), Vec::new());
        }

        if self.best_ask_tick().is_some_and(|best| min_tick >= best) {
            // whole range inside the asks
            let asks = self
                .asks
                .range(min_tick..=max_tick)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            self.assemble(Vec::new(), asks)
        } else if self.best_bid_tick().is_some_and(|best| max_tick <= best) {
            // whole range inside the bids
            let bids = self
                .bids
                .range(min_tick..=max_tick)
                .rev()
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            self.assemble(bids, Vec::new())
        } else {
            let asks = self
                .asks
                .range(..=max_tick)
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            let bids = self
                .bids
                .range(min_tick..)
                .rev()
                .map(|(&tick, level)| self.snapshot_level(tick, level))
                .collect();
            self.assemble(bids, asks)
        }
    }
}
