//! Trade events and listener types.

use super::ids::Id;
use super::order::Side;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single execution between a resting order and an aggressor.
///
/// Trades are immutable once generated. The engine keeps one copy in its
/// trade log and hands further copies to callbacks, listeners and
/// [`OrderResult`](super::OrderResult)s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Identifier of this trade, drawn from the same pool as order ids.
    pub id: Id,
    /// Identifier of the buy-side order.
    pub buyer_id: Id,
    /// Identifier of the sell-side order.
    pub seller_id: Id,
    /// Execution price. Always the resting order's price.
    pub price: f64,
    /// Executed volume.
    pub volume: u64,
    /// Millisecond stamp assigned at execution.
    pub timestamp: u64,
    /// The aggressor's side.
    pub taker: Side,
}

impl Trade {
    /// Identifier of the order on the maker (resting) side of this trade.
    #[must_use]
    pub fn maker_id(&self) -> Id {
        match self.taker {
            Side::Buy => self.seller_id,
            Side::Sell => self.buyer_id,
        }
    }

    /// Identifier of the order on the taker (aggressing) side.
    #[must_use]
    pub fn taker_id(&self) -> Id {
        match self.taker {
            Side::Buy => self.buyer_id,
            Side::Sell => self.seller_id,
        }
    }
}

/// Book-level listener invoked with every trade the engine emits, after the
/// per-order callbacks have run.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;
