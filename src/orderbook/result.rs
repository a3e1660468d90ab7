//! Result records returned from public operations, and the audit trail.

use super::ids::Id;
use super::order::Order;
use super::trade::Trade;
use serde::{Deserialize, Serialize};

/// Terminal classification of one public mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order rested in a book without trading.
    Placed,
    /// The order was fully consumed by matching.
    Filled,
    /// The order traded but volume remained afterwards.
    PartiallyFilled,
    /// The request was declined inline (no state change beyond bookkeeping).
    Rejected,
    /// A modification was applied (in place or by supersede).
    Modified,
    /// The order was removed from its book.
    Cancelled,
}

/// The record returned from every public mutation.
///
/// Trades are owned copies. `resting_order` is an owned snapshot of the
/// order as it rests in the book at return time — absent when the order was
/// fully consumed, cancelled, or never rested. Callers who need the live
/// state later should go back through [`crate::OrderBook::order_by_id`].
#[derive(Debug, Clone)]
pub struct OrderResult {
    /// Identifier of the order this result is about. For a supersede this
    /// is the newly generated identifier.
    pub id: Id,
    /// What happened.
    pub status: OrderStatus,
    /// Trades produced during this call, in execution order.
    pub trades: Vec<Trade>,
    /// Snapshot of the order when volume rests after the call, or of the
    /// untouched order on an inline rejection. Absent after a fill, a
    /// cancel, or a market residual cancellation.
    pub resting_order: Option<Order>,
    /// Human-readable explanation.
    pub message: String,
}

impl OrderResult {
    /// Total volume executed across the trades of this result.
    #[must_use]
    pub fn executed_volume(&self) -> u64 {
        self.trades.iter().map(|t| t.volume).sum()
    }
}

/// One entry of the append-only audit log.
///
/// Written for every cancellation (including the cancel half of a
/// supersede) and every in-place volume decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The order the entry is about.
    pub order_id: Id,
    /// Millisecond stamp assigned when the entry was written.
    pub timestamp: u64,
    /// `-1` for full removal; otherwise the new remaining volume after a
    /// decrease.
    pub volume_delta: i64,
}

impl AuditRecord {
    /// True if this entry records a full removal rather than a decrease.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.volume_delta == -1
    }
}
