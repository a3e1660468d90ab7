//! Order book error types.

use super::ids::Id;
use thiserror::Error;

/// Errors raised by the order book engine.
///
/// Only genuine failures are surfaced here. Business-level rejections — a
/// market order that finds no liquidity, a modification to the value an
/// order already has — come back inline as
/// [`OrderStatus::Rejected`](super::OrderStatus::Rejected) results with an
/// explanatory message, not as errors. A raised error leaves no partial
/// audit and no trades.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrderBookError {
    /// The order failed validation at construction or admission.
    #[error("invalid order: {message}")]
    InvalidOrder {
        /// What was wrong with the order.
        message: String,
    },

    /// The identifier is not in the pool or names no currently resting order.
    #[error("order not found: {id}")]
    NotFound {
        /// The identifier that failed to resolve.
        id: Id,
    },

    /// A market statistic was queried before any value exists for it.
    #[error("{what} is not initialized")]
    NotInitialized {
        /// Which statistic was queried (e.g. "best bid", "market price").
        what: &'static str,
    },

    /// A callback attempted to call back into the engine on the same stack.
    #[error("re-entrant call into the engine")]
    Reentrancy,
}

impl OrderBookError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        OrderBookError::InvalidOrder {
            message: message.into(),
        }
    }
}
