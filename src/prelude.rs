//! Prelude module that re-exports the commonly used types.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Core engine types
pub use crate::orderbook::{DEFAULT_TICK_SIZE, OrderBook, OrderBookError};

// Order model
pub use crate::orderbook::{Order, OrderCallback, OrderKind, Side};

// Results, trades and the audit trail
pub use crate::orderbook::{AuditRecord, OrderResult, OrderStatus, Trade, TradeListener};

// Identifiers
pub use crate::orderbook::{Id, IdPool};

// Market data snapshots
pub use crate::orderbook::{Depth, DepthLevel};

// Tick arithmetic
pub use crate::orderbook::{price_to_tick, tick_to_price, truncate_price};

// Utilities
pub use crate::{OrderId, UuidFactory, current_time_millis};
