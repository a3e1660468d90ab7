//! # Matchbook
//!
//! A single-instrument, single-venue limit-order-book matching engine with
//! strict price-time priority.
//!
//! The engine ingests limit, market, stop and stop-limit orders, matches
//! them against resting liquidity, arms and triggers contingent orders as
//! the market price moves, and reports every outcome as a structured
//! result record alongside an immutable trade log and an append-only audit
//! trail.
//!
//! ## Key features
//!
//! - **Price-time priority matching**: opposite-side levels are walked
//!   best-first; within a level, orders fill in arrival order and
//!   executions always happen at the resting side's price.
//! - **Tick-indexed books**: all internal price keys are integer ticks
//!   derived once at admission, so float prices never drift through the
//!   book. Lookup is O(log P) in the number of levels.
//! - **O(1) order mutation**: every resting order lives in an arena slot
//!   addressed through a per-identifier location index; cancels and
//!   in-place volume decreases never scan a level.
//! - **Stop dispatch**: stop and stop-limit orders rest in their own books
//!   and convert to market/limit orders the moment the market price
//!   crosses their trigger, cascading until the stop books are quiescent.
//! - **Synchronous callbacks**: per-order callbacks and an optional
//!   book-level listener are invoked inside the matching loop with a copy
//!   of each trade.
//!
//! ## Concurrency
//!
//! The engine is a single-threaded data structure: every mutation takes
//! `&mut self` and there is no internal synchronisation. Callers that need
//! concurrent access should wrap the book in external mutual exclusion.
//!
//! ## Example
//!
//! ```rust
//! use matchbook::{Order, OrderBook, OrderStatus};
//!
//! let mut book = OrderBook::default();
//!
//! let bid = Order::limit_buy(3, 50.0).unwrap();
//! let placed = book.place_order(bid).unwrap();
//! assert_eq!(placed.status, OrderStatus::Placed);
//! assert_eq!(book.best_bid().unwrap(), 50.0);
//!
//! let ask = Order::limit_sell(3, 50.0).unwrap();
//! let filled = book.place_order(ask).unwrap();
//! assert_eq!(filled.status, OrderStatus::Filled);
//! assert_eq!(filled.trades.len(), 1);
//! assert_eq!(book.market_price().unwrap(), 50.0);
//! ```

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::{
    AuditRecord, DEFAULT_TICK_SIZE, Depth, DepthLevel, Id, IdPool, Order, OrderBook,
    OrderBookError, OrderCallback, OrderKind, OrderResult, OrderStatus, Side, Trade,
    TradeListener, price_to_tick, tick_to_price, truncate_price,
};
pub use utils::{UuidFactory, current_time_millis};

/// Alias for [`Id`] for code that wants to be explicit about order
/// identifiers.
pub type OrderId = Id;
