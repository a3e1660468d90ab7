//! Core `OrderBook`: engine state, constructors, accessors and the shared
//! internals every operation builds on.

use super::arena::{OrderArena, OrderKey};
use super::error::OrderBookError;
use super::ids::{Id, IdPool};
use super::level::PriceLevel;
use super::order::Order;
use super::result::AuditRecord;
use super::ticks::{price_to_tick, tick_to_price};
use super::trade::{Trade, TradeListener};
use crate::utils::{MonotonicClock, UuidFactory, current_time_millis};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Default quantization unit for prices.
pub const DEFAULT_TICK_SIZE: f64 = 0.01;

/// Which of the four books an order rests in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BookKind {
    Bids,
    Asks,
    StopBuys,
    StopSells,
}

impl BookKind {
    /// Stop books never contribute to the engine's total resting volume.
    pub(crate) fn counts_toward_volume(self) -> bool {
        matches!(self, BookKind::Bids | BookKind::Asks)
    }
}

/// Where a resting order lives: which book, which tick, and its stable
/// arena handle within that level's queue.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderLocation {
    pub(crate) book: BookKind,
    pub(crate) tick: i64,
    pub(crate) key: OrderKey,
}

/// A single-instrument limit order book with strict price-time priority.
///
/// The book maintains four tick-indexed sides — bids, asks, stop-buys and
/// stop-sells — plus a per-identifier location index giving O(1) cancel and
/// in-place volume mutation. All mutating operations take `&mut self`; the
/// engine performs no internal synchronisation and callers that need
/// concurrent access must wrap it in external mutual exclusion.
pub struct OrderBook {
    tick_size: f64,

    /// Bid side, keyed by tick. Best bid is the greatest key.
    pub(crate) bids: BTreeMap<i64, PriceLevel>,
    /// Ask side, keyed by tick. Best ask is the smallest key.
    pub(crate) asks: BTreeMap<i64, PriceLevel>,
    /// Stop-buy orders keyed by stop tick, triggered from the smallest
    /// eligible tick upward.
    pub(crate) stop_buys: BTreeMap<i64, PriceLevel>,
    /// Stop-sell orders keyed by stop tick, triggered from the greatest
    /// eligible tick downward.
    pub(crate) stop_sells: BTreeMap<i64, PriceLevel>,

    /// Owner of every resting order.
    pub(crate) arena: OrderArena,
    /// id -> {book, tick, arena key} for every resting order.
    pub(crate) locations: HashMap<Id, OrderLocation>,

    pub(crate) ids: UuidFactory,
    pub(crate) id_pool: IdPool,
    pub(crate) clock: MonotonicClock,

    pub(crate) trade_log: Vec<Trade>,
    pub(crate) order_log: Vec<Order>,
    pub(crate) audit_log: Vec<AuditRecord>,

    /// Tick of the last trade. Kept as a tick so stop triggering compares
    /// integers and never re-derives a tick from a float.
    pub(crate) market_tick: Option<i64>,
    /// Total resting volume across bids and asks (stop books excluded).
    pub(crate) total_volume: u64,

    /// Listener invoked with every trade, after per-order callbacks.
    pub(crate) trade_listener: Option<TradeListener>,

    /// Set while the stop dispatcher owns the drain loop.
    pub(crate) dispatching: bool,
    /// Set while any public mutation is on the stack.
    pub(crate) in_operation: bool,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_SIZE)
    }
}

impl OrderBook {
    /// Creates an empty book with the given tick size (fixed for the
    /// engine's lifetime). `tick_size` must be positive; use
    /// [`DEFAULT_TICK_SIZE`] for the conventional 0.01 grid.
    #[must_use]
    pub fn new(tick_size: f64) -> Self {
        debug_assert!(tick_size > 0.0, "tick size must be positive");
        Self {
            tick_size,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            stop_buys: BTreeMap::new(),
            stop_sells: BTreeMap::new(),
            arena: OrderArena::default(),
            locations: HashMap::new(),
            ids: UuidFactory::random(),
            id_pool: IdPool::default(),
            clock: MonotonicClock::new(current_time_millis),
            trade_log: Vec::new(),
            order_log: Vec::new(),
            audit_log: Vec::new(),
            market_tick: None,
            total_volume: 0,
            trade_listener: None,
            dispatching: false,
            in_operation: false,
        }
    }

    /// Creates a book that draws timestamps from the supplied millisecond
    /// source instead of the wall clock. Stamps are still monotonised.
    #[must_use]
    pub fn with_clock(tick_size: f64, source: fn() -> u64) -> Self {
        let mut book = Self::new(tick_size);
        book.clock = MonotonicClock::new(source);
        book
    }

    /// Creates a book that draws identifiers from the supplied factory,
    /// making id sequences reproducible across runs.
    #[must_use]
    pub fn with_id_factory(tick_size: f64, factory: UuidFactory) -> Self {
        let mut book = Self::new(tick_size);
        book.ids = factory;
        book
    }

    /// Creates a book with a trade listener installed.
    #[must_use]
    pub fn with_trade_listener(tick_size: f64, listener: TradeListener) -> Self {
        let mut book = Self::new(tick_size);
        book.trade_listener = Some(listener);
        book
    }

    /// Installs a listener invoked with every trade the engine emits.
    pub fn set_trade_listener(&mut self, listener: TradeListener) {
        self.trade_listener = Some(listener);
    }

    /// Removes the book-level trade listener.
    pub fn remove_trade_listener(&mut self) {
        self.trade_listener = None;
    }

    /// The configured tick size.
    #[must_use]
    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    /// Total resting volume across the bid and ask books. Stop orders do
    /// not contribute until they trigger.
    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    pub(crate) fn best_bid_tick(&self) -> Option<i64> {
        self.bids.keys().next_back().copied()
    }

    pub(crate) fn best_ask_tick(&self) -> Option<i64> {
        self.asks.keys().next().copied()
    }

    /// The highest resting bid price.
    ///
    /// # Errors
    /// [`OrderBookError::NotInitialized`] while the bid book is empty.
    pub fn best_bid(&self) -> Result<f64, OrderBookError> {
        self.best_bid_tick()
            .map(|tick| tick_to_price(tick, self.tick_size))
            .ok_or(OrderBookError::NotInitialized { what: "best bid" })
    }

    /// The lowest resting ask price.
    ///
    /// # Errors
    /// [`OrderBookError::NotInitialized`] while the ask book is empty.
    pub fn best_ask(&self) -> Result<f64, OrderBookError> {
        self.best_ask_tick()
            .map(|tick| tick_to_price(tick, self.tick_size))
            .ok_or(OrderBookError::NotInitialized { what: "best ask" })
    }

    /// The price of the most recent trade.
    ///
    /// # Errors
    /// [`OrderBookError::NotInitialized`] before the first trade.
    pub fn market_price(&self) -> Result<f64, OrderBookError> {
        self.market_tick
            .map(|tick| tick_to_price(tick, self.tick_size))
            .ok_or(OrderBookError::NotInitialized {
                what: "market price",
            })
    }

    /// `best ask − best bid`.
    ///
    /// # Errors
    /// [`OrderBookError::NotInitialized`] unless both sides are populated.
    pub fn spread(&self) -> Result<f64, OrderBookError> {
        match (self.best_bid_tick(), self.best_ask_tick()) {
            (Some(bid), Some(ask)) => Ok(tick_to_price(ask - bid, self.tick_size)),
            _ => Err(OrderBookError::NotInitialized { what: "spread" }),
        }
    }

    /// The resting orders at the bid level for `price`, oldest first.
    /// Empty when no bid level exists at that tick.
    #[must_use]
    pub fn bids_at(&self, price: f64) -> Vec<&Order> {
        let tick = price_to_tick(price, self.tick_size);
        self.bids
            .get(&tick)
            .map(|level| level.iter(&self.arena).collect())
            .unwrap_or_default()
    }

    /// The resting orders at the ask level for `price`, oldest first.
    /// Empty when no ask level exists at that tick.
    #[must_use]
    pub fn asks_at(&self, price: f64) -> Vec<&Order> {
        let tick = price_to_tick(price, self.tick_size);
        self.asks
            .get(&tick)
            .map(|level| level.iter(&self.arena).collect())
            .unwrap_or_default()
    }

    /// The resting orders at `price`, routed by side: prices at or below
    /// the best bid query the bid book, prices at or above the best ask
    /// query the ask book, anything in between is empty.
    #[must_use]
    pub fn orders_at(&self, price: f64) -> Vec<&Order> {
        let tick = price_to_tick(price, self.tick_size);
        if self.best_bid_tick().is_some_and(|best| tick <= best) {
            self.bids_at(price)
        } else if self.best_ask_tick().is_some_and(|best| tick >= best) {
            self.asks_at(price)
        } else {
            Vec::new()
        }
    }

    /// Total resting volume at `price`, routed like [`Self::orders_at`].
    /// Returns 0 for ticks no level exists at.
    #[must_use]
    pub fn volume_at(&self, price: f64) -> u64 {
        let tick = price_to_tick(price, self.tick_size);
        if self.best_bid_tick().is_some_and(|best| tick <= best) {
            self.bids.get(&tick).map_or(0, |level| level.volume)
        } else if self.best_ask_tick().is_some_and(|best| tick >= best) {
            self.asks.get(&tick).map_or(0, |level| level.volume)
        } else {
            0
        }
    }

    /// Current state of a resting order.
    ///
    /// # Errors
    /// [`OrderBookError::NotFound`] if the identifier names no currently
    /// resting order (filled, cancelled and rejected orders are gone).
    pub fn order_by_id(&self, id: Id) -> Result<&Order, OrderBookError> {
        self.locations
            .get(&id)
            .and_then(|loc| self.arena.order(loc.key))
            .ok_or(OrderBookError::NotFound { id })
    }

    /// Every trade the engine has generated, in execution order.
    #[must_use]
    pub fn trade_log(&self) -> &[Trade] {
        &self.trade_log
    }

    /// A by-value copy of every order ever admitted, in admission order.
    #[must_use]
    pub fn order_log(&self) -> &[Order] {
        &self.order_log
    }

    /// The append-only audit trail of cancellations and volume decreases.
    #[must_use]
    pub fn audit_log(&self) -> &[AuditRecord] {
        &self.audit_log
    }

    /// The owning pool of every identifier issued so far.
    #[must_use]
    pub fn id_pool(&self) -> &IdPool {
        &self.id_pool
    }

    /// Resets every index, pool and scalar to the initial state, dropping
    /// all orders and pending callbacks.
    pub fn clear(&mut self) {
        trace!("clearing order book ({} resting orders)", self.arena.len());
        self.bids.clear();
        self.asks.clear();
        self.stop_buys.clear();
        self.stop_sells.clear();
        self.arena.clear();
        self.locations.clear();
        self.id_pool.clear();
        self.clock.reset();
        self.trade_log.clear();
        self.order_log.clear();
        self.audit_log.clear();
        self.market_tick = None;
        self.total_volume = 0;
        self.dispatching = false;
        self.in_operation = false;
    }

    // ---- shared internals ----

    /// Flags entry into a public mutation; a second entry on the same
    /// stack (a callback calling back into the engine) is refused.
    pub(crate) fn enter(&mut self) -> Result<(), OrderBookError> {
        if self.in_operation {
            return Err(OrderBookError::Reentrancy);
        }
        self.in_operation = true;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.in_operation = false;
    }

    /// Issues a fresh identifier and records it in the pool.
    pub(crate) fn next_id(&mut self) -> Id {
        let id = Id::from_uuid(self.ids.next_uuid());
        self.id_pool.insert(id);
        id
    }

    /// Appends an audit entry with a fresh stamp.
    pub(crate) fn push_audit(&mut self, order_id: Id, volume_delta: i64) {
        let timestamp = self.clock.next();
        self.audit_log.push(AuditRecord {
            order_id,
            timestamp,
            volume_delta,
        });
    }

    /// Appends a resting order at the tail of the level at `tick`,
    /// creating the level if absent, and records its location.
    pub(crate) fn rest_order(&mut self, id: Id, order: Order, book: BookKind, tick: i64) {
        let volume = order.volume();
        let map = match book {
            BookKind::Bids => &mut self.bids,
            BookKind::Asks => &mut self.asks,
            BookKind::StopBuys => &mut self.stop_buys,
            BookKind::StopSells => &mut self.stop_sells,
        };
        let level = map.entry(tick).or_insert_with(PriceLevel::new);
        let key = level.push_back(&mut self.arena, order);

        self.locations.insert(id, OrderLocation { book, tick, key });
        if book.counts_toward_volume() {
            self.total_volume += volume;
        }
    }

    pub(crate) fn level_mut(&mut self, book: BookKind, tick: i64) -> Option<&mut PriceLevel> {
        let map = match book {
            BookKind::Bids => &mut self.bids,
            BookKind::Asks => &mut self.asks,
            BookKind::StopBuys => &mut self.stop_buys,
            BookKind::StopSells => &mut self.stop_sells,
        };
        map.get_mut(&tick)
    }

    /// Removes a resting order wherever it lives: unlinks it from its
    /// level (dropping the level if it empties), erases its location and
    /// adjusts the total volume. Returns `None` for unknown identifiers.
    pub(crate) fn remove_resting(&mut self, id: Id) -> Option<(Order, OrderLocation)> {
        let location = self.locations.remove(&id)?;
        let map = match location.book {
            BookKind::Bids => &mut self.bids,
            BookKind::Asks => &mut self.asks,
            BookKind::StopBuys => &mut self.stop_buys,
            BookKind::StopSells => &mut self.stop_sells,
        };

        let level = map.get_mut(&location.tick)?;
        let order = level.remove(&mut self.arena, location.key)?;
        if level.is_empty() {
            map.remove(&location.tick);
        }

        if location.book.counts_toward_volume() {
            self.total_volume = self.total_volume.saturating_sub(order.volume());
        }
        Some((order, location))
    }

    #[cfg(test)]
    pub(crate) fn location(&self, id: Id) -> Option<OrderLocation> {
        self.locations.get(&id).copied()
    }
}
