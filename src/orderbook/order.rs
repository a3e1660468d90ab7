//! Order model: sides, kinds, factory constructors and validation.

use super::error::OrderBookError;
use super::ids::Id;
use super::trade::Trade;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A bid.
    Buy,
    /// An ask.
    Sell,
}

impl Side {
    /// The side an order of this side matches against.
    #[must_use]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of instruction an order carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Rests at a limit price; matches only at eligible ticks.
    Limit,
    /// Matches against whatever liquidity exists; never rests.
    Market,
    /// Contingent order that converts to a market order when its stop
    /// price is crossed.
    Stop,
    /// Contingent order that converts to a limit order when its stop
    /// price is crossed.
    StopLimit,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Stop => write!(f, "STOP"),
            OrderKind::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Callback attached to an order, invoked synchronously with a copy of
/// every trade the order participates in.
pub type OrderCallback = Arc<dyn Fn(&Trade) + Send + Sync>;

/// A buy or sell instruction.
///
/// Orders are built through the eight factory constructors
/// ([`Order::limit_buy`], [`Order::market_sell`], [`Order::stop_limit_buy`],
/// …), which validate volume and prices so that an invalid order is never
/// representable. The identifier and timestamp stay unset until the engine
/// admits the order through [`crate::OrderBook::place_order`].
#[derive(Clone)]
pub struct Order {
    id: Option<Id>,
    side: Side,
    kind: OrderKind,
    volume: u64,
    price: Option<f64>,
    stop_price: Option<f64>,
    timestamp: u64,
    callback: Option<OrderCallback>,
}

impl Order {
    fn build(
        side: Side,
        kind: OrderKind,
        volume: u64,
        price: Option<f64>,
        stop_price: Option<f64>,
    ) -> Result<Self, OrderBookError> {
        if volume == 0 {
            return Err(OrderBookError::invalid("Volume has to be positive"));
        }

        match kind {
            OrderKind::Limit | OrderKind::StopLimit => {
                if !price.is_some_and(|p| p.is_finite() && p > 0.0) {
                    return Err(OrderBookError::invalid(
                        "Limit orders must specify a (positive) price",
                    ));
                }
            }
            OrderKind::Market | OrderKind::Stop => {
                if price.is_some() {
                    return Err(OrderBookError::invalid(format!(
                        "{kind} orders cannot specify a limit price"
                    )));
                }
            }
        }

        match kind {
            OrderKind::Stop | OrderKind::StopLimit => {
                if !stop_price.is_some_and(|p| p.is_finite() && p > 0.0) {
                    return Err(OrderBookError::invalid(
                        "Stop orders must specify a (positive) stop price",
                    ));
                }
            }
            OrderKind::Limit | OrderKind::Market => {
                if stop_price.is_some() {
                    return Err(OrderBookError::invalid(format!(
                        "{kind} orders cannot specify a stop price"
                    )));
                }
            }
        }

        Ok(Self {
            id: None,
            side,
            kind,
            volume,
            price,
            stop_price,
            timestamp: 0,
            callback: None,
        })
    }

    /// A buy order resting at `price` for `volume` shares.
    pub fn limit_buy(volume: u64, price: f64) -> Result<Self, OrderBookError> {
        Self::build(Side::Buy, OrderKind::Limit, volume, Some(price), None)
    }

    /// A sell order resting at `price` for `volume` shares.
    pub fn limit_sell(volume: u64, price: f64) -> Result<Self, OrderBookError> {
        Self::build(Side::Sell, OrderKind::Limit, volume, Some(price), None)
    }

    /// A buy order that takes whatever ask liquidity exists.
    pub fn market_buy(volume: u64) -> Result<Self, OrderBookError> {
        Self::build(Side::Buy, OrderKind::Market, volume, None, None)
    }

    /// A sell order that takes whatever bid liquidity exists.
    pub fn market_sell(volume: u64) -> Result<Self, OrderBookError> {
        Self::build(Side::Sell, OrderKind::Market, volume, None, None)
    }

    /// A buy order that becomes a market buy once the market price reaches
    /// `stop_price`.
    pub fn stop_buy(volume: u64, stop_price: f64) -> Result<Self, OrderBookError> {
        Self::build(Side::Buy, OrderKind::Stop, volume, None, Some(stop_price))
    }

    /// A sell order that becomes a market sell once the market price falls
    /// to `stop_price`.
    pub fn stop_sell(volume: u64, stop_price: f64) -> Result<Self, OrderBookError> {
        Self::build(Side::Sell, OrderKind::Stop, volume, None, Some(stop_price))
    }

    /// A buy order that becomes a limit buy at `price` once the market
    /// price reaches `stop_price`.
    pub fn stop_limit_buy(volume: u64, price: f64, stop_price: f64) -> Result<Self, OrderBookError> {
        Self::build(
            Side::Buy,
            OrderKind::StopLimit,
            volume,
            Some(price),
            Some(stop_price),
        )
    }

    /// A sell order that becomes a limit sell at `price` once the market
    /// price falls to `stop_price`.
    pub fn stop_limit_sell(
        volume: u64,
        price: f64,
        stop_price: f64,
    ) -> Result<Self, OrderBookError> {
        Self::build(
            Side::Sell,
            OrderKind::StopLimit,
            volume,
            Some(price),
            Some(stop_price),
        )
    }

    /// Internal constructor for supersede operations. The fields come from
    /// an order that already passed factory validation.
    pub(crate) fn resubmission(
        side: Side,
        kind: OrderKind,
        volume: u64,
        price: Option<f64>,
        stop_price: Option<f64>,
    ) -> Self {
        Self {
            id: None,
            side,
            kind,
            volume,
            price,
            stop_price,
            timestamp: 0,
            callback: None,
        }
    }

    /// The engine-assigned identifier, or `None` before admission.
    #[must_use]
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    /// The order's side.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The order's kind.
    #[must_use]
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    /// Remaining volume. Mutated by the engine as the order fills.
    #[must_use]
    pub fn volume(&self) -> u64 {
        self.volume
    }

    /// The limit price, present for limit and stop-limit orders. Once the
    /// order is admitted this is the tick-truncated price.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// The stop price, present for stop and stop-limit orders.
    #[must_use]
    pub fn stop_price(&self) -> Option<f64> {
        self.stop_price
    }

    /// Millisecond stamp assigned at admission; 0 before.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// True if a notification callback is attached.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// True for buy orders.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    /// True for sell orders.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    /// True for limit orders.
    #[must_use]
    pub fn is_limit(&self) -> bool {
        self.kind == OrderKind::Limit
    }

    /// True for market orders.
    #[must_use]
    pub fn is_market(&self) -> bool {
        self.kind == OrderKind::Market
    }

    /// True for stop orders.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.kind == OrderKind::Stop
    }

    /// True for stop-limit orders.
    #[must_use]
    pub fn is_stop_limit(&self) -> bool {
        self.kind == OrderKind::StopLimit
    }

    pub(crate) fn set_id(&mut self, id: Id) {
        self.id = Some(id);
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub(crate) fn set_volume(&mut self, volume: u64) {
        self.volume = volume;
    }

    pub(crate) fn set_price(&mut self, price: f64) {
        self.price = Some(price);
    }

    pub(crate) fn set_callback(&mut self, callback: OrderCallback) {
        self.callback = Some(callback);
    }

    pub(crate) fn take_callback(&mut self) -> Option<OrderCallback> {
        self.callback.take()
    }

    pub(crate) fn callback_cloned(&self) -> Option<OrderCallback> {
        self.callback.clone()
    }

    /// Converts a triggered stop order into its active kind: a plain stop
    /// becomes a market order, a stop-limit becomes a limit order at its
    /// stored limit price. Identifier and callback are untouched.
    pub(crate) fn convert_to_active(&mut self) {
        match self.kind {
            OrderKind::Stop => {
                self.kind = OrderKind::Market;
                self.stop_price = None;
            }
            OrderKind::StopLimit => {
                self.kind = OrderKind::Limit;
                self.stop_price = None;
            }
            OrderKind::Limit | OrderKind::Market => {}
        }
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Order")
            .field("id", &self.id)
            .field("side", &self.side)
            .field("kind", &self.kind)
            .field("volume", &self.volume)
            .field("price", &self.price)
            .field("stop_price", &self.stop_price)
            .field("timestamp", &self.timestamp)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Orders are equal when they carry the same engine-assigned identifier.
/// Two orders that have not been admitted yet are never equal.
impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}
