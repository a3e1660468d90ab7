//! Order admission: the `place_order` pipeline.
//!
//! Admission stamps the order (identifier + timestamp), books it in the
//! order log, routes it by kind, and — whenever trades moved the market
//! price — hands control to the stop dispatcher before returning.

use super::book::{BookKind, OrderBook};
use super::error::OrderBookError;
use super::ids::Id;
use super::order::{Order, OrderCallback, OrderKind, Side};
use super::result::{OrderResult, OrderStatus};
use super::ticks::{price_to_tick, tick_to_price};
use tracing::trace;

impl OrderBook {
    /// Admits an order into the engine.
    ///
    /// Market orders match immediately and never rest. Limit orders match
    /// at eligible ticks and rest any residual at their tick-truncated
    /// price. Stop and stop-limit orders rest in their stop book unless
    /// the market price already crosses their trigger, in which case they
    /// convert and match at once.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidOrder`] for zero volume;
    /// [`OrderBookError::Reentrancy`] when called from inside a callback.
    pub fn place_order(&mut self, order: Order) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.admit(order, None);
        self.exit();
        result
    }

    /// Admits an order with a notification callback attached; otherwise
    /// identical to [`Self::place_order`].
    ///
    /// # Errors
    /// Same as [`Self::place_order`].
    pub fn place_order_with_callback(
        &mut self,
        order: Order,
        callback: OrderCallback,
    ) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.admit(order, Some(callback));
        self.exit();
        result
    }

    /// The admission pipeline shared by `place_order` and the supersede
    /// half of the modification operations.
    pub(crate) fn admit(
        &mut self,
        mut order: Order,
        callback: Option<OrderCallback>,
    ) -> Result<OrderResult, OrderBookError> {
        if order.volume() == 0 {
            return Err(OrderBookError::invalid("Volume has to be positive"));
        }

        let id = self.next_id();
        let timestamp = self.clock.next();
        order.set_id(id);
        order.set_timestamp(timestamp);
        if let Some(callback) = callback {
            order.set_callback(callback);
        }

        self.order_log.push(order.clone());
        trace!(
            "admitting {} {} order {} x {}",
            order.side(),
            order.kind(),
            id,
            order.volume()
        );

        let result = match order.kind() {
            OrderKind::Market => self.submit_market(id, order),
            OrderKind::Limit => {
                // the factories guarantee a limit price is present
                let Some(limit_price) = order.price() else {
                    return Err(OrderBookError::invalid(
                        "Limit orders must specify a (positive) price",
                    ));
                };
                self.submit_limit(id, order, limit_price)
            }
            OrderKind::Stop | OrderKind::StopLimit => self.submit_stop(id, order),
        };

        if !result.trades.is_empty() {
            self.dispatch_stops();
        }
        Ok(result)
    }

    /// Matches a market order. Residual volume after liquidity runs out is
    /// cancelled; a market order that finds no liquidity at all is
    /// rejected inline.
    pub(crate) fn submit_market(&mut self, id: Id, mut order: Order) -> OrderResult {
        let original = order.volume();
        let trades = self.match_incoming(id, &mut order, None);

        if trades.is_empty() {
            return OrderResult {
                id,
                status: OrderStatus::Rejected,
                trades,
                resting_order: Some(order),
                message: "Not enough liquidity".to_string(),
            };
        }

        if order.volume() == 0 {
            OrderResult {
                id,
                status: OrderStatus::Filled,
                trades,
                resting_order: None,
                message: "Order filled".to_string(),
            }
        } else {
            let executed = original - order.volume();
            OrderResult {
                id,
                status: OrderStatus::PartiallyFilled,
                trades,
                resting_order: None,
                message: format!("Partially filled {executed} shares, remaining order cancelled"),
            }
        }
    }

    /// Matches a limit order at eligible ticks and rests any residual at
    /// the tail of its level.
    pub(crate) fn submit_limit(&mut self, id: Id, mut order: Order, limit_price: f64) -> OrderResult {
        let tick = price_to_tick(limit_price, self.tick_size());
        order.set_price(tick_to_price(tick, self.tick_size()));

        let original = order.volume();
        let trades = self.match_incoming(id, &mut order, Some(tick));
        let residual = order.volume();

        if residual == 0 {
            return OrderResult {
                id,
                status: OrderStatus::Filled,
                trades,
                resting_order: None,
                message: "Order filled".to_string(),
            };
        }

        let book = match order.side() {
            Side::Buy => BookKind::Bids,
            Side::Sell => BookKind::Asks,
        };
        let resting_copy = order.clone();
        self.rest_order(id, order, book, tick);

        if trades.is_empty() {
            let message = if resting_copy.has_callback() {
                "Order placed with callback"
            } else {
                "Order placed"
            };
            OrderResult {
                id,
                status: OrderStatus::Placed,
                trades,
                resting_order: Some(resting_copy),
                message: message.to_string(),
            }
        } else {
            let executed = original - residual;
            OrderResult {
                id,
                status: OrderStatus::PartiallyFilled,
                trades,
                resting_order: Some(resting_copy),
                message: format!("Partially filled {executed} shares, {residual} shares remaining"),
            }
        }
    }
}
