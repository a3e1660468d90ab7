//! Stop books and the trigger dispatcher.
//!
//! Stop and stop-limit orders rest in their own tick-indexed books and do
//! not participate in matching until the market price crosses their stop
//! tick. Every market-price move drains the stop books: each triggered
//! order converts to its active kind and is resubmitted, which can move
//! the price further and arm more stops, so the drain repeats until both
//! books are quiescent.

use super::book::{BookKind, OrderBook};
use super::ids::Id;
use super::order::{Order, OrderKind, Side};
use super::result::{OrderResult, OrderStatus};
use super::ticks::price_to_tick;
use tracing::trace;

impl OrderBook {
    /// Routes a stop or stop-limit order: rest it in its stop book keyed
    /// by stop tick, or — if the current market price already crosses the
    /// trigger — convert it immediately and let it match before returning.
    pub(crate) fn submit_stop(&mut self, id: Id, order: Order) -> OrderResult {
        let Some(stop_price) = order.stop_price() else {
            // the factories guarantee a stop price is present
            return OrderResult {
                id,
                status: OrderStatus::Rejected,
                trades: Vec::new(),
                resting_order: None,
                message: "Stop orders must specify a (positive) stop price".to_string(),
            };
        };
        let stop_tick = price_to_tick(stop_price, self.tick_size());

        if let Some(market) = self.market_tick {
            let crossed = match order.side() {
                Side::Buy => market >= stop_tick,
                Side::Sell => market <= stop_tick,
            };
            if crossed {
                trace!("stop order {} already crossed on arrival, converting", id);
                return self.convert_and_submit(id, order);
            }
        }

        let book = match order.side() {
            Side::Buy => BookKind::StopBuys,
            Side::Sell => BookKind::StopSells,
        };
        let resting_copy = order.clone();
        self.rest_order(id, order, book, stop_tick);

        let message = if resting_copy.has_callback() {
            "Order placed with callback"
        } else {
            "Order placed"
        };
        OrderResult {
            id,
            status: OrderStatus::Placed,
            trades: Vec::new(),
            resting_order: Some(resting_copy),
            message: message.to_string(),
        }
    }

    /// Converts a triggered stop into its active kind and runs it through
    /// the matcher. The order keeps its identifier and gets a fresh stamp,
    /// so if it rests the tail-append keeps level timestamps nondecreasing.
    fn convert_and_submit(&mut self, id: Id, mut order: Order) -> OrderResult {
        let timestamp = self.clock.next();
        order.set_timestamp(timestamp);
        order.convert_to_active();

        match order.kind() {
            OrderKind::Limit => match order.price() {
                Some(limit_price) => self.submit_limit(id, order, limit_price),
                None => OrderResult {
                    id,
                    status: OrderStatus::Rejected,
                    trades: Vec::new(),
                    resting_order: None,
                    message: "Limit orders must specify a (positive) price".to_string(),
                },
            },
            _ => self.submit_market(id, order),
        }
    }

    /// Drains the stop books after a market-price move.
    ///
    /// One outer call owns the loop: conversions submitted from inside it
    /// can move the market price further and arm more stops, which the
    /// next pass picks up. Nested dispatch attempts return immediately, so
    /// a conversion's own trades never start a second drain on the same
    /// stack.
    pub(crate) fn dispatch_stops(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;

        while let Some(key) = self.next_triggered() {
            let Some(id) = self.arena.order(key).and_then(|order| order.id()) else {
                break;
            };
            let Some((order, _location)) = self.remove_resting(id) else {
                break;
            };

            trace!(
                "stop order {} triggered at market tick {:?}",
                id, self.market_tick
            );
            let result = self.convert_and_submit(id, order);
            trace!(
                "stop order {} converted: {:?} ({})",
                id, result.status, result.message
            );
        }

        self.dispatching = false;
    }

    /// The arena key of the next stop order whose trigger the market price
    /// crosses: stop-buys from the lowest eligible tick upward, then
    /// stop-sells from the highest eligible tick downward; within a level,
    /// arrival order.
    fn next_triggered(&self) -> Option<usize> {
        let market = self.market_tick?;

        if let Some((&tick, level)) = self.stop_buys.iter().next() {
            if tick <= market {
                if let Some(key) = level.front() {
                    return Some(key);
                }
            }
        }
        if let Some((&tick, level)) = self.stop_sells.iter().next_back() {
            if tick >= market {
                if let Some(key) = level.front() {
                    return Some(key);
                }
            }
        }
        None
    }
}
