//! The core matching algorithm: an incoming aggressor walks the opposite
//! book under strict price-time priority, generating trades until it is
//! filled or no eligible liquidity remains.

use super::book::OrderBook;
use super::ids::Id;
use super::order::{Order, Side};
use super::ticks::tick_to_price;
use super::trade::Trade;
use tracing::trace;

impl OrderBook {
    /// Matches `aggressor` against the opposite book.
    ///
    /// Levels are visited best-first (ascending asks for a buy, descending
    /// bids for a sell); within one level orders are consumed in arrival
    /// order. `limit_tick` bounds the walk for limit aggressors — `None`
    /// means no price constraint (market order). Executions happen at the
    /// resting side's price. The aggressor's remaining volume is mutated
    /// in place; produced trades are returned in execution order and are
    /// already in the trade log with callbacks delivered.
    pub(crate) fn match_incoming(
        &mut self,
        aggressor_id: Id,
        aggressor: &mut Order,
        limit_tick: Option<i64>,
    ) -> Vec<Trade> {
        let side = aggressor.side();
        let mut trades = Vec::new();

        while aggressor.volume() > 0 {
            let best = match side {
                Side::Buy => self.best_ask_tick(),
                Side::Sell => self.best_bid_tick(),
            };
            let Some(tick) = best else { break };

            if let Some(limit) = limit_tick {
                let beyond = match side {
                    Side::Buy => tick > limit,
                    Side::Sell => tick < limit,
                };
                if beyond {
                    break;
                }
            }

            let executed = self.consume_level(aggressor_id, aggressor, tick, &mut trades);

            // drop the level if the walk emptied it
            let map = match side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            if map.get(&tick).is_some_and(|level| level.is_empty()) {
                map.remove(&tick);
            }
            // a level that yielded nothing and still stands would never
            // yield on a revisit
            if executed == 0 && map.contains_key(&tick) {
                break;
            }
        }

        trades
    }

    /// Consumes one opposite-side level head-first until either the
    /// aggressor or the level is exhausted. Returns the executed quantity.
    fn consume_level(
        &mut self,
        aggressor_id: Id,
        aggressor: &mut Order,
        tick: i64,
        trades: &mut Vec<Trade>,
    ) -> u64 {
        let side = aggressor.side();
        let price = tick_to_price(tick, self.tick_size());
        let mut executed = 0u64;

        while aggressor.volume() > 0 {
            let head = {
                let level = match side {
                    Side::Buy => self.asks.get(&tick),
                    Side::Sell => self.bids.get(&tick),
                };
                level.and_then(|level| level.front())
            };
            let Some(key) = head else { break };

            let (resting_id, resting_volume, resting_callback) = match self.arena.order(key) {
                Some(order) => (order.id(), order.volume(), order.callback_cloned()),
                None => break,
            };
            // resting orders are stamped before they enter any level
            let Some(resting_id) = resting_id else { break };

            let quantity = aggressor.volume().min(resting_volume);
            let trade_id = self.next_id();
            let timestamp = self.clock.next();
            let (buyer_id, seller_id) = match side {
                Side::Buy => (aggressor_id, resting_id),
                Side::Sell => (resting_id, aggressor_id),
            };

            let trade = Trade {
                id: trade_id,
                buyer_id,
                seller_id,
                price,
                volume: quantity,
                timestamp,
                taker: side,
            };

            aggressor.set_volume(aggressor.volume() - quantity);
            if let Some(order) = self.arena.order_mut(key) {
                order.set_volume(resting_volume - quantity);
            }
            {
                let level = match side {
                    Side::Buy => self.asks.get_mut(&tick),
                    Side::Sell => self.bids.get_mut(&tick),
                };
                if let Some(level) = level {
                    level.reduce(quantity);
                }
            }
            self.total_volume = self.total_volume.saturating_sub(quantity);
            self.market_tick = Some(tick);
            self.trade_log.push(trade);
            executed += quantity;

            trace!(
                "trade {}: {} x {} taker {}",
                trade_id, price, quantity, side
            );

            // notify buyer first, then seller, then the book listener
            let (buyer_callback, seller_callback) = match side {
                Side::Buy => (aggressor.callback_cloned(), resting_callback),
                Side::Sell => (resting_callback, aggressor.callback_cloned()),
            };
            if let Some(callback) = buyer_callback {
                callback(&trade);
            }
            if let Some(callback) = seller_callback {
                callback(&trade);
            }
            if let Some(listener) = &self.trade_listener {
                listener(&trade);
            }

            trades.push(trade);

            if resting_volume == quantity {
                // head fully consumed: unlink it and drop its location
                let level = match side {
                    Side::Buy => self.asks.get_mut(&tick),
                    Side::Sell => self.bids.get_mut(&tick),
                };
                if let Some(level) = level {
                    level.remove(&mut self.arena, key);
                }
                self.locations.remove(&resting_id);
            }
        }

        executed
    }
}
