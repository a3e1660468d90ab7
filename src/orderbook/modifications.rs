//! Order mutation: cancellation, volume and price modification, and the
//! callback registry.
//!
//! Decreasing volume happens in place and preserves time priority. Any
//! change that would improve an order's standing — a volume increase or a
//! price change — supersedes instead: the order is cancelled and a fresh
//! order is admitted at the tail with a new identifier and timestamp,
//! re-running the matcher on the way in.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::ids::Id;
use super::order::{Order, OrderCallback, OrderKind};
use super::result::{OrderResult, OrderStatus};
use super::ticks::price_to_tick;
use tracing::trace;

impl OrderBook {
    /// Removes a resting order from its book.
    ///
    /// Works for orders in any of the four books, including armed stops.
    /// The cancelled residual is written to the audit log with delta −1;
    /// any attached callback is discarded.
    ///
    /// # Errors
    /// [`OrderBookError::NotFound`] if the identifier names no resting
    /// order; [`OrderBookError::Reentrancy`] from inside a callback.
    pub fn cancel_order(&mut self, id: Id) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.cancel_inner(id);
        self.exit();
        result
    }

    fn cancel_inner(&mut self, id: Id) -> Result<OrderResult, OrderBookError> {
        let Some((order, _location)) = self.remove_resting(id) else {
            return Err(OrderBookError::NotFound { id });
        };
        self.push_audit(id, -1);
        trace!("cancelled order {} with {} unfilled", id, order.volume());

        Ok(OrderResult {
            id,
            status: OrderStatus::Cancelled,
            trades: Vec::new(),
            resting_order: None,
            message: format!("Order cancelled with {} unfilled shares", order.volume()),
        })
    }

    /// Changes a resting order's volume.
    ///
    /// A decrease is applied in place (time priority preserved, audit
    /// delta = the new remaining volume). An increase supersedes: the
    /// order is cancelled (audit delta −1) and re-admitted at the tail
    /// with a fresh identifier and timestamp. Asking for the current
    /// volume is rejected inline with no audit.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidOrder`] for zero volume;
    /// [`OrderBookError::NotFound`] if no resting order matches;
    /// [`OrderBookError::Reentrancy`] from inside a callback.
    pub fn modify_volume(&mut self, id: Id, new_volume: u64) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.modify_volume_inner(id, new_volume);
        self.exit();
        result
    }

    fn modify_volume_inner(
        &mut self,
        id: Id,
        new_volume: u64,
    ) -> Result<OrderResult, OrderBookError> {
        if new_volume == 0 {
            return Err(OrderBookError::invalid("Volume has to be positive"));
        }
        let Some(location) = self.locations.get(&id).copied() else {
            return Err(OrderBookError::NotFound { id });
        };
        let Some(current) = self.arena.order(location.key).map(Order::volume) else {
            return Err(OrderBookError::NotFound { id });
        };

        if new_volume == current {
            return Ok(OrderResult {
                id,
                status: OrderStatus::Rejected,
                trades: Vec::new(),
                resting_order: self.arena.order(location.key).cloned(),
                message: "Volume unchanged".to_string(),
            });
        }

        if new_volume < current {
            let delta = current - new_volume;
            if let Some(order) = self.arena.order_mut(location.key) {
                order.set_volume(new_volume);
            }
            if let Some(level) = self.level_mut(location.book, location.tick) {
                level.reduce(delta);
            }
            if location.book.counts_toward_volume() {
                self.total_volume = self.total_volume.saturating_sub(delta);
            }
            self.push_audit(id, new_volume as i64);
            trace!("order {} volume decreased {} -> {}", id, current, new_volume);

            return Ok(OrderResult {
                id,
                status: OrderStatus::Modified,
                trades: Vec::new(),
                resting_order: self.arena.order(location.key).cloned(),
                message: format!("Volume decreased from {current} to {new_volume}"),
            });
        }

        // increase: supersede with a fresh identifier at the tail
        let Some((order, _location)) = self.remove_resting(id) else {
            return Err(OrderBookError::NotFound { id });
        };
        self.push_audit(id, -1);

        let replacement = Order::resubmission(
            order.side(),
            order.kind(),
            new_volume,
            order.price(),
            order.stop_price(),
        );
        let mut result = self.admit(replacement, None)?;
        trace!(
            "order {} volume increased {} -> {}, superseded by {}",
            id, current, new_volume, result.id
        );
        result.status = OrderStatus::Modified;
        result.message = format!("Volume increased from {current} to {new_volume}. New ID generated.");
        Ok(result)
    }

    /// Changes a resting order's price.
    ///
    /// For limit and stop-limit orders the limit price is modified; for
    /// plain stops the stop price. A price that truncates to the order's
    /// current tick is rejected inline; otherwise the order is superseded —
    /// cancelled and re-admitted at the new price — which re-runs matching
    /// and may produce trades.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidOrder`] for a non-positive price;
    /// [`OrderBookError::NotFound`] if no resting order matches;
    /// [`OrderBookError::Reentrancy`] from inside a callback.
    pub fn modify_price(&mut self, id: Id, new_price: f64) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.modify_price_inner(id, new_price);
        self.exit();
        result
    }

    fn modify_price_inner(&mut self, id: Id, new_price: f64) -> Result<OrderResult, OrderBookError> {
        if !(new_price.is_finite() && new_price > 0.0) {
            return Err(OrderBookError::invalid("Price has to be positive"));
        }
        let Some(location) = self.locations.get(&id).copied() else {
            return Err(OrderBookError::NotFound { id });
        };
        let Some(order) = self.arena.order(location.key) else {
            return Err(OrderBookError::NotFound { id });
        };

        let current_price = match order.kind() {
            OrderKind::Stop => order.stop_price(),
            _ => order.price(),
        };
        let Some(current_price) = current_price else {
            return Err(OrderBookError::invalid("order carries no price"));
        };

        let tick_size = self.tick_size();
        if price_to_tick(new_price, tick_size) == price_to_tick(current_price, tick_size) {
            return Ok(OrderResult {
                id,
                status: OrderStatus::Rejected,
                trades: Vec::new(),
                resting_order: self.arena.order(location.key).cloned(),
                message: "Price unchanged".to_string(),
            });
        }

        let Some((order, _location)) = self.remove_resting(id) else {
            return Err(OrderBookError::NotFound { id });
        };
        self.push_audit(id, -1);

        let replacement = match order.kind() {
            OrderKind::Stop => Order::resubmission(
                order.side(),
                OrderKind::Stop,
                order.volume(),
                None,
                Some(new_price),
            ),
            OrderKind::StopLimit => Order::resubmission(
                order.side(),
                OrderKind::StopLimit,
                order.volume(),
                Some(new_price),
                order.stop_price(),
            ),
            kind => Order::resubmission(order.side(), kind, order.volume(), Some(new_price), None),
        };
        let mut result = self.admit(replacement, None)?;
        trace!(
            "order {} price changed {} -> {}, superseded by {}",
            id, current_price, new_price, result.id
        );
        result.status = OrderStatus::Modified;
        result.message =
            format!("Price changed from {current_price} to {new_price}. New ID generated.");
        Ok(result)
    }

    /// Changes a resting order's volume and price in one supersede.
    ///
    /// Rejected inline when both values are unchanged; otherwise the order
    /// is cancelled and re-admitted with the new volume at the new price.
    ///
    /// # Errors
    /// Same as [`Self::modify_volume`] and [`Self::modify_price`].
    pub fn modify_order(
        &mut self,
        id: Id,
        new_volume: u64,
        new_price: f64,
    ) -> Result<OrderResult, OrderBookError> {
        self.enter()?;
        let result = self.modify_order_inner(id, new_volume, new_price);
        self.exit();
        result
    }

    fn modify_order_inner(
        &mut self,
        id: Id,
        new_volume: u64,
        new_price: f64,
    ) -> Result<OrderResult, OrderBookError> {
        if new_volume == 0 {
            return Err(OrderBookError::invalid("Volume has to be positive"));
        }
        if !(new_price.is_finite() && new_price > 0.0) {
            return Err(OrderBookError::invalid("Price has to be positive"));
        }
        let Some(location) = self.locations.get(&id).copied() else {
            return Err(OrderBookError::NotFound { id });
        };
        let Some(order) = self.arena.order(location.key) else {
            return Err(OrderBookError::NotFound { id });
        };

        let current_volume = order.volume();
        let current_price = match order.kind() {
            OrderKind::Stop => order.stop_price(),
            _ => order.price(),
        };
        let Some(current_price) = current_price else {
            return Err(OrderBookError::invalid("order carries no price"));
        };

        let tick_size = self.tick_size();
        let same_tick =
            price_to_tick(new_price, tick_size) == price_to_tick(current_price, tick_size);
        if same_tick && new_volume == current_volume {
            return Ok(OrderResult {
                id,
                status: OrderStatus::Rejected,
                trades: Vec::new(),
                resting_order: self.arena.order(location.key).cloned(),
                message: "Order unchanged".to_string(),
            });
        }

        let Some((order, _location)) = self.remove_resting(id) else {
            return Err(OrderBookError::NotFound { id });
        };
        self.push_audit(id, -1);

        let replacement = match order.kind() {
            OrderKind::Stop => Order::resubmission(
                order.side(),
                OrderKind::Stop,
                new_volume,
                None,
                Some(new_price),
            ),
            OrderKind::StopLimit => Order::resubmission(
                order.side(),
                OrderKind::StopLimit,
                new_volume,
                Some(new_price),
                order.stop_price(),
            ),
            kind => Order::resubmission(order.side(), kind, new_volume, Some(new_price), None),
        };
        let mut result = self.admit(replacement, None)?;
        result.status = OrderStatus::Modified;
        result.message = "Order modified. New ID generated.".to_string();
        Ok(result)
    }

    /// Attaches a callback to a resting order. Returns `false` when the
    /// order is not currently resting (filled, rejected or cancelled).
    pub fn register_callback(&mut self, id: Id, callback: OrderCallback) -> bool {
        let Some(location) = self.locations.get(&id).copied() else {
            return false;
        };
        match self.arena.order_mut(location.key) {
            Some(order) => {
                order.set_callback(callback);
                true
            }
            None => false,
        }
    }

    /// Detaches a resting order's callback. Returns `false` when the order
    /// is not resting or carries no callback.
    pub fn remove_callback(&mut self, id: Id) -> bool {
        let Some(location) = self.locations.get(&id).copied() else {
            return false;
        };
        self.arena
            .order_mut(location.key)
            .and_then(|order| order.take_callback())
            .is_some()
    }
}
