//! Tick arithmetic: discretisation of floating prices onto the exchange grid.
//!
//! Every internal price key is a signed tick index; floats only appear at
//! the API boundary. User-supplied prices are never compared directly —
//! equality is always equality of derived ticks.

/// Guard added before flooring so that exact decimal multiples (50.0 at a
/// tick size of 0.01) cannot land one tick low when the binary quotient
/// falls just under the integer.
const TICK_EPSILON: f64 = 1e-9;

/// Maps a price onto its tick index: `floor(price / tick_size)`.
///
/// Rounds toward negative infinity, which for positive prices means a price
/// between two grid points books at the lower one.
#[must_use]
pub fn price_to_tick(price: f64, tick_size: f64) -> i64 {
    (price / tick_size + TICK_EPSILON).floor() as i64
}

/// The inverse mapping: the displayed price of a tick index.
#[must_use]
pub fn tick_to_price(tick: i64, tick_size: f64) -> f64 {
    tick as f64 * tick_size
}

/// Truncates a price onto the grid: `tick_to_price(price_to_tick(p))`.
#[must_use]
pub fn truncate_price(price: f64, tick_size: f64) -> f64 {
    tick_to_price(price_to_tick(price, tick_size), tick_size)
}
