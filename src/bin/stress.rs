//! Randomized stress driver.
//!
//! Places N random orders (default 1000, overridable by the first CLI
//! argument) around the current market price, times the run and writes a
//! state summary to `state.txt`.

use matchbook::prelude::*;
use rand::Rng;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    // silently fall back to the default on a missing or malformed argument
    let iterations: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1_000);

    let mut book = OrderBook::default();
    let mut rng = rand::thread_rng();
    let mut volume_in: u64 = 0;
    let start = Instant::now();

    for _ in 0..iterations {
        // orders land within ±5% of the market price, or around 50 before
        // the first trade
        let price = match book.market_price() {
            Ok(market) => (market * (1.0 + rng.gen_range(-5i32..=5) as f64 / 100.0)).max(0.1),
            Err(_) => (50.0 + rng.gen_range(-5i32..=5) as f64).max(0.1),
        };
        let is_buy = rng.gen_bool(0.5);
        let is_market = rng.gen_range(0..10) < 3; // 30% market orders
        let volume: u64 = rng.gen_range(5..=500);
        volume_in += volume;

        let order = if is_buy && is_market {
            Order::market_buy(volume)
        } else if is_market {
            Order::market_sell(volume)
        } else if is_buy {
            Order::limit_buy(volume, price)
        } else {
            Order::limit_sell(volume, price)
        };

        match order {
            Ok(order) => {
                // inline rejections (market orders into an empty side) are
                // part of the workload
                let _ = book.place_order(order);
            }
            Err(error) => tracing::warn!("driver built an invalid order: {error}"),
        }
    }

    let seconds = start.elapsed().as_secs_f64();

    let mut out = File::create("state.txt")?;
    writeln!(
        out,
        "Time: {} s ({} ms, {} µs, {} ns)",
        seconds,
        seconds * 1e3,
        seconds * 1e6,
        seconds * 1e9
    )?;
    writeln!(
        out,
        "Orders processed: {}, Trades generated: {}, Total volume processed: {}",
        book.order_log().len(),
        book.trade_log().len(),
        volume_in
    )?;
    writeln!(
        out,
        "Final state: {}",
        serde_json::to_string_pretty(&book.depth(10)).unwrap_or_default()
    )?;

    println!(
        "processed {} orders in {:.6} s, {} trades; summary written to state.txt",
        iterations,
        seconds,
        book.trade_log().len()
    );
    Ok(())
}
