//! Seeded fake portfolios for demos and fixtures.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{AssetClass, Holding};

/// Stock universe the generator draws from.
pub const SAMPLE_STOCKS: &[&str] = &[
    "AAPL", "GOOGL", "TSLA", "MSFT", "AMZN", "CEG", "CORZ", "NVDA", "CVKD", "UBER", "ARE", "MRNA",
    "FMC", "MMM", "PFE", "HUM", "DG",
];

/// Crypto universe the generator draws from.
pub const SAMPLE_CRYPTOS: &[&str] = &["BTC", "ETH", "LTC", "XRP"];

/// Generate a small mixed portfolio: three to five stock lots with
/// whole-share quantities, then two or three crypto lots with fractional
/// quantities. Deterministic for a given seed; symbols may repeat, which
/// the valuator treats as separate lots.
pub fn sample_holdings(seed: u64) -> Vec<Holding> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut holdings = Vec::new();

    let stock_count = rng.random_range(3..=5);
    for _ in 0..stock_count {
        let symbol = SAMPLE_STOCKS[rng.random_range(0..SAMPLE_STOCKS.len())];
        holdings.push(Holding {
            asset_class: AssetClass::Stock,
            symbol: symbol.to_string(),
            quantity: rng.random_range(1..=100) as f64,
            purchase_price: round2(rng.random_range(50.0..5000.0)),
        });
    }

    let crypto_count = rng.random_range(2..=3);
    for _ in 0..crypto_count {
        let symbol = SAMPLE_CRYPTOS[rng.random_range(0..SAMPLE_CRYPTOS.len())];
        holdings.push(Holding {
            asset_class: AssetClass::Cryptocurrency,
            symbol: symbol.to_string(),
            quantity: round4(rng.random_range(0.01..5.0)),
            purchase_price: round2(rng.random_range(100.0..50_000.0)),
        });
    }

    holdings
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
