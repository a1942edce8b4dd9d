//! Holdings input adapters: CSV loading and writing, plus a seeded
//! sample generator for demos.

mod loader;
mod sample;

pub use loader::{load_holdings, read_holdings, write_holdings, write_holdings_file};
pub use sample::{sample_holdings, SAMPLE_CRYPTOS, SAMPLE_STOCKS};
