//! The holding-to-priced-position pipeline.
//!
//! [`price_holding`] resolves one holding against a market data source;
//! [`value_portfolio`] drives it across an ordered list with per-symbol
//! failure isolation and aggregates the totals.

mod pricer;
mod valuator;

pub use pricer::{price_holding, PRICING_INTERVAL, PRICING_PERIOD};
pub use valuator::{value_portfolio, SymbolFailure, ValuationReport};
