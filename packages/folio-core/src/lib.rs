//! Folio Core - portfolio valuation and risk analytics.
//!
//! This crate turns a list of holdings plus an injected market data
//! source into portfolio-level valuation and per-symbol risk figures:
//!
//! - **Valuation pipeline**: each holding is priced independently, so a
//!   failed fetch marks one symbol instead of aborting the batch;
//!   aggregation yields total value, total investment, and a signed
//!   performance figure
//! - **Risk analytics**: annualized log-return volatility, Sharpe ratio,
//!   historical-simulation VaR/CVaR, and beta against a market series
//! - **Market data capability**: the small [`PriceSource`] trait with
//!   offline implementations (in-memory fixtures, per-symbol CSV files,
//!   seeded synthetic walks)
//! - **Holdings adapters**: CSV loader/writer and a seeded sample
//!   generator
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use folio_core::{AssetClass, Holding, PricePoint, PriceSeries, StaticPriceSource};
//!
//! let holdings = vec![
//!     Holding::new(AssetClass::Stock, "AAPL", 10.0, 100.0).unwrap(),
//!     Holding::new(AssetClass::Stock, "MSFT", 5.0, 200.0).unwrap(),
//! ];
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let mut source = StaticPriceSource::new();
//! source.insert(PriceSeries::new("AAPL", vec![PricePoint::new(day, 150.0)]));
//! source.insert(PriceSeries::new("MSFT", vec![PricePoint::new(day, 180.0)]));
//!
//! let report = folio_core::value_portfolio(&source, &holdings);
//! assert_eq!(report.summary.total_value, 2400.0);
//! assert_eq!(report.summary.total_investment, 2000.0);
//! assert_eq!(report.summary.performance, 400.0);
//! ```

pub mod holdings;
pub mod market;
pub mod report;
pub mod risk;
pub mod types;
pub mod valuation;

pub use market::{
    CsvPriceSource, FetchError, Interval, Period, PriceSource, StaticPriceSource,
    SyntheticPriceSource,
};
pub use risk::{
    historical_cvar, historical_var, RiskAnalyzer, ANALYSIS_PERIOD, DEFAULT_CONFIDENCE_LEVEL,
    DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
};
pub use types::{
    AssetClass, Holding, PortfolioSummary, PricePoint, PricedPosition, PriceSeries, RiskMetrics,
};
pub use valuation::{price_holding, value_portfolio, SymbolFailure, ValuationReport};

/// Error types for folio-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A fetch failed, timed out, or returned nothing. Recovered per
    /// symbol; never fatal to a batch.
    #[error("market data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Fewer than two price points: returns, and every return-based
    /// statistic, are undefined.
    #[error("insufficient history for {symbol}: {points} price point(s), need at least 2")]
    InsufficientHistory { symbol: String, points: usize },

    /// Zero-variance returns make the Sharpe ratio denominator vanish.
    #[error("zero-variance return series for {symbol}: Sharpe ratio undefined")]
    DegenerateVolatility { symbol: String },

    /// Malformed input record, surfaced before any fetch is attempted.
    #[error("invalid holding {symbol:?}: {reason}")]
    InvalidHolding { symbol: String, reason: String },

    #[error("confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("empty return sample")]
    EmptySample,

    #[error("unknown period {0:?}, expected one of: 1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, ytd, max")]
    UnknownPeriod(String),

    #[error("unknown interval {0:?}, expected one of: 1d, 1wk, 1mo")]
    UnknownInterval(String),
}

/// Result type for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;
