//! Risk statistics over historical price series: annualized volatility,
//! Sharpe ratio, historical-simulation VaR/CVaR, and beta against a
//! market series.

mod analyzer;
pub(crate) mod stats;

pub use analyzer::{
    historical_cvar, historical_var, RiskAnalyzer, ANALYSIS_PERIOD, DEFAULT_CONFIDENCE_LEVEL,
    DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
};
