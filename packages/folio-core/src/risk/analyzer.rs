//! Per-symbol risk statistics from historical price series.

use crate::market::{Interval, Period, PriceSource};
use crate::types::{PriceSeries, RiskMetrics};
use crate::{Error, Result};

use super::stats;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate assumed when none is given (1%).
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// Confidence level assumed for VaR/CVaR when none is given (95%).
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Historical lookback used when the analyzer drives the fetch itself.
pub const ANALYSIS_PERIOD: Period = Period::OneYear;

/// Risk statistics calculator over historical price series.
///
/// Holds only configuration. Every statistic is a pure function of the
/// series passed in, recomputed on each call and never cached, so two
/// calls over the same series always agree.
#[derive(Debug, Clone, Copy)]
pub struct RiskAnalyzer {
    risk_free_rate: f64,
    confidence_level: f64,
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl RiskAnalyzer {
    /// Analyzer with the given annual risk-free rate and the default
    /// confidence level.
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..Self::default()
        }
    }

    /// Replace the VaR/CVaR confidence level; must be strictly between 0
    /// and 1.
    pub fn with_confidence(mut self, confidence_level: f64) -> Result<Self> {
        validate_confidence(confidence_level)?;
        self.confidence_level = confidence_level;
        Ok(self)
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Annualized volatility: population standard deviation of daily log
    /// returns, scaled by sqrt(252).
    ///
    /// Scale-invariant in the price level: doubling every close leaves
    /// the log returns, and therefore the volatility, unchanged.
    pub fn volatility(&self, series: &PriceSeries) -> Result<f64> {
        let returns = returns_checked(series)?;
        Ok(stats::std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt())
    }

    /// Annualized expected return: mean daily log return times 252.
    pub fn expected_return(&self, series: &PriceSeries) -> Result<f64> {
        let returns = returns_checked(series)?;
        Ok(stats::mean(&returns) * TRADING_DAYS_PER_YEAR)
    }

    /// Annualized Sharpe ratio:
    /// `(mean(r) * 252 - risk_free_rate) / (std(r) * sqrt(252))`.
    ///
    /// Zero volatility makes the ratio undefined; that is reported as an
    /// error, never as an infinity or NaN.
    pub fn sharpe_ratio(&self, series: &PriceSeries) -> Result<f64> {
        let returns = returns_checked(series)?;
        let annualized_vol = stats::std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
        if annualized_vol == 0.0 {
            return Err(Error::DegenerateVolatility {
                symbol: series.symbol().to_string(),
            });
        }
        let annualized_return = stats::mean(&returns) * TRADING_DAYS_PER_YEAR;
        Ok((annualized_return - self.risk_free_rate) / annualized_vol)
    }

    /// Historical-simulation VaR over the series' realized log returns,
    /// at this analyzer's confidence level.
    pub fn var(&self, series: &PriceSeries) -> Result<f64> {
        let returns = returns_checked(series)?;
        historical_var(&returns, self.confidence_level)
    }

    /// Historical-simulation CVaR over the series' realized log returns,
    /// at this analyzer's confidence level.
    pub fn cvar(&self, series: &PriceSeries) -> Result<f64> {
        let returns = returns_checked(series)?;
        historical_cvar(&returns, self.confidence_level)
    }

    /// Beta of `asset` against `market`: covariance of their daily log
    /// returns over the variance of the market's, computed on the dates
    /// both series share.
    pub fn beta(&self, asset: &PriceSeries, market: &PriceSeries) -> Result<f64> {
        let (asset_closes, market_closes) = aligned_closes(asset, market);
        if asset_closes.len() < 2 {
            return Err(Error::InsufficientHistory {
                symbol: asset.symbol().to_string(),
                points: asset_closes.len(),
            });
        }

        let asset_returns = stats::log_returns(&asset_closes);
        let market_returns = stats::log_returns(&market_closes);

        let market_variance = stats::covariance(&market_returns, &market_returns);
        if market_variance == 0.0 {
            return Err(Error::DegenerateVolatility {
                symbol: market.symbol().to_string(),
            });
        }

        Ok(stats::covariance(&asset_returns, &market_returns) / market_variance)
    }

    /// All metrics for one already-fetched series.
    ///
    /// This is the per-symbol failure boundary: a statistic that cannot
    /// be computed is logged and reported absent, and the rest are still
    /// filled in. Missing history blanks everything at once.
    pub fn metrics(&self, series: &PriceSeries) -> RiskMetrics {
        let mut metrics = RiskMetrics::unavailable(series.symbol(), self.confidence_level);

        match self.volatility(series) {
            Ok(value) => metrics.volatility = Some(value),
            Err(err) => {
                tracing::warn!("{}", err);
                return metrics;
            }
        }

        match self.sharpe_ratio(series) {
            Ok(value) => metrics.sharpe_ratio = Some(value),
            Err(err) => tracing::warn!("{}", err),
        }

        metrics.var = self.var(series).ok();
        metrics.cvar = self.cvar(series).ok();

        metrics
    }

    /// Fetch history for `symbol` over `period` and compute its metrics.
    ///
    /// A failed fetch yields fully absent metrics and a warning; it never
    /// propagates to the caller.
    pub fn analyze<S>(&self, source: &S, symbol: &str, period: Period) -> RiskMetrics
    where
        S: PriceSource + ?Sized,
    {
        match source.fetch(symbol, period, Interval::OneDay) {
            Ok(series) => self.metrics(&series),
            Err(err) => {
                tracing::warn!("market data unavailable for {}: {}", symbol, err);
                RiskMetrics::unavailable(symbol, self.confidence_level)
            }
        }
    }
}

/// Historical-simulation Value at Risk: the `(1 - confidence)` quantile
/// of a return sample, linearly interpolated.
///
/// Operates in return space, so the result is usually negative: a 95%
/// VaR of -0.03 says the worst 5% of observations lose 3% or more.
///
/// # Arguments
///
/// * `returns` - Daily log returns (e.g. 0.01 for a 1% up day)
/// * `confidence_level` - Confidence level, strictly between 0 and 1
///   (typically 0.95 for 95%)
///
/// # Returns
///
/// The VaR quantile, or an error for an empty sample or an out-of-range
/// confidence level.
pub fn historical_var(returns: &[f64], confidence_level: f64) -> Result<f64> {
    validate_confidence(confidence_level)?;
    if returns.is_empty() {
        return Err(Error::EmptySample);
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(stats::quantile(&sorted, 1.0 - confidence_level))
}

/// Historical-simulation CVaR (expected shortfall): the mean of sample
/// returns at or below the VaR quantile.
pub fn historical_cvar(returns: &[f64], confidence_level: f64) -> Result<f64> {
    let var = historical_var(returns, confidence_level)?;
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    Ok(stats::mean(&tail))
}

fn validate_confidence(confidence_level: f64) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(Error::InvalidConfidence(confidence_level));
    }
    Ok(())
}

/// Log returns with the minimum-history check applied.
fn returns_checked(series: &PriceSeries) -> Result<Vec<f64>> {
    if series.len() < 2 {
        return Err(Error::InsufficientHistory {
            symbol: series.symbol().to_string(),
            points: series.len(),
        });
    }
    Ok(series.log_returns())
}

/// Closes of two series on their shared dates, chronological.
fn aligned_closes(a: &PriceSeries, b: &PriceSeries) -> (Vec<f64>, Vec<f64>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let (pa, pb) = (a.points(), b.points());
    let (mut i, mut j) = (0, 0);

    while i < pa.len() && j < pb.len() {
        match pa[i].date.cmp(&pb[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                left.push(pa[i].close);
                right.push(pb[j].close);
                i += 1;
                j += 1;
            }
        }
    }

    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::StaticPriceSource;
    use crate::types::PricePoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                PricePoint::new(date(2024, 1, 1) + chrono::Days::new(i as u64), *close)
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    #[test]
    fn test_volatility_known_value() {
        // Returns are {ln 1.1, -ln 1.1}: mean 0, population std = ln 1.1.
        let s = series("AAPL", &[100.0, 110.0, 100.0]);
        let analyzer = RiskAnalyzer::default();

        let expected = (1.1f64).ln() * TRADING_DAYS_PER_YEAR.sqrt();
        assert_relative_eq!(analyzer.volatility(&s).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_volatility_is_scale_invariant() {
        let analyzer = RiskAnalyzer::default();
        let base = [100.0, 104.0, 99.0, 103.5, 101.2, 108.9];
        let reference = analyzer.volatility(&series("AAPL", &base)).unwrap();

        for factor in [0.5, 2.0, 1000.0] {
            let scaled: Vec<f64> = base.iter().map(|c| c * factor).collect();
            let vol = analyzer.volatility(&series("AAPL", &scaled)).unwrap();
            assert_relative_eq!(vol, reference, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_prices_have_zero_volatility() {
        let s = series("AAPL", &[50.0, 50.0, 50.0, 50.0]);
        let analyzer = RiskAnalyzer::default();
        assert_eq!(analyzer.volatility(&s).unwrap(), 0.0);
    }

    #[test]
    fn test_constant_growth_rate_has_zero_volatility() {
        // Each day gains exactly 10%, so every log return is identical.
        let s = series("AAPL", &[100.0, 110.0, 121.0]);
        let analyzer = RiskAnalyzer::default();

        assert_eq!(analyzer.volatility(&s).unwrap(), 0.0);
        assert!(matches!(
            analyzer.sharpe_ratio(&s),
            Err(Error::DegenerateVolatility { symbol }) if symbol == "AAPL"
        ));
    }

    #[test]
    fn test_short_history_is_rejected() {
        let analyzer = RiskAnalyzer::default();

        let one = series("AAPL", &[100.0]);
        assert!(matches!(
            analyzer.volatility(&one),
            Err(Error::InsufficientHistory { points: 1, .. })
        ));

        let none = series("AAPL", &[]);
        assert!(matches!(
            analyzer.var(&none),
            Err(Error::InsufficientHistory { points: 0, .. })
        ));
    }

    #[test]
    fn test_sharpe_ratio_known_value() {
        // Returns {r, -r, r} with r = ln 1.1.
        let s = series("AAPL", &[100.0, 110.0, 100.0, 110.0]);
        let analyzer = RiskAnalyzer::default();

        let r = (1.1f64).ln();
        let ann_ret = (r / 3.0) * TRADING_DAYS_PER_YEAR;
        // Population variance of {r, -r, r} is 8r^2/9.
        let ann_vol = (8.0 * r * r / 9.0).sqrt() * TRADING_DAYS_PER_YEAR.sqrt();
        let expected = (ann_ret - DEFAULT_RISK_FREE_RATE) / ann_vol;

        assert_relative_eq!(analyzer.sharpe_ratio(&s).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_uses_configured_risk_free_rate() {
        let s = series("AAPL", &[100.0, 110.0, 100.0, 110.0]);
        let low = RiskAnalyzer::new(0.0).sharpe_ratio(&s).unwrap();
        let high = RiskAnalyzer::new(0.05).sharpe_ratio(&s).unwrap();
        assert!(low > high);
    }

    #[test]
    fn test_expected_return_known_value() {
        let s = series("AAPL", &[100.0, 110.0]);
        let analyzer = RiskAnalyzer::default();
        let expected = (1.1f64).ln() * TRADING_DAYS_PER_YEAR;
        assert_relative_eq!(analyzer.expected_return(&s).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_statistics_are_deterministic() {
        let s = series("AAPL", &[100.0, 104.0, 99.0, 103.5]);
        let analyzer = RiskAnalyzer::default();
        assert_eq!(
            analyzer.sharpe_ratio(&s).unwrap(),
            analyzer.sharpe_ratio(&s).unwrap()
        );
        assert_eq!(analyzer.var(&s).unwrap(), analyzer.var(&s).unwrap());
    }

    #[test]
    fn test_historical_var_interpolates() {
        let returns = [-0.05, -0.02, 0.0, 0.01, 0.03];
        // q = 0.2, position = 0.2 * 4 = 0.8: between -0.05 and -0.02.
        let var = historical_var(&returns, 0.8).unwrap();
        assert_relative_eq!(var, -0.026, epsilon = 1e-12);
    }

    #[test]
    fn test_historical_cvar_averages_the_tail() {
        let returns = [-0.05, -0.02, 0.0, 0.01, 0.03];
        // Only -0.05 sits at or below the VaR of -0.026.
        let cvar = historical_cvar(&returns, 0.8).unwrap();
        assert_relative_eq!(cvar, -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_cvar_never_exceeds_var() {
        let returns = [-0.08, -0.03, -0.01, 0.0, 0.002, 0.011, 0.02, 0.04];
        let var = historical_var(&returns, 0.95).unwrap();
        let cvar = historical_cvar(&returns, 0.95).unwrap();
        assert!(cvar <= var);
    }

    #[test]
    fn test_confidence_level_must_be_a_proper_fraction() {
        assert!(matches!(
            historical_var(&[0.01], 0.0),
            Err(Error::InvalidConfidence(_))
        ));
        assert!(matches!(
            historical_var(&[0.01], 1.0),
            Err(Error::InvalidConfidence(_))
        ));
        assert!(matches!(
            historical_var(&[0.01], f64::NAN),
            Err(Error::InvalidConfidence(_))
        ));
        assert!(RiskAnalyzer::default().with_confidence(1.5).is_err());
        assert!(RiskAnalyzer::default().with_confidence(0.99).is_ok());
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        assert!(matches!(historical_var(&[], 0.95), Err(Error::EmptySample)));
    }

    #[test]
    fn test_beta_of_leveraged_asset() {
        // Asset closes are (market/100)^2 * 50, so asset log returns are
        // exactly twice the market's and beta must be 2.
        let market = series("SPY", &[100.0, 110.0, 99.0, 105.0]);
        let asset = series("AAPL", &[50.0, 60.5, 49.005, 55.125]);

        let beta = RiskAnalyzer::default().beta(&asset, &market).unwrap();
        assert_relative_eq!(beta, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beta_of_market_against_itself_is_one() {
        let market = series("SPY", &[100.0, 104.0, 99.0, 103.5, 101.2]);
        let beta = RiskAnalyzer::default().beta(&market, &market).unwrap();
        assert_relative_eq!(beta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_aligns_on_shared_dates() {
        // Market has an extra observation the asset is missing; the
        // squared-price relation holds on the shared dates, so beta is
        // still 2.
        let market = PriceSeries::new(
            "SPY",
            vec![
                PricePoint::new(date(2024, 1, 1), 100.0),
                PricePoint::new(date(2024, 1, 2), 102.0),
                PricePoint::new(date(2024, 1, 3), 110.0),
                PricePoint::new(date(2024, 1, 4), 99.0),
            ],
        );
        let asset = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(date(2024, 1, 1), 50.0),
                PricePoint::new(date(2024, 1, 3), 60.5),
                PricePoint::new(date(2024, 1, 4), 49.005),
            ],
        );

        let beta = RiskAnalyzer::default().beta(&asset, &market).unwrap();
        assert_relative_eq!(beta, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beta_requires_overlap() {
        let market = PriceSeries::new(
            "SPY",
            vec![PricePoint::new(date(2024, 1, 1), 100.0)],
        );
        let asset = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(date(2024, 2, 1), 50.0)],
        );

        let result = RiskAnalyzer::default().beta(&asset, &market);
        assert!(matches!(result, Err(Error::InsufficientHistory { points: 0, .. })));
    }

    #[test]
    fn test_beta_rejects_flat_market() {
        let market = series("SPY", &[100.0, 100.0, 100.0]);
        let asset = series("AAPL", &[50.0, 55.0, 52.0]);

        let result = RiskAnalyzer::default().beta(&asset, &market);
        assert!(matches!(
            result,
            Err(Error::DegenerateVolatility { symbol }) if symbol == "SPY"
        ));
    }

    #[test]
    fn test_metrics_fills_everything_for_good_history() {
        let s = series("AAPL", &[100.0, 104.0, 99.0, 103.5, 101.2, 108.9]);
        let metrics = RiskAnalyzer::default().metrics(&s);

        assert_eq!(metrics.symbol, "AAPL");
        assert_eq!(metrics.confidence_level, DEFAULT_CONFIDENCE_LEVEL);
        assert!(metrics.volatility.is_some());
        assert!(metrics.sharpe_ratio.is_some());
        assert!(metrics.var.is_some());
        assert!(metrics.cvar.is_some());
    }

    #[test]
    fn test_metrics_on_flat_series_reports_zero_vol_and_no_sharpe() {
        let s = series("AAPL", &[100.0, 100.0, 100.0]);
        let metrics = RiskAnalyzer::default().metrics(&s);

        assert_eq!(metrics.volatility, Some(0.0));
        assert!(metrics.sharpe_ratio.is_none());
        // Every return is zero, so the return quantiles are zero too.
        assert_eq!(metrics.var, Some(0.0));
        assert_eq!(metrics.cvar, Some(0.0));
    }

    #[test]
    fn test_metrics_on_short_history_blank() {
        let s = series("AAPL", &[100.0]);
        let metrics = RiskAnalyzer::default().metrics(&s);
        assert!(metrics.volatility.is_none());
        assert!(metrics.sharpe_ratio.is_none());
        assert!(metrics.var.is_none());
        assert!(metrics.cvar.is_none());
    }

    #[test]
    fn test_analyze_survives_a_failed_fetch() {
        let source = StaticPriceSource::new();
        let metrics = RiskAnalyzer::default().analyze(&source, "MSFT", ANALYSIS_PERIOD);

        assert_eq!(metrics.symbol, "MSFT");
        assert!(metrics.volatility.is_none());
    }

    #[test]
    fn test_analyze_happy_path() {
        let mut source = StaticPriceSource::new();
        source.insert(series("AAPL", &[100.0, 104.0, 99.0, 103.5, 101.2]));

        let metrics = RiskAnalyzer::default().analyze(&source, "aapl", ANALYSIS_PERIOD);
        assert_eq!(metrics.symbol, "AAPL");
        assert!(metrics.volatility.is_some());
    }
}
