//! Core data types for portfolio valuation and risk analysis.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Broad asset category, matching the `Asset Type` column of holdings files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetClass {
    Stock,
    Bond,
    #[serde(rename = "T-Note")]
    TreasuryNote,
    Cryptocurrency,
}

impl AssetClass {
    /// Label used in holdings files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stock => "Stock",
            AssetClass::Bond => "Bond",
            AssetClass::TreasuryNote => "T-Note",
            AssetClass::Cryptocurrency => "Cryptocurrency",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded investment: what was bought, how much, at what price.
///
/// Holdings are immutable once recorded and carry no market data; pricing
/// happens in the valuation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Broad asset category
    pub asset_class: AssetClass,
    /// Ticker symbol (uppercase)
    pub symbol: String,
    /// Units held; zero is allowed, negative is not
    pub quantity: f64,
    /// Cost basis per unit
    pub purchase_price: f64,
}

impl Holding {
    /// Create a validated holding. The symbol is trimmed and uppercased.
    pub fn new(
        asset_class: AssetClass,
        symbol: &str,
        quantity: f64,
        purchase_price: f64,
    ) -> Result<Self> {
        let holding = Self {
            asset_class,
            symbol: symbol.trim().to_uppercase(),
            quantity,
            purchase_price,
        };
        holding.validate()?;
        Ok(holding)
    }

    /// Check the invariants a well-formed holding must satisfy.
    ///
    /// Holdings can also be built as struct literals, so the valuation
    /// pipeline re-checks them with this before any market data is
    /// fetched.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::InvalidHolding {
                symbol: self.symbol.clone(),
                reason: "empty symbol".to_string(),
            });
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(Error::InvalidHolding {
                symbol: self.symbol.clone(),
                reason: format!("quantity must be a non-negative number, got {}", self.quantity),
            });
        }
        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(Error::InvalidHolding {
                symbol: self.symbol.clone(),
                reason: format!("purchase price must be positive, got {}", self.purchase_price),
            });
        }
        Ok(())
    }

    /// Total cost of this holding (quantity x purchase price).
    pub fn cost_basis(&self) -> f64 {
        self.quantity * self.purchase_price
    }
}

/// One daily close observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a price point.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Historical close prices for one symbol, in chronological order.
///
/// The constructor establishes the invariants: points are sorted by date,
/// non-finite and non-positive closes are dropped, and the first
/// observation wins when a date repeats. A fetched series is read-only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw points. The symbol is trimmed and
    /// uppercased; the points are normalized as described on the type.
    pub fn new(symbol: &str, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            symbol: symbol.trim().to_uppercase(),
            points,
        }
    }

    /// The symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The observations, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no data.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent close, if the series has any data.
    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Date of the oldest observation.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Date of the newest observation.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Day-over-day log returns `ln(P_t / P_{t-1})`.
    pub fn log_returns(&self) -> Vec<f64> {
        crate::risk::stats::log_returns(&self.closes())
    }
}

/// A holding enriched with the latest market price, when one resolved.
///
/// All three derived fields are absent together: an unpriced position
/// contributes nothing to aggregates, which is different from
/// contributing zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedPosition {
    /// The underlying holding, unchanged
    pub holding: Holding,
    /// Latest close, absent when the fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    /// Quantity x current price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    /// (Current price - purchase price) x quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_loss: Option<f64>,
}

impl PricedPosition {
    /// Build a position from a resolved market price.
    pub fn priced(holding: Holding, current_price: f64) -> Self {
        let current_value = current_price * holding.quantity;
        let gain_loss = (current_price - holding.purchase_price) * holding.quantity;
        Self {
            holding,
            current_price: Some(current_price),
            current_value: Some(current_value),
            gain_loss: Some(gain_loss),
        }
    }

    /// Build a position whose market data could not be resolved.
    pub fn unpriced(holding: Holding) -> Self {
        Self {
            holding,
            current_price: None,
            current_value: None,
            gain_loss: None,
        }
    }

    /// Whether a market price resolved for this position.
    pub fn is_priced(&self) -> bool {
        self.current_price.is_some()
    }
}

/// Portfolio-level totals derived from priced positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    /// Sum of current value over positions with a resolved price
    pub total_value: f64,
    /// Sum of cost basis over every valid holding, priced or not
    pub total_investment: f64,
    /// `total_value - total_investment`
    ///
    /// Because `total_investment` covers unpriced holdings too,
    /// performance reads low when fetches fail. That understatement is
    /// deliberate: the failure list says which symbols are missing, the
    /// totals are never quietly adjusted.
    pub performance: f64,
}

impl PortfolioSummary {
    /// Whether the portfolio is currently worth less than was paid for it.
    ///
    /// Renderers query this to decide how to mark the performance figure;
    /// the sign convention lives here, not in formatting code.
    pub fn is_loss(&self) -> bool {
        self.performance < 0.0
    }
}

/// Risk statistics for one symbol at a stated confidence level.
///
/// Every metric is optional: `None` means the statistic is undefined for
/// the data at hand (missing history, zero variance), never NaN or an
/// infinity. VaR and CVaR are quantiles of the daily log-return
/// distribution, so a 95% VaR of -0.03 reads "the worst 5% of days lose
/// 3% or more".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    /// Ticker symbol (uppercase)
    pub symbol: String,
    /// Confidence level used for VaR/CVaR (e.g. 0.95 for 95%)
    pub confidence_level: f64,
    /// Annualized standard deviation of log returns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Annualized excess return over annualized volatility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpe_ratio: Option<f64>,
    /// (1 - confidence) quantile of daily log returns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var: Option<f64>,
    /// Mean log return at or below the VaR quantile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvar: Option<f64>,
}

impl RiskMetrics {
    /// Metrics record with every statistic absent.
    pub fn unavailable(symbol: &str, confidence_level: f64) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            confidence_level,
            volatility: None,
            sharpe_ratio: None,
            var: None,
            cvar: None,
        }
    }
}
