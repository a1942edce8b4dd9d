//! Portfolio-level valuation: drive the pricer across a holdings list
//! and aggregate the results.

use serde::{Deserialize, Serialize};

use crate::market::PriceSource;
use crate::types::{Holding, PortfolioSummary, PricedPosition};
use crate::Result;

use super::price_holding;

/// One symbol that could not contribute a market value, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// Everything a valuation run produces: per-holding positions in input
/// order, aggregated totals, and explicit failure and exclusion lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationReport {
    /// One position per valid holding, preserving input order
    pub positions: Vec<PricedPosition>,
    /// Aggregated totals
    pub summary: PortfolioSummary,
    /// Symbols whose market data could not be resolved; their holdings
    /// still count toward `total_investment`
    pub failures: Vec<SymbolFailure>,
    /// Holdings rejected as invalid before any fetch; they count toward
    /// nothing
    pub rejected: Vec<SymbolFailure>,
}

impl ValuationReport {
    /// Pretty-printed JSON rendition; absent prices serialize as missing
    /// keys, not nulls.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Value a portfolio against a market data source.
///
/// Each holding is priced independently, so one symbol's failure marks
/// that symbol in `failures` and leaves the rest of the batch alone.
/// `total_value` sums only resolved positions while `total_investment`
/// covers every valid holding, so performance reads low when data is
/// missing; the failure list is how that surfaces.
///
/// The result depends only on `holdings` and what the source answers at
/// call time. Nothing is cached between invocations.
///
/// # Arguments
///
/// * `source` - Market data source consulted once per holding
/// * `holdings` - Holdings to value, in the order positions are reported
///
/// # Returns
///
/// A [`ValuationReport`] covering every input holding: priced or unpriced
/// positions, totals, and the failure and exclusion lists.
pub fn value_portfolio<S>(source: &S, holdings: &[Holding]) -> ValuationReport
where
    S: PriceSource + ?Sized,
{
    let mut positions = Vec::with_capacity(holdings.len());
    let mut failures = Vec::new();
    let mut rejected = Vec::new();

    let mut total_value = 0.0;
    let mut total_investment = 0.0;

    for holding in holdings {
        if let Err(err) = holding.validate() {
            tracing::warn!("excluding holding from valuation: {}", err);
            rejected.push(SymbolFailure {
                symbol: holding.symbol.clone(),
                reason: err.to_string(),
            });
            continue;
        }

        total_investment += holding.cost_basis();

        let (position, failure) = price_holding(source, holding);
        if let Some(value) = position.current_value {
            total_value += value;
        }
        if let Some(err) = failure {
            failures.push(SymbolFailure {
                symbol: holding.symbol.clone(),
                reason: err.to_string(),
            });
        }
        positions.push(position);
    }

    ValuationReport {
        positions,
        summary: PortfolioSummary {
            total_value,
            total_investment,
            performance: total_value - total_investment,
        },
        failures,
        rejected,
    }
}
