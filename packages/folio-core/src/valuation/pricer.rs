//! Pricing one holding against a market data source.

use crate::market::{Interval, Period, PriceSource};
use crate::types::{Holding, PricedPosition};
use crate::Error;

/// Lookback used to establish a current price: year-to-date daily closes,
/// of which only the latest matters for valuation.
pub const PRICING_PERIOD: Period = Period::YearToDate;

/// Observation spacing used when pricing.
pub const PRICING_INTERVAL: Interval = Interval::OneDay;

/// Fetch the latest close for `holding` and derive a priced position.
///
/// The holding is validated before any fetch is attempted. An invalid
/// holding, a failed fetch, or an empty series comes back as an unpriced
/// position plus the error describing why, leaving sibling holdings
/// untouched.
pub fn price_holding<S>(source: &S, holding: &Holding) -> (PricedPosition, Option<Error>)
where
    S: PriceSource + ?Sized,
{
    if let Err(err) = holding.validate() {
        tracing::warn!("{}", err);
        return (PricedPosition::unpriced(holding.clone()), Some(err));
    }

    match source.fetch(&holding.symbol, PRICING_PERIOD, PRICING_INTERVAL) {
        Ok(series) => match series.latest_close() {
            Some(price) => (PricedPosition::priced(holding.clone(), price), None),
            None => {
                let err = Error::DataUnavailable {
                    symbol: holding.symbol.clone(),
                    reason: "source returned an empty series".to_string(),
                };
                tracing::warn!("{}", err);
                (PricedPosition::unpriced(holding.clone()), Some(err))
            }
        },
        Err(fetch_err) => {
            let err = Error::DataUnavailable {
                symbol: holding.symbol.clone(),
                reason: fetch_err.to_string(),
            };
            tracing::warn!("{}", err);
            (PricedPosition::unpriced(holding.clone()), Some(err))
        }
    }
}
