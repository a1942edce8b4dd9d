//! Deterministic synthetic price data for demos and offline runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Months, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{resample, FetchError, Interval, Period, PriceSource};
use crate::types::{PricePoint, PriceSeries};

/// Price source that fabricates a plausible random walk per symbol.
///
/// The walk is fully determined by the seed, the symbol, and the
/// requested window, so repeated fetches and separate runs with the same
/// seed see identical data. Prices cover weekdays only and end at the
/// anchor date, which is today unless pinned with [`Self::anchored`].
#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    seed: u64,
    anchor: NaiveDate,
}

impl SyntheticPriceSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            anchor: Utc::now().date_naive(),
        }
    }

    /// Pin the last generated day, for reproducible output in tests.
    pub fn anchored(seed: u64, anchor: NaiveDate) -> Self {
        Self { seed, anchor }
    }

    fn symbol_rng(&self, symbol: &str) -> StdRng {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        StdRng::seed_from_u64(self.seed ^ hasher.finish())
    }
}

impl PriceSource for SyntheticPriceSource {
    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(FetchError::UnknownSymbol(symbol));
        }

        // An unbounded lookback still has to start somewhere; ten years
        // of dailies is plenty for any statistic this crate computes.
        let start = period
            .start_date(self.anchor)
            .or_else(|| self.anchor.checked_sub_months(Months::new(120)))
            .unwrap_or(self.anchor);

        let mut rng = self.symbol_rng(&symbol);
        let mut price = rng.random_range(20.0..400.0);
        let drift = rng.random_range(-0.0005..0.0015);

        let mut points = Vec::new();
        let mut day = start;
        while day <= self.anchor {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                price *= 1.0 + drift + rng.random_range(-0.02..0.02);
                points.push(PricePoint::new(day, price));
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(PriceSeries::new(&symbol, resample(points, interval)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-06-28 is a Friday.
    fn source() -> SyntheticPriceSource {
        SyntheticPriceSource::anchored(42, date(2024, 6, 28))
    }

    #[test]
    fn test_repeated_fetches_are_identical() {
        let source = source();
        let first = source.fetch("AAPL", Period::OneYear, Interval::OneDay).unwrap();
        let second = source.fetch("AAPL", Period::OneYear, Interval::OneDay).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_data_across_instances() {
        let a = SyntheticPriceSource::anchored(7, date(2024, 6, 28));
        let b = SyntheticPriceSource::anchored(7, date(2024, 6, 28));
        assert_eq!(
            a.fetch("MSFT", Period::SixMonths, Interval::OneDay).unwrap(),
            b.fetch("MSFT", Period::SixMonths, Interval::OneDay).unwrap()
        );
    }

    #[test]
    fn test_symbols_get_distinct_walks() {
        let source = source();
        let aapl = source.fetch("AAPL", Period::OneMonth, Interval::OneDay).unwrap();
        let msft = source.fetch("MSFT", Period::OneMonth, Interval::OneDay).unwrap();
        assert_ne!(aapl.closes(), msft.closes());
    }

    #[test]
    fn test_weekends_are_skipped() {
        let source = source();
        let series = source.fetch("AAPL", Period::OneMonth, Interval::OneDay).unwrap();
        assert!(!series.is_empty());
        for point in series.points() {
            assert!(!matches!(point.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn test_window_respects_period() {
        let source = source();
        let series = source.fetch("AAPL", Period::YearToDate, Interval::OneDay).unwrap();
        assert!(series.first_date().unwrap() >= date(2024, 1, 1));
        assert_eq!(series.last_date(), Some(date(2024, 6, 28)));
    }

    #[test]
    fn test_prices_stay_positive() {
        let source = source();
        let series = source.fetch("TSLA", Period::FiveYears, Interval::OneDay).unwrap();
        assert!(series.closes().iter().all(|c| *c > 0.0));
    }

    #[test]
    fn test_weekly_interval_is_coarser() {
        let source = source();
        let daily = source.fetch("AAPL", Period::OneYear, Interval::OneDay).unwrap();
        let weekly = source.fetch("AAPL", Period::OneYear, Interval::OneWeek).unwrap();
        assert!(weekly.len() < daily.len());
        assert!(weekly.len() > 40);
    }

    #[test]
    fn test_empty_symbol_is_rejected() {
        let source = source();
        let result = source.fetch("  ", Period::OneYear, Interval::OneDay);
        assert!(matches!(result, Err(FetchError::UnknownSymbol(_))));
    }
}
