//! File-backed price source: one CSV of daily closes per symbol.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{resample, FetchError, Interval, Period, PriceSource};
use crate::types::{PricePoint, PriceSeries};

/// Price source reading `<dir>/<SYMBOL>.csv` files with a `date,close`
/// header and `YYYY-MM-DD` dates.
///
/// The period window is anchored at the last date present in the file, so
/// a fixed fixture keeps answering the same way regardless of when it is
/// queried.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    close: f64,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceSource for CsvPriceSource {
    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let symbol = symbol.trim().to_uppercase();
        let path = self.path_for(&symbol);
        if !path.exists() {
            return Err(FetchError::UnknownSymbol(symbol));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let mut points = Vec::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row.map_err(|e| FetchError::Malformed(e.to_string()))?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| FetchError::Malformed(format!("bad date {:?}: {e}", row.date)))?;
            points.push(PricePoint::new(date, row.close));
        }

        let series = PriceSeries::new(&symbol, points);
        let windowed = match series.last_date().and_then(|anchor| period.start_date(anchor)) {
            Some(start) => series
                .points()
                .iter()
                .copied()
                .filter(|p| p.date >= start)
                .collect(),
            None => series.points().to_vec(),
        };

        Ok(PriceSeries::new(&symbol, resample(windowed, interval)))
    }
}
