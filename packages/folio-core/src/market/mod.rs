//! Market data access: the price source capability and its offline
//! implementations.
//!
//! The engine never talks to a transport directly. It consumes a
//! [`PriceSource`], and the valuation pipeline treats every failure a
//! source reports as a per-symbol condition rather than a batch abort.
//! The implementations here cover prepared fixtures
//! ([`StaticPriceSource`]), directories of per-symbol CSV files
//! ([`CsvPriceSource`]), and seeded synthetic walks
//! ([`SyntheticPriceSource`]).

mod csv_source;
mod synthetic;

pub use csv_source::CsvPriceSource;
pub use synthetic::SyntheticPriceSource;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{PricePoint, PriceSeries};
use crate::Error;

/// Lookback window for a historical fetch.
///
/// The variants correspond to the accepted request strings (`1d`, `5d`,
/// `1mo`, `3mo`, `6mo`, `1y`, `5y`, `ytd`, `max`); anything else is
/// rejected at the parsing boundary, before a source sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// Every accepted period, shortest span first.
    pub const ALL: [Period; 9] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
        Period::YearToDate,
        Period::Max,
    ];

    /// Request string understood by price sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// First calendar day covered by this period, `None` for an unbounded
    /// lookback.
    ///
    /// Windows are calendar approximations of trading spans, anchored at
    /// the most recent observation rather than the wall clock, so fixed
    /// fixtures answer the same way on any run date. Five days widens to
    /// a week of calendar days to keep a week of trading data.
    pub fn start_date(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::OneDay => Some(anchor),
            Period::FiveDays => anchor.checked_sub_days(Days::new(7)),
            Period::OneMonth => anchor.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => anchor.checked_sub_months(Months::new(3)),
            Period::SixMonths => anchor.checked_sub_months(Months::new(6)),
            Period::OneYear => anchor.checked_sub_months(Months::new(12)),
            Period::FiveYears => anchor.checked_sub_months(Months::new(60)),
            Period::YearToDate => NaiveDate::from_ymd_opt(anchor.year(), 1, 1),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Period::OneDay),
            "5d" => Ok(Period::FiveDays),
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "5y" => Ok(Period::FiveYears),
            "ytd" => Ok(Period::YearToDate),
            "max" => Ok(Period::Max),
            other => Err(Error::UnknownPeriod(other.to_string())),
        }
    }
}

/// Spacing of observations in a fetched series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Interval {
    /// Every accepted interval, finest first.
    pub const ALL: [Interval; 3] = [Interval::OneDay, Interval::OneWeek, Interval::OneMonth];

    /// Request string understood by price sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Interval::OneDay),
            "1wk" => Ok(Interval::OneWeek),
            "1mo" => Ok(Interval::OneMonth),
            other => Err(Error::UnknownInterval(other.to_string())),
        }
    }
}

/// Error returned by a [`PriceSource`] implementation.
///
/// Sources own their transport concerns; callers in the valuation
/// pipeline map every variant to the same per-symbol outcome and move on
/// to the next holding.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("symbol not found: {0}")]
    UnknownSymbol(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed price data: {0}")]
    Malformed(String),
}

/// Capability to fetch historical close prices for one symbol.
///
/// `fetch` is synchronous and called once per symbol per pipeline run.
/// Implementations decide how the requested window maps onto whatever
/// data they hold. An empty series is a valid response; callers treat it
/// the same as a failed fetch.
pub trait PriceSource {
    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, FetchError>;
}

/// Collapse a daily series to the requested interval, keeping the last
/// observation of each week or month bucket.
///
/// Assumes chronological input, which is what every source here produces.
pub fn resample(points: Vec<PricePoint>, interval: Interval) -> Vec<PricePoint> {
    match interval {
        Interval::OneDay => points,
        Interval::OneWeek => last_per_bucket(points, |d| (d.iso_week().year(), d.iso_week().week())),
        Interval::OneMonth => last_per_bucket(points, |d| (d.year(), d.month())),
    }
}

fn last_per_bucket<K: PartialEq>(
    points: Vec<PricePoint>,
    key: impl Fn(NaiveDate) -> K,
) -> Vec<PricePoint> {
    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        if let Some(prev) = out.last_mut() {
            if key(prev.date) == key(point.date) {
                *prev = point;
                continue;
            }
        }
        out.push(point);
    }
    out
}

/// In-memory price source backed by prepared series.
///
/// Serves fixtures and already-collected samples. The period and interval
/// arguments are accepted and ignored, since windowing belongs to sources
/// that produce data. Unknown symbols fail with
/// [`FetchError::UnknownSymbol`].
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, PriceSeries>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series under its own symbol, replacing any previous one.
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }
}

impl PriceSource for StaticPriceSource {
    fn fetch(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<PriceSeries, FetchError> {
        let key = symbol.trim().to_uppercase();
        self.series
            .get(&key)
            .cloned()
            .ok_or(FetchError::UnknownSymbol(key))
    }
}
