//! CSV holdings files with the header
//! `Asset Type,Symbol,Quantity,Purchase Price`.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{AssetClass, Holding};
use crate::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct HoldingRow {
    #[serde(rename = "Asset Type")]
    asset_type: AssetClass,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Quantity")]
    quantity: f64,
    #[serde(rename = "Purchase Price")]
    purchase_price: f64,
}

/// Read holdings from CSV text.
///
/// Strict per row: the first malformed or invalid record fails the whole
/// load, with its line number in the error. The semantic checks are the
/// same ones the valuator applies ([`Holding::validate`]); callers that
/// want to value around bad records can hand the valuator holdings built
/// some other way.
pub fn read_holdings<R: io::Read>(reader: R) -> Result<Vec<Holding>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut holdings = Vec::new();
    for (index, row) in csv_reader.deserialize::<HoldingRow>().enumerate() {
        let line = index + 2; // line 1 is the header
        let row = row?;
        let holding = Holding::new(row.asset_type, &row.symbol, row.quantity, row.purchase_price)
            .map_err(|err| match err {
                Error::InvalidHolding { symbol, reason } => Error::InvalidHolding {
                    symbol,
                    reason: format!("{reason} (line {line})"),
                },
                other => other,
            })?;
        holdings.push(holding);
    }
    Ok(holdings)
}

/// Read holdings from a CSV file on disk.
pub fn load_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>> {
    let file = File::open(path)?;
    read_holdings(file)
}

/// Write holdings as CSV with the standard header.
pub fn write_holdings<W: io::Write>(writer: W, holdings: &[Holding]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for holding in holdings {
        csv_writer.serialize(HoldingRow {
            asset_type: holding.asset_class,
            symbol: holding.symbol.clone(),
            quantity: holding.quantity,
            purchase_price: holding.purchase_price,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write holdings to a CSV file on disk.
pub fn write_holdings_file(path: impl AsRef<Path>, holdings: &[Holding]) -> Result<()> {
    let file = File::create(path)?;
    write_holdings(file, holdings)
}
