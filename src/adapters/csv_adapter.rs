//! CSV file data adapter.
//!
//! Reads `{symbol}.csv` from a base directory, expecting a header row of
//! `date,open,high,low,close,volume` with ISO dates. Bars outside the
//! requested range are dropped before validation.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::BolsaError;
use crate::domain::ohlcv::{DateRange, PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_err(symbol: &str, reason: impl Into<String>) -> BolsaError {
    BolsaError::Data {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, BolsaError>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| data_err(symbol, format!("missing {} column", name)))?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| data_err(symbol, format!("invalid {} value \"{}\": {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries, BolsaError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| data_err(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| data_err(symbol, format!("invalid date \"{}\": {}", date_str, e)))?;

            if !range.contains(date) {
                continue;
            }

            let timestamp = date
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
                .and_utc();

            bars.push(PriceBar {
                timestamp,
                open: parse_field(&record, 1, "open", symbol)?,
                high: parse_field(&record, 2, "high", symbol)?,
                low: parse_field(&record, 3, "low", symbol)?,
                close: parse_field(&record, 4, "close", symbol)?,
                volume: parse_field(&record, 5, "volume", symbol)?,
            });
        }

        PriceSeries::new(bars)
    }
}
