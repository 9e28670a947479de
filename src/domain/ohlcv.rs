//! OHLCV bar and price series representation.

use chrono::{DateTime, NaiveDate, Utc};

use super::error::BolsaError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive finite number", name));
            }
        }
        if self.volume < 0 {
            return Err("volume must be non-negative".into());
        }
        Ok(())
    }
}

/// A validated OHLCV series: non-empty, strictly ascending timestamps,
/// every bar well-formed. Construction is the only validation point; the
/// engine can assume these invariants hold.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, BolsaError> {
        if bars.is_empty() {
            return Err(BolsaError::EmptyPriceSeries);
        }
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|reason| BolsaError::InvalidSeries {
                reason: format!("bar {}: {}", i, reason),
            })?;
        }
        for w in bars.windows(2) {
            if w[1].timestamp <= w[0].timestamp {
                return Err(BolsaError::InvalidSeries {
                    reason: format!(
                        "timestamps not strictly ascending at {}",
                        w[1].timestamp
                    ),
                });
            }
        }
        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }
}

/// A validated start/end date pair for data retrieval. The core itself
/// never fetches data; this type exists so the boundary check (`start` must
/// precede `end`) happens before any work does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BolsaError> {
        if start >= end {
            return Err(BolsaError::InvalidDateRange);
        }
        Ok(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
