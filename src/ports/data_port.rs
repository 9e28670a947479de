//! Data access port trait.
//!
//! The core never fetches data itself; a caller-side adapter produces a
//! validated [`PriceSeries`] before the run starts.

use crate::domain::error::BolsaError;
use crate::domain::ohlcv::{DateRange, PriceSeries};

pub trait DataPort {
    fn fetch_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries, BolsaError>;
}
