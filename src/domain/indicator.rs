//! Indicator computation: derived series aligned to a price series.
//!
//! Each indicator value is `Some(f64)` once its window is filled and `None`
//! before that. The `None` positions propagate downstream as "not yet
//! available" and are never coerced to zero.

use serde::Serialize;

use super::ohlcv::{PriceBar, PriceSeries};

/// Which bar field an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceField {
    Open,
    High,
    Low,
    Close,
}

impl SourceField {
    pub fn extract(&self, bar: &PriceBar) -> f64 {
        match self {
            SourceField::Open => bar.open,
            SourceField::High => bar.high,
            SourceField::Low => bar.low,
            SourceField::Close => bar.close,
        }
    }
}

/// A single indicator requested by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSpec {
    pub name: String,
    pub source: SourceField,
    pub window: usize,
}

impl IndicatorSpec {
    pub fn sma(name: &str, window: usize) -> Self {
        IndicatorSpec {
            name: name.to_string(),
            source: SourceField::Close,
            window,
        }
    }
}

/// One aligned numeric sequence per indicator; same length as the price
/// series it was computed from.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub spec: IndicatorSpec,
    pub values: Vec<Option<f64>>,
}

/// Simple moving average of `spec.window` bars over `spec.source`.
///
/// Defined only from index `window - 1` on; earlier positions are `None`.
/// Pure function of the series and the spec, recomputed in full per run.
pub fn compute(series: &PriceSeries, spec: &IndicatorSpec) -> IndicatorSeries {
    let bars = series.bars();
    let n = spec.window;
    let mut values: Vec<Option<f64>> = Vec::with_capacity(bars.len());

    if n == 0 {
        values.resize(bars.len(), None);
        return IndicatorSeries {
            spec: spec.clone(),
            values,
        };
    }

    let mut running_sum = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        running_sum += spec.source.extract(bar);
        if i >= n {
            running_sum -= spec.source.extract(&bars[i - n]);
        }
        if i >= n - 1 {
            values.push(Some(running_sum / n as f64));
        } else {
            values.push(None);
        }
    }

    IndicatorSeries {
        spec: spec.clone(),
        values,
    }
}

pub fn compute_all(series: &PriceSeries, specs: &[IndicatorSpec]) -> Vec<IndicatorSeries> {
    specs.iter().map(|spec| compute(series, spec)).collect()
}

/// Crossover signal primitive: true at index `i` iff `a` overtakes `b`
/// between bars `i-1` and `i`. False at index 0 and wherever either series
/// is not yet available.
pub fn crossover(a: &[Option<f64>], b: &[Option<f64>], i: usize) -> bool {
    if i == 0 || i >= a.len() || i >= b.len() {
        return false;
    }
    match (a[i], b[i], a[i - 1], b[i - 1]) {
        (Some(a_now), Some(b_now), Some(a_prev), Some(b_prev)) => {
            a_now > b_now && a_prev <= b_prev
        }
        _ => false,
    }
}
