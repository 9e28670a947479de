//! Shared fixtures for the integration tests.

use bolsa::domain::indicator::IndicatorSpec;
use bolsa::domain::ohlcv::{PriceBar, PriceSeries};
use bolsa::domain::registry::StrategyRegistry;
use bolsa::domain::strategy::{RiskParams, RuleSet, StrategyDefinition};
use chrono::{DateTime, TimeZone, Utc};

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(offset)
}

pub fn make_bar(offset: i64, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
    PriceBar {
        timestamp: day(offset),
        open,
        high,
        low,
        close,
        volume: 10_000,
    }
}

/// Series where open == close and highs/lows hug the close tightly, so
/// nothing intrabar fires unless a test asks for it.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close, close * 1.0001, close * 0.9999, close))
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Builtins plus a short-warmup crossover strategy (SMA 2/4) so tests can
/// trigger entries on a handful of bars.
pub fn registry_with_fast_cross(risk: RiskParams) -> StrategyRegistry {
    let mut registry = StrategyRegistry::with_builtins();
    registry.register(StrategyDefinition {
        id: "fast_cross".into(),
        name: "Fast Crossover".into(),
        indicators: vec![IndicatorSpec::sma("sma1", 2), IndicatorSpec::sma("sma2", 4)],
        rules: RuleSet::SmaCross,
        risk,
    });
    registry
}
