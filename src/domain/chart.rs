//! Chart-ready output series, timestamp-aligned to the price series.
//!
//! Dates are epoch milliseconds; every numeric array has one slot per bar
//! and uses `None` for "no value here" (missing warm-up indicator points,
//! bars without a trade marker). All values pass through the sanitizer, so
//! none of these arrays ever contains NaN or Inf.

use std::collections::HashMap;

use serde::Serialize;

use super::engine::EquityPoint;
use super::indicator::IndicatorSeries;
use super::metrics::{sanitize_optional, sanitize_series};
use super::ohlcv::PriceSeries;
use super::position::ClosedTrade;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub dates: Vec<i64>,
    pub close: Vec<Option<f64>>,
    pub indicators: Vec<ChartSeries>,
    pub buy_signals: Vec<Option<f64>>,
    pub sell_signals: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityChart {
    pub dates: Vec<i64>,
    pub equity: Vec<Option<f64>>,
}

/// Build the price chart: close overlayed with each indicator, plus buy and
/// sell markers. Buys mark long entries and short covers; sells mark short
/// entries and long exits, each at the traded price.
pub fn build_price_chart(
    series: &PriceSeries,
    indicators: &[IndicatorSeries],
    trades: &[ClosedTrade],
) -> PriceChart {
    let bars = series.bars();
    let dates: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp_millis()).collect();
    let index_of: HashMap<i64, usize> = dates
        .iter()
        .enumerate()
        .map(|(i, &ms)| (ms, i))
        .collect();

    let mut buy_signals: Vec<Option<f64>> = vec![None; bars.len()];
    let mut sell_signals: Vec<Option<f64>> = vec![None; bars.len()];

    for trade in trades {
        let entry_ms = trade.entry_time.timestamp_millis();
        if let Some(&i) = index_of.get(&entry_ms) {
            if trade.is_long() {
                buy_signals[i] = Some(trade.entry_price);
            } else {
                sell_signals[i] = Some(trade.entry_price);
            }
        }
        if let (Some(exit_time), Some(exit_price)) = (trade.exit_time, trade.exit_price) {
            if let Some(&i) = index_of.get(&exit_time.timestamp_millis()) {
                if trade.is_long() {
                    sell_signals[i] = Some(exit_price);
                } else {
                    buy_signals[i] = Some(exit_price);
                }
            }
        }
    }

    PriceChart {
        dates,
        close: sanitize_series(bars.iter().map(|b| b.close)),
        indicators: indicators
            .iter()
            .map(|ind| ChartSeries {
                label: ind.spec.name.clone(),
                values: sanitize_optional(ind.values.iter().copied()),
            })
            .collect(),
        buy_signals: sanitize_optional(buy_signals),
        sell_signals: sanitize_optional(sell_signals),
    }
}

pub fn build_equity_chart(equity_curve: &[EquityPoint]) -> EquityChart {
    EquityChart {
        dates: equity_curve
            .iter()
            .map(|p| p.timestamp.timestamp_millis())
            .collect(),
        equity: sanitize_series(equity_curve.iter().map(|p| p.equity)),
    }
}
