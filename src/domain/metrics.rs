//! Performance metrics and numeric sanitization.
//!
//! Every scalar leaving this module is rounded to two decimal places and is
//! guaranteed finite: NaN/Inf collapse to 0 for scalars, and to `None` for
//! time-series points, so a chart consumer can tell "no value here" apart
//! from "value is zero".

use serde::Serialize;

use super::engine::EquityPoint;
use super::ledger::TradeLedger;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return_pct: f64,
    pub cagr_pct: f64,
    pub sharpe: f64,
    pub max_drawdown_pct: f64,
    pub trades: usize,
    pub winrate_pct: f64,
    pub avg_return_per_trade_pct: f64,
}

impl Metrics {
    pub fn compute(equity_curve: &[EquityPoint], ledger: &TradeLedger) -> Self {
        Metrics {
            total_return_pct: safe_metric(total_return_pct(equity_curve)),
            cagr_pct: safe_metric(cagr_pct(equity_curve)),
            sharpe: safe_metric(sharpe(equity_curve)),
            max_drawdown_pct: safe_metric(max_drawdown_pct(equity_curve)),
            trades: ledger.trade_count(),
            winrate_pct: safe_metric(ledger.win_rate() * 100.0),
            avg_return_per_trade_pct: safe_metric(ledger.avg_return_pct()),
        }
    }
}

/// `(last / first - 1) × 100`.
fn total_return_pct(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) if first.equity > 0.0 => {
            (last.equity / first.equity - 1.0) * 100.0
        }
        _ => 0.0,
    }
}

/// Compound annual growth rate over the run's elapsed calendar time,
/// `(last/first)^(365.25/elapsed_days) - 1`, with elapsed_days floored at 1.
/// Zero when equity is non-positive at either end.
fn cagr_pct(equity_curve: &[EquityPoint]) -> f64 {
    let (first, last) = match (equity_curve.first(), equity_curve.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return 0.0,
    };
    if first.equity <= 0.0 || last.equity <= 0.0 {
        return 0.0;
    }
    let elapsed_days = (last.timestamp - first.timestamp).num_days().max(1) as f64;
    ((last.equity / first.equity).powf(DAYS_PER_YEAR / elapsed_days) - 1.0) * 100.0
}

/// Annualized Sharpe ratio: `mean(daily returns) / stdev × sqrt(252)`.
/// Zero with fewer than two return observations or zero volatility.
fn sharpe(equity_curve: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .filter_map(|w| {
            if w[0].equity > 0.0 {
                Some(w[1].equity / w[0].equity - 1.0)
            } else {
                None
            }
        })
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    // sample standard deviation (n - 1)
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stdev = variance.sqrt();

    if stdev == 0.0 {
        return 0.0;
    }
    mean / stdev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest percentage decline from the running equity peak; ≤ 0.
fn max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < worst {
                worst = dd;
            }
        }
    }
    worst
}

/// Round to two decimals, collapsing non-finite values to 0.
pub fn safe_metric(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Replace non-finite points with `None`; valid numbers pass through.
pub fn sanitize_series<I>(values: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .map(|v| if v.is_finite() { Some(v) } else { None })
        .collect()
}

/// Like [`sanitize_series`], for series that already carry missing points.
pub fn sanitize_optional<I>(values: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::ClosedTrade;
    use chrono::{DateTime, TimeZone, Utc};

    fn time(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn make_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                timestamp: time(1) + chrono::Duration::days(i as i64),
                equity,
                cash: equity,
                open_size: 0,
            })
            .collect()
    }

    fn make_trade(pnl: f64, return_pct: f64) -> ClosedTrade {
        ClosedTrade {
            entry_time: time(1),
            exit_time: Some(time(2)),
            entry_price: 100.0,
            exit_price: Some(100.0),
            size: 10,
            pnl: Some(pnl),
            return_pct: Some(return_pct),
            duration_seconds: Some(86_400),
        }
    }

    #[test]
    fn flat_equity_all_zero() {
        let metrics = Metrics::compute(&make_curve(&[100.0; 10]), &TradeLedger::new());
        assert_eq!(metrics.total_return_pct, 0.0);
        assert_eq!(metrics.cagr_pct, 0.0);
        assert_eq!(metrics.sharpe, 0.0);
        assert_eq!(metrics.max_drawdown_pct, 0.0);
        assert_eq!(metrics.trades, 0);
        assert_eq!(metrics.winrate_pct, 0.0);
    }

    #[test]
    fn total_return_rounded() {
        let metrics = Metrics::compute(&make_curve(&[100.0, 110.5559]), &TradeLedger::new());
        assert!((metrics.total_return_pct - 10.56).abs() < 1e-9);
    }

    #[test]
    fn total_return_negative() {
        let metrics = Metrics::compute(&make_curve(&[100.0, 90.0]), &TradeLedger::new());
        assert!((metrics.total_return_pct - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn cagr_one_year_doubling() {
        let mut curve = make_curve(&[100.0, 200.0]);
        curve[1].timestamp = curve[0].timestamp + chrono::Duration::days(365);
        let raw = cagr_pct(&curve);
        // (2)^(365.25/365) - 1 ≈ 100.1%
        assert!((raw - 100.0).abs() < 1.0);
    }

    #[test]
    fn cagr_elapsed_days_floored_at_one() {
        // two points one hour apart: elapsed days = 0 → floored to 1
        let mut curve = make_curve(&[100.0, 101.0]);
        curve[1].timestamp = curve[0].timestamp + chrono::Duration::hours(1);
        let raw = cagr_pct(&curve);
        assert!(raw.is_finite());
        assert!(raw > 0.0);
    }

    #[test]
    fn cagr_zero_on_nonpositive_equity() {
        assert_eq!(cagr_pct(&make_curve(&[-5.0, 100.0])), 0.0);
        assert_eq!(cagr_pct(&make_curve(&[100.0, -5.0])), 0.0);
    }

    #[test]
    fn sharpe_zero_volatility() {
        assert_eq!(sharpe(&make_curve(&[100.0, 100.0, 100.0, 100.0])), 0.0);
    }

    #[test]
    fn sharpe_zero_with_single_return() {
        assert_eq!(sharpe(&make_curve(&[100.0, 105.0])), 0.0);
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        // constant 1% returns have zero stdev; perturb slightly
        let mut values = values;
        values[10] *= 1.001;
        assert!(sharpe(&make_curve(&values)) > 0.0);
    }

    #[test]
    fn max_drawdown_known_value() {
        let curve = make_curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        let dd = max_drawdown_pct(&curve);
        assert!((dd - (80.0 - 110.0) / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_never_positive() {
        let curve = make_curve(&[100.0, 120.0, 150.0]);
        assert_eq!(max_drawdown_pct(&curve), 0.0);
    }

    #[test]
    fn winrate_from_ledger() {
        let mut ledger = TradeLedger::new();
        ledger.record(make_trade(10.0, 1.0));
        ledger.record(make_trade(-5.0, -0.5));
        let metrics = Metrics::compute(&make_curve(&[100.0, 101.0]), &ledger);
        assert!((metrics.winrate_pct - 50.0).abs() < 1e-9);
        assert_eq!(metrics.trades, 2);
        assert!((metrics.avg_return_per_trade_pct - 0.25).abs() < 1e-9);
    }

    #[test]
    fn winrate_bounds() {
        let mut ledger = TradeLedger::new();
        for _ in 0..3 {
            ledger.record(make_trade(10.0, 1.0));
        }
        let metrics = Metrics::compute(&make_curve(&[100.0, 101.0]), &ledger);
        assert!((metrics.winrate_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_curve_safe() {
        let metrics = Metrics::compute(&[], &TradeLedger::new());
        assert_eq!(metrics.total_return_pct, 0.0);
        assert_eq!(metrics.cagr_pct, 0.0);
        assert_eq!(metrics.sharpe, 0.0);
        assert_eq!(metrics.max_drawdown_pct, 0.0);
    }

    #[test]
    fn safe_metric_collapses_non_finite() {
        assert_eq!(safe_metric(f64::NAN), 0.0);
        assert_eq!(safe_metric(f64::INFINITY), 0.0);
        assert_eq!(safe_metric(f64::NEG_INFINITY), 0.0);
        assert!((safe_metric(1.23456) - 1.23).abs() < 1e-12);
    }

    #[test]
    fn sanitize_series_maps_non_finite_to_none() {
        let out = sanitize_series(vec![1.0, f64::NAN, f64::INFINITY, 0.0]);
        assert_eq!(out, vec![Some(1.0), None, None, Some(0.0)]);
    }

    #[test]
    fn sanitize_optional_preserves_existing_gaps() {
        let out = sanitize_optional(vec![Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(out, vec![Some(1.0), None, None]);
    }
}
