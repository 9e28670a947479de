//! Backtest run orchestration: resolve the strategy, validate the request,
//! compute indicators, simulate, and reduce to a `RunResult`.
//!
//! All input validation happens before any simulation work, so a failed run
//! never produces partial output.

use serde::Serialize;

use super::chart::{build_equity_chart, build_price_chart, EquityChart, PriceChart};
use super::engine::{simulate, EngineConfig, EquityPoint, ExecutionPolicy};
use super::error::BolsaError;
use super::indicator::compute_all;
use super::metrics::Metrics;
use super::ohlcv::PriceSeries;
use super::position::ClosedTrade;
use super::registry::StrategyRegistry;

/// One backtest request. The series is already validated by construction;
/// the scalar fields are validated by [`run`]. Ticker and interval metadata
/// stay with the caller.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub price_series: PriceSeries,
    pub strategy_id: String,
    pub starting_capital: f64,
    pub commission_rate: f64,
    pub policy: ExecutionPolicy,
}

impl RunRequest {
    pub fn new(price_series: PriceSeries, strategy_id: &str, starting_capital: f64) -> Self {
        RunRequest {
            price_series,
            strategy_id: strategy_id.to_string(),
            starting_capital,
            commission_rate: 0.0,
            policy: ExecutionPolicy::default(),
        }
    }
}

/// The terminal output of a run. Built once, read-only thereafter.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub metrics: Metrics,
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
    pub price_chart: PriceChart,
    pub equity_chart: EquityChart,
}

pub fn run(registry: &StrategyRegistry, request: &RunRequest) -> Result<RunResult, BolsaError> {
    if !request.starting_capital.is_finite() || request.starting_capital <= 0.0 {
        return Err(BolsaError::InvalidCapital {
            value: request.starting_capital,
        });
    }
    if !request.commission_rate.is_finite()
        || request.commission_rate < 0.0
        || request.commission_rate >= 1.0
    {
        return Err(BolsaError::InvalidCommission {
            value: request.commission_rate,
        });
    }

    let strategy = registry.resolve(&request.strategy_id)?;

    let have = request.price_series.len();
    let need = strategy.warmup_bars();
    if have < need {
        return Err(BolsaError::InsufficientData {
            strategy: strategy.id.clone(),
            bars: have,
            minimum: need,
        });
    }

    let indicators = compute_all(&request.price_series, &strategy.indicators);

    let config = EngineConfig {
        starting_capital: request.starting_capital,
        commission_rate: request.commission_rate,
        policy: request.policy,
    };
    let trace = simulate(&request.price_series, strategy, &indicators, &config);

    let metrics = Metrics::compute(&trace.equity_curve, &trace.ledger);
    let price_chart = build_price_chart(&request.price_series, &indicators, trace.ledger.trades());
    let equity_chart = build_equity_chart(&trace.equity_curve);

    Ok(RunResult {
        metrics,
        trades: trace.ledger.into_trades(),
        equity_curve: trace.equity_curve,
        price_chart,
        equity_chart,
    })
}
