//! Bar-by-bar simulation engine.
//!
//! One run owns one cash balance, at most one open position, and one equity
//! curve; nothing is shared between runs. Per bar, in order: break-even
//! ratchet, exit checks (intrabar stop-loss before take-profit, then the
//! rule-based exit), entry check when flat, equity mark at the close. After
//! the last bar any open position is force-closed at the final close price.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::indicator::IndicatorSeries;
use super::ledger::TradeLedger;
use super::ohlcv::{PriceBar, PriceSeries};
use super::position::{ClosedTrade, Direction, Position};
use super::strategy::{RiskParams, StrategyDefinition};

/// Which price a rule-triggered fill executes at.
///
/// `SignalClose` fills at the signal bar's close: deterministic and never
/// peeks ahead. `NextOpen` fills at the following bar's open when one
/// exists, falling back to the signal close on the last bar. A run uses
/// exactly one policy throughout. Intrabar stop/take-profit exits always
/// fill at their trigger price regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    SignalClose,
    NextOpen,
}

impl std::str::FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signal_close" => Ok(ExecutionPolicy::SignalClose),
            "next_open" => Ok(ExecutionPolicy::NextOpen),
            other => Err(format!(
                "unknown execution policy \"{other}\" (expected signal_close or next_open)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub starting_capital: f64,
    pub commission_rate: f64,
    pub policy: ExecutionPolicy,
}

/// One equity observation per bar: `equity = cash + open_size × close`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub cash: f64,
    pub open_size: i64,
}

/// Everything the loop produces: the per-bar equity trace and the ledger of
/// closed trades. Every run ends flat, so there is no open position here.
#[derive(Debug)]
pub struct SimulationTrace {
    pub equity_curve: Vec<EquityPoint>,
    pub ledger: TradeLedger,
    pub final_cash: f64,
}

/// Run the full simulation over `series`. Indicators must be aligned to the
/// series (one value slot per bar); the caller computes them beforehand.
pub fn simulate(
    series: &PriceSeries,
    strategy: &StrategyDefinition,
    indicators: &[IndicatorSeries],
    config: &EngineConfig,
) -> SimulationTrace {
    let bars = series.bars();
    let mut cash = config.starting_capital;
    let mut position: Option<Position> = None;
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());
    let mut ledger = TradeLedger::new();

    for (i, bar) in bars.iter().enumerate() {
        // 1. Break-even ratchet: once unrealized gain reaches the threshold,
        // move the stop to entry. One-directional; never relaxes.
        if let Some(pos) = position.as_mut() {
            if let Some(threshold) = strategy.risk.breakeven_pct {
                if pos.unrealized_gain_pct(bar.close) >= threshold && pos.stop_worse_than_entry() {
                    pos.stop_loss = Some(pos.entry_price);
                }
            }
        }

        // 2. Exit checks. Stop-loss is checked before take-profit when the
        // bar touches both; rule exits only run when neither triggered.
        if let Some(pos) = position.as_ref() {
            let trigger_price = if pos.stop_loss_touched(bar) {
                pos.stop_loss
            } else if pos.take_profit_touched(bar) {
                pos.take_profit
            } else {
                None
            };

            if let Some(price) = trigger_price {
                let pos = position.take().expect("position checked above");
                cash = close_position(pos, price, bar.timestamp, config, &mut ledger, cash);
            } else if strategy.rules.exit_fires(pos.direction(), indicators, i) {
                let price = execution_price(bars, i, config.policy);
                let pos = position.take().expect("position checked above");
                cash = close_position(pos, price, bar.timestamp, config, &mut ledger, cash);
            }
        }

        // 3. Entry check, only when flat. An exit earlier in the same bar
        // leaves the engine flat, so a reversal can re-enter immediately.
        if position.is_none() {
            if let Some(direction) = strategy.rules.entry_signal(indicators, i) {
                let price = execution_price(bars, i, config.policy);
                position = open_position(
                    direction,
                    price,
                    bar.timestamp,
                    &strategy.risk,
                    config,
                    &mut cash,
                );
            }
        }

        // 4. Equity mark at the bar's close.
        let open_size = position.as_ref().map(|p| p.size).unwrap_or(0);
        equity_curve.push(EquityPoint {
            timestamp: bar.timestamp,
            equity: cash + open_size as f64 * bar.close,
            cash,
            open_size,
        });
    }

    // Terminal liquidation: force-close at the final close so the run ends
    // flat with a reconciled cash balance. The last equity point is restated
    // to the post-liquidation cash (the exit commission lands in it).
    if let Some(pos) = position.take() {
        let last = series.last();
        cash = close_position(pos, last.close, last.timestamp, config, &mut ledger, cash);
        if let Some(point) = equity_curve.last_mut() {
            point.equity = cash;
            point.cash = cash;
            point.open_size = 0;
        }
    }

    SimulationTrace {
        equity_curve,
        ledger,
        final_cash: cash,
    }
}

fn execution_price(bars: &[PriceBar], i: usize, policy: ExecutionPolicy) -> f64 {
    match policy {
        ExecutionPolicy::SignalClose => bars[i].close,
        ExecutionPolicy::NextOpen => {
            if i + 1 < bars.len() {
                bars[i + 1].open
            } else {
                bars[i].close
            }
        }
    }
}

/// Open a position sized by `floor(cash / price)` whole units. Commission is
/// charged on top of the notional, so with a non-zero rate a long entry can
/// leave cash marginally negative. Returns `None` when cash buys zero units.
fn open_position(
    direction: Direction,
    price: f64,
    timestamp: DateTime<Utc>,
    risk: &RiskParams,
    config: &EngineConfig,
    cash: &mut f64,
) -> Option<Position> {
    let units = (*cash / price).floor() as i64;
    if units <= 0 {
        return None;
    }

    let notional = units as f64 * price;
    let commission = notional * config.commission_rate;

    let (size, stop_loss, take_profit) = match direction {
        Direction::Long => {
            *cash -= notional + commission;
            (
                units,
                risk.stop_loss_pct.map(|pct| price * (1.0 - pct)),
                risk.take_profit_pct.map(|pct| price * (1.0 + pct)),
            )
        }
        Direction::Short => {
            *cash += notional - commission;
            (
                -units,
                risk.stop_loss_pct.map(|pct| price * (1.0 + pct)),
                risk.take_profit_pct.map(|pct| price * (1.0 - pct)),
            )
        }
    };

    Some(Position {
        entry_time: timestamp,
        entry_price: price,
        size,
        stop_loss,
        take_profit,
        entry_commission: commission,
    })
}

fn close_position(
    position: Position,
    price: f64,
    timestamp: DateTime<Utc>,
    config: &EngineConfig,
    ledger: &mut TradeLedger,
    cash: f64,
) -> f64 {
    let quantity = position.size.unsigned_abs() as f64;
    let notional = quantity * price;
    let commission = notional * config.commission_rate;

    let cash = if position.is_long() {
        cash + notional - commission
    } else {
        cash - notional - commission
    };

    let pnl =
        position.size as f64 * (price - position.entry_price) - position.entry_commission
            - commission;
    let return_pct = position.unrealized_gain_pct(price) * 100.0;
    let duration = timestamp - position.entry_time;

    ledger.record(ClosedTrade {
        entry_time: position.entry_time,
        exit_time: Some(timestamp),
        entry_price: position.entry_price,
        exit_price: Some(price),
        size: position.size,
        pnl: Some(pnl),
        return_pct: Some(return_pct),
        duration_seconds: Some(duration.num_seconds()),
    });

    cash
}
