//! Strategy definitions: indicator requirements plus entry/exit/risk rules.
//!
//! Rule sets are a closed enum rather than a parsed expression language:
//! every built-in strategy is a concrete variant resolved by the registry,
//! so there is no dynamic lookup and nothing to fail at evaluation time.

use super::indicator::{crossover, IndicatorSeries, IndicatorSpec};
use super::position::Direction;

/// Optional risk overlay for a strategy; each percentage is a fraction in
/// (0, 1) when present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskParams {
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub breakeven_pct: Option<f64>,
}

/// Entry/exit rules over the strategy's computed indicators.
///
/// `SmaCross` expects its fast series at indicator slot 0 and slow at slot 1,
/// in the order the definition lists its specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSet {
    SmaCross,
    BuyAndHold,
}

/// True at the first index where both series have a defined value. A cross
/// that happened during warm-up is invisible to [`crossover`], so the entry
/// rule treats the prevailing relation at this bar as an entry signal.
fn warmup_completes_at(a: &[Option<f64>], b: &[Option<f64>], i: usize) -> bool {
    let defined = |j: usize| a[j].is_some() && b[j].is_some();
    i < a.len() && i < b.len() && defined(i) && (i == 0 || !defined(i - 1))
}

impl RuleSet {
    /// Entry signal at bar `i`, evaluated only when no position is open.
    /// Long and short rules are mutually exclusive per bar.
    pub fn entry_signal(&self, indicators: &[IndicatorSeries], i: usize) -> Option<Direction> {
        match self {
            RuleSet::SmaCross => {
                let fast = &indicators[0].values;
                let slow = &indicators[1].values;
                if crossover(fast, slow, i) {
                    Some(Direction::Long)
                } else if crossover(slow, fast, i) {
                    Some(Direction::Short)
                } else if warmup_completes_at(fast, slow, i) {
                    match (fast[i], slow[i]) {
                        (Some(f), Some(s)) if f > s => Some(Direction::Long),
                        (Some(f), Some(s)) if f < s => Some(Direction::Short),
                        _ => None,
                    }
                } else {
                    None
                }
            }
            RuleSet::BuyAndHold => {
                if i == 0 {
                    Some(Direction::Long)
                } else {
                    None
                }
            }
        }
    }

    /// Rule-based exit at bar `i` for an open position in `direction`.
    /// Stop-loss/take-profit exits are the engine's concern, not the rule's.
    pub fn exit_fires(
        &self,
        direction: Direction,
        indicators: &[IndicatorSeries],
        i: usize,
    ) -> bool {
        match self {
            RuleSet::SmaCross => {
                let fast = &indicators[0].values;
                let slow = &indicators[1].values;
                match direction {
                    Direction::Long => crossover(slow, fast, i),
                    Direction::Short => crossover(fast, slow, i),
                }
            }
            RuleSet::BuyAndHold => false,
        }
    }
}

/// A fully-resolved strategy. Immutable once built by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDefinition {
    pub id: String,
    pub name: String,
    pub indicators: Vec<IndicatorSpec>,
    pub rules: RuleSet,
    pub risk: RiskParams,
}

impl StrategyDefinition {
    /// Bars required before the first signal can fire. Crossovers need two
    /// consecutive defined points, so the largest window plus one.
    pub fn warmup_bars(&self) -> usize {
        self.indicators
            .iter()
            .map(|spec| spec.window + 1)
            .max()
            .unwrap_or(1)
    }
}
