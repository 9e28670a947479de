//! Position tracking and closed-trade records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ohlcv::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

/// The single open position of a run. Owned and mutated exclusively by the
/// simulation engine; `stop_loss` is the only field that changes after entry
/// (the break-even ratchet), `take_profit` never does.
#[derive(Debug, Clone)]
pub struct Position {
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    /// Signed: positive = long, negative = short.
    pub size: i64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub entry_commission: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.size > 0
    }

    pub fn is_short(&self) -> bool {
        self.size < 0
    }

    pub fn direction(&self) -> Direction {
        if self.is_long() {
            Direction::Long
        } else {
            Direction::Short
        }
    }

    /// Unrealized fractional gain at `price`, direction-aware:
    /// `price/entry - 1` for long, `entry/price - 1` for short.
    pub fn unrealized_gain_pct(&self, price: f64) -> f64 {
        if self.is_long() {
            price / self.entry_price - 1.0
        } else {
            self.entry_price / price - 1.0
        }
    }

    /// Whether the bar's intrabar range touches the stop-loss.
    pub fn stop_loss_touched(&self, bar: &PriceBar) -> bool {
        match self.stop_loss {
            Some(stop) if self.is_long() => bar.low <= stop,
            Some(stop) => bar.high >= stop,
            None => false,
        }
    }

    /// Whether the bar's intrabar range touches the take-profit.
    pub fn take_profit_touched(&self, bar: &PriceBar) -> bool {
        match self.take_profit {
            Some(target) if self.is_long() => bar.high >= target,
            Some(target) => bar.low <= target,
            None => false,
        }
    }

    /// True when the current stop is still worse than the entry price
    /// (below it for longs, above it for shorts). The break-even ratchet
    /// only fires while this holds, so it never loosens a stop.
    pub fn stop_worse_than_entry(&self) -> bool {
        match self.stop_loss {
            Some(stop) if self.is_long() => stop < self.entry_price,
            Some(stop) => stop > self.entry_price,
            None => false,
        }
    }
}

/// Immutable record of a closed position. The optional fields mirror the
/// persistence-facing shape: a trade that never filled an exit carries
/// `None` for exit data, and `duration_seconds` requires both times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTrade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub size: i64,
    pub pnl: Option<f64>,
    pub return_pct: Option<f64>,
    pub duration_seconds: Option<i64>,
}

impl ClosedTrade {
    pub fn is_long(&self) -> bool {
        self.size > 0
    }

    pub fn is_win(&self) -> bool {
        matches!(self.pnl, Some(pnl) if pnl > 0.0)
    }
}
