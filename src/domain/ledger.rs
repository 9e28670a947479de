//! Trade ledger: append-only record of closed trades plus derived
//! aggregates. Frozen once the run finishes.

use super::position::ClosedTrade;

#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    trades: Vec<ClosedTrade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        TradeLedger { trades: Vec::new() }
    }

    pub fn record(&mut self, trade: ClosedTrade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[ClosedTrade] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<ClosedTrade> {
        self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// A win is strictly positive PnL; break-even trades are not wins.
    pub fn wins(&self) -> usize {
        self.trades.iter().filter(|t| t.is_win()).count()
    }

    /// Fraction of winning trades in [0, 1]; 0 when there are no trades.
    pub fn win_rate(&self) -> f64 {
        if self.trades.is_empty() {
            return 0.0;
        }
        self.wins() as f64 / self.trades.len() as f64
    }

    /// Mean of per-trade return percentages, skipping trades whose return
    /// is unavailable; 0 when nothing contributes.
    pub fn avg_return_pct(&self) -> f64 {
        let returns: Vec<f64> = self.trades.iter().filter_map(|t| t.return_pct).collect();
        if returns.is_empty() {
            return 0.0;
        }
        returns.iter().sum::<f64>() / returns.len() as f64
    }
}
