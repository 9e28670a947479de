//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod indicator;
pub mod strategy;
pub mod registry;
pub mod engine;
pub mod ledger;
pub mod metrics;
pub mod chart;
pub mod backtest;
pub mod error;
