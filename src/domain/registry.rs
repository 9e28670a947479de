//! Strategy registry: canonical identifiers, alias normalization, and the
//! table of built-in strategy definitions.
//!
//! Resolution is a pure lookup over an explicit table. New entries can be
//! registered at process start; nothing is loaded dynamically.

use std::collections::HashMap;

use super::error::BolsaError;
use super::indicator::IndicatorSpec;
use super::strategy::{RiskParams, RuleSet, StrategyDefinition};

pub struct StrategyRegistry {
    entries: HashMap<String, StrategyDefinition>,
    aliases: HashMap<String, String>,
}

impl StrategyRegistry {
    /// Registry pre-populated with the built-in strategies and the UI-facing
    /// alias table. "EMA" mapping to `sma_cross` is a carried-over
    /// simplification: the alias exists, a separate EMA rule set does not.
    pub fn with_builtins() -> Self {
        let mut registry = StrategyRegistry {
            entries: HashMap::new(),
            aliases: HashMap::new(),
        };

        registry.register(StrategyDefinition {
            id: "sma_cross".into(),
            name: "SMA Crossover".into(),
            indicators: vec![
                IndicatorSpec::sma("sma1", 50),
                IndicatorSpec::sma("sma2", 100),
            ],
            rules: RuleSet::SmaCross,
            risk: RiskParams::default(),
        });

        registry.register(StrategyDefinition {
            id: "la_bomba".into(),
            name: "La Bomba".into(),
            indicators: vec![
                IndicatorSpec::sma("sma1", 10),
                IndicatorSpec::sma("sma2", 50),
            ],
            rules: RuleSet::SmaCross,
            risk: RiskParams {
                stop_loss_pct: Some(0.01),
                take_profit_pct: Some(0.02),
                breakeven_pct: Some(0.01),
            },
        });

        registry.register(StrategyDefinition {
            id: "buy_and_hold".into(),
            name: "Buy and Hold".into(),
            indicators: vec![],
            rules: RuleSet::BuyAndHold,
            risk: RiskParams::default(),
        });

        registry.add_alias("SMA", "sma_cross");
        registry.add_alias("EMA", "sma_cross");
        registry.add_alias("LA_BOMBA", "la_bomba");

        registry
    }

    pub fn register(&mut self, definition: StrategyDefinition) {
        self.entries.insert(definition.id.clone(), definition);
    }

    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(alias.to_string(), canonical.to_string());
    }

    /// Map a UI-facing name to a canonical identifier. Unaliased names pass
    /// through unchanged.
    pub fn canonical_id<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&StrategyDefinition, BolsaError> {
        let id = self.canonical_id(name);
        self.entries
            .get(id)
            .ok_or_else(|| BolsaError::UnknownStrategy {
                name: name.to_string(),
            })
    }

    pub fn strategy_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        StrategyRegistry::with_builtins()
    }
}
