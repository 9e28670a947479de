//! CLI definition and dispatch.
//!
//! The binary is the calling collaborator the core expects: it fetches data
//! (CSV adapter), validates the request boundary, invokes the run, prints a
//! human summary to stderr, and emits the full `RunResult` as JSON on
//! stdout. Failures are emitted as `{"error": "..."}` with a non-zero exit
//! code keyed to the error class.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run as run_core, RunRequest};
use crate::domain::engine::ExecutionPolicy;
use crate::domain::error::BolsaError;
use crate::domain::ohlcv::DateRange;
use crate::domain::registry::StrategyRegistry;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_CAPITAL: f64 = 10_000.0;

#[derive(Parser, Debug)]
#[command(name = "bolsa", about = "Strategy backtest engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest against CSV price data
    Run {
        /// Directory containing {symbol}.csv files
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Strategy identifier or UI alias (see list-strategies)
        #[arg(long)]
        strategy: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        capital: Option<f64>,
        /// Commission rate as a fraction in [0, 1)
        #[arg(long)]
        commission: Option<f64>,
        /// Execution price policy: signal_close or next_open
        #[arg(long)]
        policy: Option<ExecutionPolicy>,
        /// Optional INI file with a [backtest] section for defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List registered strategy identifiers
    ListStrategies,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            data_dir,
            symbol,
            strategy,
            start,
            end,
            capital,
            commission,
            policy,
            config,
        } => run_backtest(
            &data_dir, &symbol, &strategy, start, end, capital, commission, policy,
            config.as_ref(),
        ),
        Command::ListStrategies => run_list_strategies(),
    }
}

/// Effective run settings: CLI flag wins, then the config file's
/// `[backtest]` section, then the built-in default.
#[derive(Debug)]
pub struct RunSettings {
    pub capital: f64,
    pub commission: f64,
    pub policy: ExecutionPolicy,
}

pub fn load_settings(
    capital: Option<f64>,
    commission: Option<f64>,
    policy: Option<ExecutionPolicy>,
    config_path: Option<&PathBuf>,
) -> Result<RunSettings, BolsaError> {
    let config = match config_path {
        Some(path) => Some(FileConfigAdapter::from_file(path).map_err(|e| {
            BolsaError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            }
        })?),
        None => None,
    };

    let from_config_f64 = |key: &str, default: f64| -> f64 {
        config
            .as_ref()
            .map(|c| c.get_double("backtest", key, default))
            .unwrap_or(default)
    };

    let policy = match policy {
        Some(p) => p,
        None => match config.as_ref().and_then(|c| c.get_string("backtest", "policy")) {
            Some(raw) => raw
                .parse::<ExecutionPolicy>()
                .map_err(|reason| BolsaError::ConfigInvalid {
                    section: "backtest".into(),
                    key: "policy".into(),
                    reason,
                })?,
            None => ExecutionPolicy::default(),
        },
    };

    Ok(RunSettings {
        capital: capital.unwrap_or_else(|| from_config_f64("capital", DEFAULT_CAPITAL)),
        commission: commission.unwrap_or_else(|| from_config_f64("commission", 0.0)),
        policy,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_backtest(
    data_dir: &PathBuf,
    symbol: &str,
    strategy: &str,
    start: NaiveDate,
    end: NaiveDate,
    capital: Option<f64>,
    commission: Option<f64>,
    policy: Option<ExecutionPolicy>,
    config: Option<&PathBuf>,
) -> ExitCode {
    match execute(
        data_dir, symbol, strategy, start, end, capital, commission, policy, config,
    ) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            let payload = serde_json::json!({ "error": err.to_string() });
            println!("{payload}");
            (&err).into()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn execute(
    data_dir: &PathBuf,
    symbol: &str,
    strategy: &str,
    start: NaiveDate,
    end: NaiveDate,
    capital: Option<f64>,
    commission: Option<f64>,
    policy: Option<ExecutionPolicy>,
    config: Option<&PathBuf>,
) -> Result<ExitCode, BolsaError> {
    let settings = load_settings(capital, commission, policy, config)?;
    let range = DateRange::new(start, end)?;

    let adapter = CsvAdapter::new(data_dir.clone());
    let series = adapter.fetch_series(symbol, &range)?;

    let registry = StrategyRegistry::with_builtins();
    let request = RunRequest {
        price_series: series,
        strategy_id: strategy.to_string(),
        starting_capital: settings.capital,
        commission_rate: settings.commission,
        policy: settings.policy,
    };

    let result = run_core(&registry, &request)?;

    eprintln!("Backtest: {} {} to {}", symbol, start, end);
    eprintln!("  Strategy:       {}", registry.canonical_id(strategy));
    eprintln!("  Bars:           {}", result.equity_curve.len());
    eprintln!("  Total Return:   {:.2}%", result.metrics.total_return_pct);
    eprintln!("  CAGR:           {:.2}%", result.metrics.cagr_pct);
    eprintln!("  Sharpe:         {:.2}", result.metrics.sharpe);
    eprintln!("  Max Drawdown:   {:.2}%", result.metrics.max_drawdown_pct);
    eprintln!("  Trades:         {}", result.metrics.trades);
    eprintln!("  Win Rate:       {:.2}%", result.metrics.winrate_pct);

    let json = serde_json::to_string(&result).map_err(|e| BolsaError::Data {
        symbol: symbol.to_string(),
        reason: format!("failed to serialize result: {e}"),
    })?;
    println!("{json}");

    Ok(ExitCode::SUCCESS)
}

fn run_list_strategies() -> ExitCode {
    let registry = StrategyRegistry::with_builtins();
    for id in registry.strategy_ids() {
        println!("{id}");
    }
    ExitCode::SUCCESS
}
