//! `shunt` -- offline CLI for the shunt gateway classifiers.
//!
//! Provides the following subcommands:
//!
//! - `shunt analyze` -- Score a prompt's complexity and show the signals.
//! - `shunt route` -- Show the routing decision a prompt would get.
//! - `shunt check` -- Run the quality checker over a response.
//!
//! Everything runs locally against the deterministic classifiers; no
//! back-end is contacted.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use shunt_core::{
    AlwaysComplexStrategy, AlwaysFastStrategy, ConfidenceAwareStrategy, QualityChecker,
    RoutingEngine, RoutingStrategy, ThresholdStrategy,
};
use shunt_types::Settings;

/// shunt gateway CLI.
#[derive(Parser)]
#[command(name = "shunt", about = "Inspect the shunt gateway classifiers", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Score a prompt's complexity and show the detected signals.
    Analyze {
        /// The prompt text to analyze.
        prompt: String,
    },

    /// Show the routing decision a prompt would get.
    Route {
        /// The prompt text to route.
        prompt: String,

        /// Routing strategy to apply.
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Threshold)]
        strategy: StrategyArg,
    },

    /// Run the quality checker over a response.
    Check {
        /// The response text to check.
        response: String,

        /// Complexity score of the originating prompt.
        #[arg(long, default_value_t = 50)]
        complexity: u8,
    },
}

/// Selectable routing strategies.
#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Threshold,
    Confidence,
    AlwaysFast,
    AlwaysComplex,
}

impl StrategyArg {
    fn build(self, settings: &Settings) -> Box<dyn RoutingStrategy> {
        match self {
            Self::Threshold => Box::new(ThresholdStrategy::new(
                settings.complexity_threshold_low,
                settings.complexity_threshold_high,
            )),
            Self::Confidence => Box::new(ConfidenceAwareStrategy::new(
                settings.complexity_threshold_low,
                settings.complexity_threshold_high,
                0.6,
            )),
            Self::AlwaysFast => Box::new(AlwaysFastStrategy),
            Self::AlwaysComplex => Box::new(AlwaysComplexStrategy),
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => Settings::default(),
    };
    Ok(settings.normalized())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Analyze { prompt } => {
            let engine = RoutingEngine::new(settings);
            let analysis = engine.analyze(&prompt);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Commands::Route { prompt, strategy } => {
            let engine = RoutingEngine::new(settings.clone())
                .with_strategy(strategy.build(&settings));
            let (analysis, decision) = engine.route_with_analysis(&prompt);
            let report = serde_json::json!({
                "analysis": analysis,
                "decision": decision,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Check {
            response,
            complexity,
        } => {
            let checker = QualityChecker::new(&settings);
            let assessment = checker.check(&response, complexity);
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
    }

    Ok(())
}
