//! Command line front end for flashlab scenarios.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use flashlab_scenario::{report, Preset, ScenarioRun, Simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "flashlab")]
#[command(about = "Simulate a flash-loan price manipulation attack against a lending protocol")]
#[command(version)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default `env_logger` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run one scenario and print every step
    Run {
        /// baseline, slippage, per-tx-cap, circuit-breaker or twap
        preset: Option<Preset>,

        /// TOML file overriding the default parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only print states and the outcome, without commit summaries
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run every preset and print a comparison table
    All {
        /// TOML file overriding the default parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    Config,
}

/// Run a parsed command, writing the report to `out`.
///
/// A defense stopping the attack is reported, not returned as an error.
pub fn execute(command: &Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Run {
            preset,
            config,
            quiet,
        } => {
            let base = load_config(config.as_deref())?;
            let simulation = match (preset, config) {
                (Some(preset), _) => Simulation::for_preset(&base, *preset)?,
                (None, Some(path)) => Simulation::new(path.display().to_string(), base)?,
                (None, None) => Simulation::for_preset(&base, Preset::Baseline)?,
            };
            let name = simulation.name().to_string();
            let run = simulation
                .run()
                .with_context(|| format!("scenario '{}' failed", name))?;

            writeln!(out, "{}", report::render_run(&run, *quiet))?;
            if !quiet {
                writeln!(out)?;
                writeln!(out, "{}", report::DEFENSE_NOTES)?;
            }
        }
        Command::All { config } => {
            let base = load_config(config.as_deref())?;
            let runs = run_all(&base)?;
            writeln!(out, "{}", report::render_comparison(&runs))?;
        }
        Command::Config => {
            let text = SimulationConfig::default()
                .to_toml()
                .context("Failed to serialize default config")?;
            write!(out, "{}", text)?;
        }
    }
    Ok(())
}

/// Run every preset on top of `base`.
pub fn run_all(base: &SimulationConfig) -> Result<Vec<ScenarioRun>> {
    Preset::ALL
        .into_iter()
        .map(|preset| {
            Simulation::for_preset(base, preset)?
                .run()
                .with_context(|| format!("scenario '{}' failed", preset))
        })
        .collect()
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SimulationConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => Ok(SimulationConfig::default()),
    }
}
