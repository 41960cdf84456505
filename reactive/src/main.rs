//! Scenario runner for keyed component trees.
//!
//! Mounts a traced tree described in a JSON scenario, applies its actions, and
//! prints the final tree together with every lifecycle hook that fired.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use reactive::exit_codes;
use reactive::io::config::{CONFIG_FILE, ReactiveConfig, load_config, write_config};
use reactive::io::scenario_store::write_scenario;
use reactive::logging;
use reactive::replay::replay_file;
use reactive::scenario::default_scenario;
use reactive::validate::validate_scenario;

const SCENARIO_FILE: &str = "scenario.json";

#[derive(Parser)]
#[command(
    name = "reactive",
    version,
    about = "Replay lifecycle scenarios against keyed component trees"
)]
struct Cli {
    /// Config file (defaults apply when it does not exist).
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `reactive.toml` and a starter `scenario.json` if missing.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a scenario against the schema and tree invariants.
    Validate { scenario: PathBuf },
    /// Run a scenario and print the final tree and lifecycle events as JSON.
    Replay { scenario: PathBuf },
}

fn main() {
    logging::init();
    match run() {
        Ok(()) => std::process::exit(exit_codes::OK),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Validate { scenario } => cmd_validate(&cli.config, &scenario),
        Command::Replay { scenario } => cmd_replay(&cli.config, &scenario),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if force || !config_path.exists() {
        write_config(config_path, &ReactiveConfig::default())
            .with_context(|| format!("write {}", config_path.display()))?;
    }
    let scenario_path = Path::new(SCENARIO_FILE);
    if force || !scenario_path.exists() {
        write_scenario(scenario_path, &default_scenario())?;
    }
    Ok(())
}

fn cmd_validate(config_path: &Path, scenario: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let outcome = validate_scenario(scenario, &config)?;
    println!("ok: {} nodes, {} actions", outcome.nodes, outcome.actions);
    Ok(())
}

fn cmd_replay(config_path: &Path, scenario: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let outcome = replay_file(scenario, &config)?;
    print_json(&outcome)
}

/// Print `value` as pretty JSON with trailing newline.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["reactive", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["reactive", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_replay_with_config() {
        let cli = Cli::parse_from(["reactive", "replay", "s.json", "--config", "other.toml"]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        match cli.command {
            Command::Replay { scenario } => assert_eq!(scenario, PathBuf::from("s.json")),
            _ => panic!("expected replay"),
        }
    }
}
