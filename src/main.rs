//! Scene orchestrator transcript replay
//!
//! Entry point for the `scene-replay` developer tool: drives one
//! orchestrator over the in-process mock host and prints what the host saw.

use clap::Parser;
use scene_orchestrator::mock::MockHost;
use scene_orchestrator::replay::{self, ReplayError};
use scene_orchestrator::{EffectiveConfig, Orchestrator};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scene-replay")]
#[command(about = "Replay a host event transcript against the scene orchestrator", version)]
struct Cli {
    /// JSON-lines transcript ("-" for stdin)
    transcript: PathBuf,

    /// Path to a TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// JSON object merged over the config
    #[arg(long)]
    set: Option<String>,

    /// Print the effective config instead of replaying
    #[arg(long)]
    show_config: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(message) = run(cli) {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let overrides = cli
        .set
        .as_deref()
        .map(|raw| serde_json::from_str::<serde_json::Value>(raw))
        .transpose()
        .map_err(|e| format!("--set is not valid JSON: {}", e))?;

    let effective =
        EffectiveConfig::build(cli.config.as_deref(), overrides).map_err(|e| e.to_string())?;

    if cli.show_config {
        let json = effective.to_json().map_err(|e| e.to_string())?;
        println!("{}", json);
        return Ok(());
    }

    let mut orchestrator = Orchestrator::new(MockHost::new(), effective.config);
    let result = if cli.transcript.as_os_str() == "-" {
        replay::replay(&mut orchestrator, io::stdin().lock())
    } else {
        File::open(&cli.transcript)
            .map_err(ReplayError::from)
            .and_then(|file| replay::replay(&mut orchestrator, BufReader::new(file)))
    };
    let report = result.map_err(|e| format!("{}: {}", cli.transcript.display(), e))?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| e.to_string())?;
    println!("{}", output);
    Ok(())
}
