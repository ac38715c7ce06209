//! Command-line host for the diagnostic engine.
//!
//! Usage:
//!   hexagram-diagnostics analyze --engine 1 --interface 2 --safe-mode 11 --level standard
//!   hexagram-diagnostics hexagram 63
//!   hexagram-diagnostics levels
//!
//! Results go to stdout as JSON; logs go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hexagram_diagnostics::transform::{flipped, inverted, nuclear};
use hexagram_diagnostics::{
    AnalysisLevel, AnalysisProgress, Config, HexagramLines, KnowledgeBase, Orchestrator, OsProfile,
    ProfileRole, ProfileSet,
};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(name = "hexagram-diagnostics")]
#[command(about = "Triple-profile hexagram diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analyzers for one Engine / Interface / Safe-Mode triple
    Analyze {
        #[arg(long)]
        engine: u32,
        #[arg(long)]
        interface: u32,
        #[arg(long = "safe-mode")]
        safe_mode: u32,
        /// essential, standard or comprehensive (defaults to the configured level)
        #[arg(long)]
        level: Option<String>,
        /// Profile strengths in engine, interface, safe-mode order
        #[arg(long, value_delimiter = ',')]
        strength: Option<Vec<f64>>,
    },
    /// Print one hexagram with its nuclear, inverted and flipped derivations
    Hexagram { id: u32 },
    /// List the methods each analysis level runs
    Levels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match cli.command {
        Commands::Analyze {
            engine,
            interface,
            safe_mode,
            level,
            strength,
        } => analyze(&config, [engine, interface, safe_mode], level, strength).await,
        Commands::Hexagram { id } => hexagram(id),
        Commands::Levels => levels(),
    }
}

async fn analyze(
    config: &Config,
    ids: [u32; 3],
    level: Option<String>,
    strength: Option<Vec<f64>>,
) -> Result<()> {
    let level: AnalysisLevel = match level {
        Some(raw) => raw.parse()?,
        None => config.orchestrator.level()?,
    };
    let strength = match strength.as_deref() {
        Some(&[e, i, s]) => [e, i, s],
        Some(other) => anyhow::bail!("--strength takes 3 values, got {}", other.len()),
        None => [0.5; 3],
    };
    let profiles = ProfileSet::new(
        OsProfile::new(ProfileRole::Engine, ids[0], strength[0]),
        OsProfile::new(ProfileRole::Interface, ids[1], strength[1]),
        OsProfile::new(ProfileRole::SafeMode, ids[2], strength[2]),
    );

    let orchestrator = Orchestrator::new(config);
    let log_progress = |p: &AnalysisProgress| {
        info!("[{:>3}%] {}", p.percent(), p.message);
    };
    let result = orchestrator
        .analyze(&profiles, level, Some(&log_progress))
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn hexagram(id: u32) -> Result<()> {
    let kb = KnowledgeBase::shared();
    let hexagram = kb.hexagram(id)?;
    let lines = kb.hexagram_lines(id)?;
    let derived = |l: HexagramLines| {
        let h = kb.resolve_hexagram(&l);
        json!({ "id": h.id, "name": h.name, "symbol": h.symbol, "lines": l.to_string() })
    };

    let out = json!({
        "hexagram": hexagram,
        "upperTrigram": kb.upper_of(hexagram),
        "lowerTrigram": kb.lower_of(hexagram),
        "nuclear": derived(nuclear(&lines)),
        "inverted": derived(inverted(&lines)),
        "flipped": derived(flipped(&lines)),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn levels() -> Result<()> {
    let out: serde_json::Map<String, serde_json::Value> = AnalysisLevel::ALL
        .iter()
        .map(|level| (level.to_string(), json!(level.methods())))
        .collect();
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
