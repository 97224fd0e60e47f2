//! SPORTIQ CLI - manifest tooling for the layer runtime.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SPORTIQ_*`)
//! 3. Project config (`.sportiq/config.toml` in current directory)
//! 4. Global config (`~/.sportiq/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SPORTIQ_DEBUG`: Enable debug mode (`true`/`false`)
//! - `SPORTIQ_ERROR_LOG_CAP`: Runtime error log capacity
//! - `SPORTIQ_LOAD_TIMEOUT_MS`: Per-layer load timeout
//! - `SPORTIQ_POLL_INTERVAL_MS`: Health poll interval
//! - `SPORTIQ_DISABLE_POLICY`: `warn` or `cascade`

mod layers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sportiq_manifest::ManifestLoader;
use sportiq_runtime::{
    ConfigLoader, HealthMonitor, LayerManager, LayerRegistry, LoadOutcome, Orchestrator,
    RuntimeCore, SportiqConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// SPORTIQ CLI - manifest tooling for the layer runtime
#[derive(Parser, Debug)]
#[command(name = "sportiq")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a layer manifest and report its contents
    Validate {
        /// Path to the manifest JSON file
        manifest: PathBuf,
    },

    /// Activate a manifest against the builtin demo layers
    Run {
        /// Path to the manifest JSON file
        manifest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Terminal filter: --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let project_root = match args.project {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut config = ConfigLoader::new()
        .with_project_root(&project_root)
        .load()
        .context("failed to load configuration")?;
    if args.debug {
        config.debug = true;
    }

    match args.command {
        Command::Validate { manifest } => validate(&manifest).await,
        Command::Run { manifest } => run(&manifest, &config).await,
    }
}

async fn validate(path: &PathBuf) -> Result<()> {
    let loader = ManifestLoader::new(path);
    let manifest = loader
        .load()
        .await
        .with_context(|| format!("manifest '{}' is invalid", path.display()))?;

    println!(
        "manifest ok: version {}, {} active, {} staged",
        manifest.version(),
        manifest.all_layers().len(),
        manifest.now_activating().len()
    );
    for layer in manifest.all_layers() {
        let deps: Vec<&str> = layer.dependencies.iter().map(|d| d.as_str()).collect();
        println!(
            "  {} ({}) entry={} deps=[{}]",
            layer.id,
            layer.name,
            layer.entry,
            deps.join(", ")
        );
    }
    Ok(())
}

async fn run(path: &PathBuf, config: &SportiqConfig) -> Result<()> {
    let core = Arc::new(RuntimeCore::new(&config.runtime));
    let registry = LayerRegistry::shared();
    let factories = Arc::new(layers::builtin_factories());

    let orchestrator = Orchestrator::new(
        core.clone(),
        registry.clone(),
        factories,
        ManifestLoader::new(path),
        config,
    );
    let manager = LayerManager::new(core.clone(), registry.clone(), config);
    let monitor = HealthMonitor::new(core.clone(), registry, config);

    // A CLI host has no page to wait for; it is ready immediately.
    core.host_ready();
    core.boot().await;
    info!("runtime booted");

    let report = orchestrator
        .activate_all()
        .await
        .context("activation aborted")?;

    monitor.poll_once();

    println!(
        "activation: {} loaded, {} failed, {} cycle(s)",
        report.loaded(),
        report.failed(),
        report.cycles.len()
    );
    for (id, outcome) in &report.outcomes {
        let line = match outcome {
            LoadOutcome::Loaded => format!("  {id}: active ({})", manager.status(id)),
            LoadOutcome::Skipped => format!("  {id}: skipped (disabled)"),
            LoadOutcome::Failed { code, message } => format!("  {id}: failed [{code}] {message}"),
        };
        println!("{line}");
    }
    for cycle in &report.cycles {
        let members: Vec<&str> = cycle.members.iter().map(|m| m.as_str()).collect();
        println!("  cycle: {}", members.join(" -> "));
    }

    core.destroy();
    if report.is_clean() {
        Ok(())
    } else {
        anyhow::bail!("activation finished with failures")
    }
}
