use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use spr_stats::{Dashboard, SprStatsConfig, View};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MODULE: &str = "spr_stats";

/// SPR Board - SPR statistics that keep themselves fresh
#[derive(Parser)]
#[command(name = "sprboard")]
#[command(about = "SPR Board - per-user SPR statistics and release views")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Tracker data file (overrides spr_stats.source_path)
    #[arg(long)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll every view until Ctrl+C
    Run,
    /// Check configuration
    Check,
    /// Compute every view once and print it as JSON
    Once,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if let Some(source) = &cli.source {
        // relative to the working directory, not to home_dir
        let source = std::env::current_dir()
            .context("failed to resolve working directory")?
            .join(source);
        config.set_module_value(MODULE, "source_path", source.to_string_lossy().to_string().into());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, config.home_dir());
    tracing::info!("SPR Board starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_dashboard(config).await,
        Commands::Check => check_config(config),
        Commands::Once => run_once(config).await,
    }
}

fn dashboard_from(config: &AppConfig) -> Result<Dashboard> {
    let module_cfg: SprStatsConfig = config.module_config(MODULE)?;
    Dashboard::from_config(module_cfg, config.home_dir())
}

async fn run_dashboard(config: AppConfig) -> Result<()> {
    let dashboard = dashboard_from(&config)?;
    dashboard.activate_all()?;
    tracing::info!("Dashboard running, press Ctrl+C to stop");

    pollkit::wait_for_shutdown()
        .await
        .context("failed to listen for shutdown signals")?;

    tracing::info!("Shutting down");
    dashboard.deactivate_all().await;
    Ok(())
}

async fn run_once(config: AppConfig) -> Result<()> {
    let dashboard = dashboard_from(&config)?;
    let mut out = serde_json::Map::new();
    for view in View::ALL {
        let data = dashboard.refresh_once(view).await?;
        out.insert(view.as_str().to_string(), serde_json::to_value(data)?);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let module_cfg: SprStatsConfig = config.module_config(MODULE)?;
    if module_cfg.source_path.trim().is_empty() {
        tracing::warn!("spr_stats.source_path is not set; run and once will fail");
    } else {
        let source = config.home_dir().join(&module_cfg.source_path);
        if !source.is_file() {
            tracing::warn!(source = %source.display(), "tracker data file does not exist yet");
        }
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
