//! BuildCity CLI - headless host for the BuildCity app core
//!
//! This binary provides a terminal interface to:
//! - Replay web-view sessions against the launch gate
//! - Inspect and edit onboarding, meal, project and settings records
//! - Run the construction and calorie calculators

use std::sync::Arc;

use anyhow::Context;
use buildcity_store::FileStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod replay;

use commands::{calc, gate, meals, onboarding, projects, settings, AppContext};
use config::AppConfig;
use output::OutputFormat;

/// BuildCity CLI application
#[derive(Parser)]
#[command(name = "buildcity")]
#[command(about = "BuildCity - gate, records and calculators from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BUILDCITY_CONFIG")]
    config: Option<String>,

    /// Store file, overrides `store.path`
    #[arg(long, env = "BUILDCITY_STORE")]
    store: Option<std::path::PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Launch gate
    Gate {
        #[command(subcommand)]
        command: gate::GateCommands,
    },

    /// Onboarding flag
    Onboarding {
        #[command(subcommand)]
        command: onboarding::OnboardingCommands,
    },

    /// Meal log and calorie goal
    Meals {
        #[command(subcommand)]
        command: meals::MealCommands,
    },

    /// Construction projects
    Projects {
        #[command(subcommand)]
        command: projects::ProjectCommands,
    },

    /// User settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Calculators
    #[command(alias = "calculate")]
    Calc {
        #[command(subcommand)]
        command: calc::CalcCommands,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }

    // Initialize tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if let Commands::Config = cli.command {
        return output::print_json(&config);
    }

    let store = FileStore::open(config.store.path.clone())
        .await
        .with_context(|| format!("Failed to open store at {}", config.store.path.display()))?;
    let ctx = AppContext {
        store: Arc::new(store),
        config,
        format: cli.output,
    };

    match cli.command {
        Commands::Gate { command } => gate::execute(command, &ctx).await,
        Commands::Onboarding { command } => onboarding::execute(command, &ctx).await,
        Commands::Meals { command } => meals::execute(command, &ctx).await,
        Commands::Projects { command } => projects::execute(command, &ctx).await,
        Commands::Settings { command } => settings::execute(command, &ctx).await,
        Commands::Calc { command } => calc::execute(command, &ctx).await,
        Commands::Config => Ok(()),
    }
}
