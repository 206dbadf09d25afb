//! Launch gate commands

use std::path::PathBuf;

use anyhow::Context;
use buildcity_gate::{cached_url, forget_cached_url, GateOutcome, RouterCall, WebViewCall};
use buildcity_records::InstallTracker;
use clap::Subcommand;
use colored::*;

use super::AppContext;
use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};
use crate::replay::{replay, Script};

/// Gate subcommands
#[derive(Subcommand)]
pub enum GateCommands {
    /// Replay a JSON-lines web-view script as one app launch
    Run {
        /// Script file
        #[arg(short, long)]
        events: PathBuf,
    },

    /// Show the cached gate URL
    Status,

    /// Forget the cached gate URL so the next launch loads the entry page
    Reset,
}

/// Execute a gate command
pub async fn execute(command: GateCommands, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        GateCommands::Run { events } => {
            let text = tokio::fs::read_to_string(&events)
                .await
                .with_context(|| format!("Failed to read {}", events.display()))?;
            let script = Script::parse(&text)
                .with_context(|| format!("Invalid event script {}", events.display()))?;

            if InstallTracker::new(ctx.store.clone()).record_launch().await? {
                print_info("First launch recorded");
            }

            let resolver = ctx.config.gate.resolver()?;
            let report = replay(resolver, ctx.store.clone(), &script).await?;

            if ctx.format == OutputFormat::Json {
                return print_json(&report.outcome);
            }

            for call in &report.web_view {
                match call {
                    WebViewCall::Load { url, visible } => {
                        let mode = if *visible { "visible" } else { "hidden" };
                        println!("  web view  load {} ({})", url, mode.dimmed());
                    }
                    WebViewCall::Reveal { url } => println!("  web view  reveal {}", url),
                    WebViewCall::Hide => println!("  web view  hide"),
                }
            }
            for call in &report.router {
                match call {
                    RouterCall::Replace(path) => println!("  router    replace {}", path),
                    RouterCall::Push(path) => println!("  router    push {}", path),
                }
            }
            if report.skipped > 0 {
                println!("  {}", format!("{} step(s) after the decision skipped", report.skipped).dimmed());
            }

            match report.outcome {
                GateOutcome::Resolved { url } => print_success(&format!("Resolved: {}", url)),
                GateOutcome::Escaped { destination } => {
                    print_success(&format!("Escaped into the app at {}", destination.path()))
                }
                GateOutcome::Abandoned => print_warning("Abandoned before a decision"),
            }
            Ok(())
        }

        GateCommands::Status => {
            let cached = cached_url(ctx.store.as_ref()).await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "cached_gate_url": cached }));
            }
            match cached {
                Some(url) => println!("Cached gate URL: {}", url.green()),
                None => println!("{}", "No cached gate URL".dimmed()),
            }
            Ok(())
        }

        GateCommands::Reset => {
            forget_cached_url(ctx.store.as_ref()).await?;
            print_success("Cached gate URL cleared");
            Ok(())
        }
    }
}
