//! Onboarding commands

use buildcity_records::Onboarding;
use clap::Subcommand;

use super::AppContext;
use crate::output::{print_json, print_success, OutputFormat};

/// Onboarding subcommands
#[derive(Subcommand)]
pub enum OnboardingCommands {
    /// Whether onboarding has been seen
    Status,

    /// Mark onboarding as seen
    Complete,

    /// Show onboarding again on the next launch
    Reset,
}

/// Execute an onboarding command
pub async fn execute(command: OnboardingCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let onboarding = Onboarding::new(ctx.store.clone());
    match command {
        OnboardingCommands::Status => {
            let seen = onboarding.has_seen().await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "has_seen_onboarding": seen }));
            }
            if seen {
                println!("Onboarding seen; the app opens on /(tabs)");
            } else {
                println!("Onboarding not seen; the app opens on /onboarding");
            }
            Ok(())
        }
        OnboardingCommands::Complete => {
            onboarding.complete().await?;
            print_success("Onboarding marked as seen");
            Ok(())
        }
        OnboardingCommands::Reset => {
            onboarding.reset().await?;
            print_success("Onboarding reset");
            Ok(())
        }
    }
}
