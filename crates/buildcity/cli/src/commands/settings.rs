//! Settings commands

use anyhow::bail;
use buildcity_records::Settings;
use clap::Subcommand;

use super::AppContext;
use crate::output::{print_info, print_json, print_success, OutputFormat};

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show or change the display name
    Username {
        /// New name; omit to show the current one
        name: Option<String>,
    },

    /// Delete every stored record, including the gate cache
    Wipe {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

/// Execute a settings command
pub async fn execute(command: SettingsCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let settings = Settings::new(ctx.store.clone());
    match command {
        SettingsCommands::Username { name: None } => {
            let name = settings.username().await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&serde_json::json!({ "username": name }));
            }
            println!("{}", name);
            Ok(())
        }
        SettingsCommands::Username { name: Some(name) } => {
            if settings.set_username(&name).await? {
                print_success(&format!("Username set to {}", name.trim()));
            } else {
                print_info("Username unchanged");
            }
            Ok(())
        }
        SettingsCommands::Wipe { yes } => {
            if !yes {
                bail!("refusing to delete all data without --yes");
            }
            settings.delete_all_data().await?;
            print_success("All data deleted");
            Ok(())
        }
    }
}
