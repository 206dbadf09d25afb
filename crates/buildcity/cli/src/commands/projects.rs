//! Project commands

use buildcity_records::{Material, NewProject, ProjectStatus, ProjectStore};
use clap::Subcommand;
use colored::*;

use super::AppContext;
use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        /// Only `finished` or `ongoing` projects
        #[arg(short, long)]
        status: Option<ProjectStatus>,
    },

    /// Create a project; it starts as ongoing
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        address: String,

        /// Free text, e.g. "120 m²"
        #[arg(long, default_value = "")]
        area: String,

        /// brick, concrete or wood
        #[arg(short, long)]
        material: Material,

        /// Attached image URI, repeatable up to five times
        #[arg(short, long = "image")]
        images: Vec<String>,
    },

    /// Change a project's status
    Status { id: String, status: ProjectStatus },

    /// Delete a project
    Delete { id: String },
}

/// Execute a project command
pub async fn execute(command: ProjectCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let projects = ProjectStore::new(ctx.store.clone());
    match command {
        ProjectCommands::List { status } => {
            let list = match status {
                Some(status) => projects.list_by_status(status).await?,
                None => projects.list().await?,
            };
            if ctx.format == OutputFormat::Json {
                return print_json(&list);
            }
            if list.is_empty() {
                println!("{}", "No projects".dimmed());
            }
            for project in &list {
                let status = match project.status {
                    ProjectStatus::Finished => "finished".green(),
                    ProjectStatus::Ongoing => "ongoing".yellow(),
                };
                println!(
                    "{}  {:<8}  {}  {}  {}  {}",
                    project.date,
                    status,
                    project.name,
                    project.material,
                    project.address.dimmed(),
                    project.id.dimmed()
                );
            }
            Ok(())
        }

        ProjectCommands::Add {
            name,
            address,
            area,
            material,
            images,
        } => {
            let project = projects
                .save(NewProject {
                    name,
                    address,
                    area,
                    material,
                    media_images: images,
                })
                .await?;
            if ctx.format == OutputFormat::Json {
                return print_json(&project);
            }
            print_success(&format!("Project {} created as {}", project.name, project.id));
            Ok(())
        }

        ProjectCommands::Status { id, status } => {
            if projects.update_status(&id, status).await? {
                print_success(&format!("Project marked {}", status));
            } else {
                print_warning(&format!("No project with id {}", id));
            }
            Ok(())
        }

        ProjectCommands::Delete { id } => {
            if projects.delete(&id).await? {
                print_success("Project deleted");
            } else {
                print_warning(&format!("No project with id {}", id));
            }
            Ok(())
        }
    }
}
