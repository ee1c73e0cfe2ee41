//! Stored layout commands.

use crate::cli::common::{open_engine, print_json, CliResult};
use crate::config::AppPaths;
use crate::models::DesktopLayout;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use uuid::Uuid;

/// Manage stored layouts
#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Layout subcommand
    #[command(subcommand)]
    pub command: LayoutCommand,
}

/// Layout management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum LayoutCommand {
    /// List stored layouts
    List {
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one stored layout
    Show {
        /// Layout ID
        id: Uuid,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy a stored layout under a new name
    Clone {
        /// Layout ID to copy
        id: Uuid,
        /// Name of the copy
        #[arg(short, long, value_name = "NAME")]
        name: String,
    },
    /// Delete a stored layout
    Remove {
        /// Layout ID
        id: Uuid,
    },
}

#[derive(Debug, Serialize)]
struct LayoutItem {
    id: Uuid,
    name: String,
    fences: usize,
    icons: usize,
    is_default: bool,
    modified: DateTime<Utc>,
}

impl From<&DesktopLayout> for LayoutItem {
    fn from(layout: &DesktopLayout) -> Self {
        Self {
            id: layout.id,
            name: layout.name.clone(),
            fences: layout.fences.len(),
            icons: layout.icon_count(),
            is_default: layout.is_default,
            modified: layout.modified,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListLayoutsResponse {
    layouts: Vec<LayoutItem>,
    count: usize,
}

impl LayoutArgs {
    /// Execute the layout command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;
        let layouts = engine.layouts();

        match &self.command {
            LayoutCommand::List { json } => {
                let items: Vec<LayoutItem> = layouts.list().iter().map(LayoutItem::from).collect();
                let response = ListLayoutsResponse {
                    count: items.len(),
                    layouts: items,
                };

                if *json {
                    return print_json(&response);
                }
                if response.count == 0 {
                    println!("No layouts stored.");
                    return Ok(());
                }
                println!("Layouts ({}):", response.count);
                println!();
                for item in response.layouts {
                    println!(
                        "  {}  {:<30} {} fence(s), {} icon(s)",
                        item.id, item.name, item.fences, item.icons
                    );
                }
            }
            LayoutCommand::Show { id, json } => {
                let layout = layouts.get(*id)?;
                if *json {
                    return print_json(&layout);
                }

                println!("{} ({})", layout.name, layout.id);
                if !layout.description.is_empty() {
                    println!("{}", layout.description);
                }
                println!(
                    "Resolution {}x{}, modified {}",
                    layout.resolution.width,
                    layout.resolution.height,
                    layout.modified.format("%Y-%m-%d %H:%M")
                );
                for snapshot in &layout.fences {
                    println!();
                    println!("  {} ({})", snapshot.fence.title, snapshot.icons.len());
                    for icon in &snapshot.icons {
                        println!("    {}", icon.path);
                    }
                }
                if !layout.unfenced_icons.is_empty() {
                    println!();
                    println!("  Unfenced ({})", layout.unfenced_icons.len());
                }
            }
            LayoutCommand::Clone { id, name } => {
                let copy = layouts.clone_layout(*id, name)?;
                layouts.persist_layout(copy.id)?;
                println!("Layout '{}' created ({}).", copy.name, copy.id);
            }
            LayoutCommand::Remove { id } => {
                let removed = layouts.remove(*id)?;
                println!("Layout '{}' removed.", removed.name);
            }
        }

        Ok(())
    }
}
