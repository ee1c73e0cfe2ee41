//! Organize command: route desktop entries into fences and store the result as
//! a layout.

use crate::cli::common::{desktop_scanner, open_engine, print_json, CliResult};
use crate::config::AppPaths;
use crate::engine::OrganizeSummary;
use crate::services::{ArrangementReport, RefreshSummary};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Organize a desktop folder into category fences
#[derive(Debug, Clone, Args)]
pub struct OrganizeArgs {
    /// Folder to organize (defaults to the user's desktop)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Name of the layout to store (defaults to a timestamped name)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Start from a stored layout's fences
    #[arg(long, value_name = "LAYOUT_ID")]
    pub base: Option<Uuid>,

    /// Create a fence for every matched category that has none
    #[arg(long)]
    pub create_fences: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FenceItem {
    id: Uuid,
    title: String,
    category_id: Option<String>,
    icons: Vec<String>,
}

#[derive(Debug, Serialize)]
struct OrganizeResponse {
    layout_id: Uuid,
    layout_name: String,
    refresh: RefreshSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    restored: Option<ArrangementReport>,
    organize: OrganizeSummary,
    fences: Vec<FenceItem>,
}

impl OrganizeArgs {
    /// Execute the organize command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;
        let scanner = desktop_scanner(self.dir.as_deref())?;
        let refresh = engine.refresh(&scanner)?;

        let restored = match self.base {
            Some(id) => Some(engine.restore_layout(id)?),
            None => None,
        };

        let create = self.create_fences || engine.settings().get().create_category_fences;
        let organize = engine.auto_organize(create)?;

        let layout_name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("Organized {}", Utc::now().format("%Y-%m-%d %H:%M")));
        let layout_id = engine.capture_layout(&layout_name)?;
        engine.layouts().persist_layout(layout_id)?;

        let fences = engine
            .index()
            .list_fences()
            .into_iter()
            .map(|fence| FenceItem {
                id: fence.id,
                title: fence.title,
                category_id: fence.category_id,
                icons: fence.icons,
            })
            .collect();

        let response = OrganizeResponse {
            layout_id,
            layout_name,
            refresh,
            restored,
            organize,
            fences,
        };

        if self.json {
            return print_json(&response);
        }

        println!(
            "Organized {} icon(s) into {} fence(s).",
            response.organize.assigned,
            response.fences.len()
        );
        for fence in &response.fences {
            println!();
            println!("  {} ({})", fence.title, fence.icons.len());
            for path in &fence.icons {
                println!("    {path}");
            }
        }
        if !response.organize.missing_categories.is_empty() {
            println!();
            println!(
                "Categories without a fence: {} (use --create-fences)",
                response.organize.missing_categories.join(", ")
            );
        }
        if !response.organize.unmatched.is_empty() {
            println!();
            println!("Unmatched: {}", response.organize.unmatched.len());
        }
        println!();
        println!("Saved layout '{}' ({}).", response.layout_name, response.layout_id);
        Ok(())
    }
}
