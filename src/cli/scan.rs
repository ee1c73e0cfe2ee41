//! Scan command: list desktop entries with the category each one falls into.

use crate::cli::common::{desktop_scanner, open_engine, print_json, CliResult};
use crate::config::AppPaths;
use crate::services::{Classification, MatchReason, RefreshSummary};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Scan a desktop folder and classify its entries
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Folder to scan (defaults to the user's desktop)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ScannedIcon {
    path: String,
    name: String,
    extension: String,
    size_bytes: u64,
    is_directory: bool,
    is_shortcut: bool,
    category: Option<String>,
    reason: Option<MatchReason>,
}

#[derive(Debug, Serialize)]
struct ScanResponse {
    summary: RefreshSummary,
    icons: Vec<ScannedIcon>,
    count: usize,
}

impl ScanArgs {
    /// Execute the scan command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;
        let scanner = desktop_scanner(self.dir.as_deref())?;
        let summary = engine.refresh(&scanner)?;

        let icons: Vec<ScannedIcon> = engine
            .icons()
            .list_icons()
            .into_iter()
            .map(|icon| {
                let (category, reason) = match engine.classify(&icon) {
                    Classification::Assigned {
                        category_id,
                        reason,
                    } => (Some(category_id), Some(reason)),
                    Classification::Unassigned => (None, None),
                };
                ScannedIcon {
                    path: icon.path,
                    name: icon.name,
                    extension: icon.extension,
                    size_bytes: icon.size_bytes,
                    is_directory: icon.is_directory,
                    is_shortcut: icon.is_shortcut,
                    category,
                    reason,
                }
            })
            .collect();

        let response = ScanResponse {
            summary,
            count: icons.len(),
            icons,
        };

        if self.json {
            return print_json(&response);
        }

        if response.count == 0 {
            println!("No desktop entries found.");
            return Ok(());
        }

        println!("Desktop entries ({}):", response.count);
        println!();
        for icon in &response.icons {
            println!(
                "  {:<40} {}",
                icon.name,
                icon.category.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }
}
