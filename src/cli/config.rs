//! Configuration management CLI commands.

use crate::cli::common::{open_engine, print_json, CliError, CliResult};
use crate::config::AppPaths;
use crate::models::{Settings, ThemeMode};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current settings
    Show(ConfigShowArgs),
    /// Set settings values
    Set(ConfigSetArgs),
    /// Print the settings file and layouts directory locations
    Path(ConfigPathArgs),
    /// Restore default settings
    Reset,
}

/// Display current settings
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Print file locations
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set settings values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Theme mode (system, light, or dark)
    #[arg(long, value_name = "MODE")]
    theme: Option<String>,

    /// Snap fence positions to the grid
    #[arg(long, value_name = "BOOL")]
    grid_snapping: Option<bool>,

    /// Grid cell size in pixels
    #[arg(long, value_name = "PX")]
    grid_size: Option<u32>,

    /// Spacing between icons in new fences
    #[arg(long, value_name = "PX")]
    icon_spacing: Option<u32>,

    /// Create category fences automatically when organizing
    #[arg(long, value_name = "BOOL")]
    create_category_fences: Option<bool>,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    config_dir: String,
    settings_file: String,
    layouts_dir: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(paths),
            ConfigCommand::Set(args) => args.execute(paths),
            ConfigCommand::Path(args) => args.execute(paths),
            ConfigCommand::Reset => {
                open_engine(paths)?.settings().reset()?;
                println!("Settings reset to defaults.");
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;
        let settings = engine.settings().get();

        if self.json {
            print_json(&*settings)
        } else {
            output_human_readable(&settings);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        if self.theme.is_none()
            && self.grid_snapping.is_none()
            && self.grid_size.is_none()
            && self.icon_spacing.is_none()
            && self.create_category_fences.is_none()
        {
            return Err(CliError::validation(
                "At least one setting must be specified: --theme, --grid-snapping, --grid-size, --icon-spacing or --create-category-fences",
            ));
        }

        let engine = open_engine(paths)?;
        let mut settings = (*engine.settings().get()).clone();

        if let Some(theme) = &self.theme {
            settings.theme = theme.parse::<ThemeMode>().map_err(CliError::validation)?;
        }
        if let Some(grid_size) = self.grid_size {
            if grid_size == 0 {
                return Err(CliError::validation("Grid size must be at least 1"));
            }
            settings.grid_size = grid_size;
        }
        if let Some(grid_snapping) = self.grid_snapping {
            settings.grid_snapping = grid_snapping;
        }
        if let Some(icon_spacing) = self.icon_spacing {
            settings.icon_spacing = icon_spacing;
        }
        if let Some(create) = self.create_category_fences {
            settings.create_category_fences = create;
        }

        engine.settings().save(settings)?;
        println!("Settings saved.");
        Ok(())
    }
}

impl ConfigPathArgs {
    /// Execute path command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let output = PathsOutput {
            config_dir: paths.config_dir().display().to_string(),
            settings_file: paths.settings_file().display().to_string(),
            layouts_dir: paths.layouts_dir().display().to_string(),
        };

        if self.json {
            return print_json(&output);
        }
        println!("Settings: {}", output.settings_file);
        println!("Layouts:  {}", output.layouts_dir);
        Ok(())
    }
}

fn output_human_readable(settings: &Settings) {
    println!("Appearance:");
    println!("  theme: {:?}", settings.theme);
    println!("  fence background: {}", settings.default_fence_background);
    println!("  fence opacity: {}", settings.default_opacity);
    println!("  show fence titles: {}", settings.show_fence_titles);
    println!();
    println!("Layout:");
    println!("  grid snapping: {}", settings.grid_snapping);
    println!("  grid size: {}", settings.grid_size);
    println!("  icon spacing: {}", settings.icon_spacing);
    println!();
    println!("Organize:");
    println!("  create category fences: {}", settings.create_category_fences);
    println!("  rules: {}", settings.auto_organize_rules.len());
    println!("  custom categories: {}", settings.custom_categories.len());
}
