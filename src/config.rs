//! Configuration management for the application.
//!
//! This module resolves the on-disk locations used by the application and
//! stores the settings value in TOML format with atomic writes.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, LAYOUTS_DIR_NAME, SETTINGS_FILE_NAME};
use crate::models::Settings;
use crate::services::SettingsStore;

/// On-disk locations of the settings file and stored layouts.
///
/// # File Location
///
/// - Linux: `~/.config/DeskFence/`
/// - macOS: `~/Library/Application Support/DeskFence/`
/// - Windows: `%APPDATA%\DeskFence\`
///
/// The directory can be overridden with `DESKFENCE_CONFIG_DIR` or an explicit
/// path (the `--config-dir` flag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Uses the given directory as the config directory.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Resolves the config directory.
    ///
    /// Precedence: explicit override, then `DESKFENCE_CONFIG_DIR`, then the
    /// platform config directory.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::new(dir));
        }
        Ok(Self::new(Self::platform_config_dir()?))
    }

    /// Gets the platform-specific config directory path.
    pub fn platform_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// The config directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Directory holding one JSON file per stored layout.
    pub fn layouts_dir(&self) -> PathBuf {
        self.config_dir.join(LAYOUTS_DIR_NAME)
    }
}

/// Settings store backed by a TOML file.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Creates a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the settings file location of `paths`.
    pub fn at(paths: &AppPaths) -> Self {
        Self::new(paths.settings_file())
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks if the settings file exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl SettingsStore for SettingsFile {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read settings file: {}",
            self.path.display()
        ))?;

        let settings: Settings = toml::from_str(&content).context(format!(
            "Failed to parse settings file: {}",
            self.path.display()
        ))?;

        Ok(Some(settings))
    }

    /// Uses temp file + rename pattern for atomic writes.
    fn persist(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context(format!(
                "Failed to create config directory: {}",
                dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        let temp_path = self.path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp settings file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename temp settings file to: {}",
            self.path.display()
        ))?;

        Ok(())
    }
}
