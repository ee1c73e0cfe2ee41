//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and on-disk locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "DeskFence";

/// Directory name created under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "DeskFence";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Subdirectory of the config directory holding persisted layouts.
pub const LAYOUTS_DIR_NAME: &str = "layouts";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "DESKFENCE_CONFIG_DIR";

/// Name given to the layout synthesized when no layout is active.
pub const DEFAULT_LAYOUT_NAME: &str = "Default Layout";

/// Schema version written into every layout.
pub const LAYOUT_VERSION: &str = "1.0";

/// Extensions treated as desktop shortcuts.
pub const SHORTCUT_EXTENSIONS: &[&str] = &[".lnk", ".url", ".desktop"];
