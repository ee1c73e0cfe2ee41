//! The settings value: defaults for new fences, behavior toggles and user rules.
//!
//! The value is replaced wholesale on save; every field carries a serde default
//! so partial or older files load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ArgbColor, CategoryDefinition, FenceStyle, Size};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the operating system
    #[default]
    System,
    /// Always light
    Light,
    /// Always dark
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" | "auto" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!(
                "Invalid theme '{other}'. Expected system, light or dark"
            )),
        }
    }
}

/// What an auto-organize rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    /// Extension list, e.g. ".png, .jpg"
    #[default]
    Extension,
    /// Substring of the display name
    Name,
    /// Comparison against the creation date, e.g. "<2024-01-01"
    DateCreated,
    /// Comparison against the modification date
    DateModified,
    /// Comparison against the size, e.g. ">10mb"
    Size,
    /// Substring of the full path
    Path,
}

/// User-defined rule that routes matching icons into a specific fence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoOrganizeRule {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Condition text, interpreted per `rule_type`
    pub condition: String,
    /// What the condition inspects
    #[serde(default)]
    pub rule_type: RuleType,
    /// Fence receiving matching icons
    pub target_fence_id: Uuid,
    /// Disabled rules never match
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Higher priority rules are evaluated first
    #[serde(default)]
    pub priority: i32,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl AutoOrganizeRule {
    /// Creates an enabled rule with priority 0.
    pub fn new(
        name: impl Into<String>,
        rule_type: RuleType,
        condition: impl Into<String>,
        target_fence_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            condition: condition.into(),
            rule_type,
            target_fence_id,
            enabled: true,
            priority: 0,
            created: Utc::now(),
        }
    }

    /// Sets the priority.
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Global hotkey bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    /// Quick-hide is enabled
    pub quick_hide_enabled: bool,
    /// Quick-hide key chord
    pub quick_hide: String,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            quick_hide_enabled: true,
            quick_hide: "Ctrl+Space".to_string(),
        }
    }
}

/// Animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Animations are played
    pub enabled: bool,
    /// Duration in milliseconds
    pub speed_ms: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_ms: 300,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version of this value
    pub schema_version: u32,
    /// Background of new fences
    pub default_fence_background: ArgbColor,
    /// Border of new fences
    pub default_fence_border: ArgbColor,
    /// Title color of new fences
    pub default_fence_title: ArgbColor,
    /// Opacity of new fences
    pub default_opacity: f64,
    /// Corner radius of new fences
    pub default_corner_radius: u32,
    /// Border width of new fences
    pub default_border_width: u32,
    /// Spacing between icons
    pub icon_spacing: u32,
    /// Show fence titles
    pub show_fence_titles: bool,
    /// Snap fences to the grid when moved
    pub grid_snapping: bool,
    /// Grid cell size in pixels
    pub grid_size: u32,
    /// Periodic auto-organize toggle
    pub auto_organize: bool,
    /// Auto-organize interval in seconds
    pub auto_organize_interval_secs: u32,
    /// Create a fence for a matched category that has none
    pub create_category_fences: bool,
    /// Theme preference
    pub theme: ThemeMode,
    /// Show notifications
    pub show_notifications: bool,
    /// UI language tag
    pub language: String,
    /// Last time the value was saved
    pub last_modified: DateTime<Utc>,
    /// Icon size on the desktop
    pub icon_size: Size,
    /// Hotkey bindings
    pub hotkeys: Hotkeys,
    /// Animation parameters
    pub animation: AnimationSettings,
    /// User rules routing icons into fences
    pub auto_organize_rules: Vec<AutoOrganizeRule>,
    /// User-defined categories, evaluated after the system set
    pub custom_categories: Vec<CategoryDefinition>,
}

impl Default for Settings {
    fn default() -> Self {
        let style = FenceStyle::default();
        Self {
            schema_version: 1,
            default_fence_background: style.background,
            default_fence_border: style.border,
            default_fence_title: style.title,
            default_opacity: style.opacity,
            default_corner_radius: style.corner_radius,
            default_border_width: style.border_width,
            icon_size: Size::new(32, 32),
            icon_spacing: 5,
            show_fence_titles: true,
            grid_snapping: true,
            grid_size: 10,
            auto_organize: true,
            auto_organize_interval_secs: 30,
            create_category_fences: false,
            hotkeys: Hotkeys::default(),
            theme: ThemeMode::default(),
            animation: AnimationSettings::default(),
            show_notifications: true,
            language: "en-US".to_string(),
            auto_organize_rules: Vec::new(),
            custom_categories: Vec::new(),
            last_modified: Utc::now(),
        }
    }
}

impl Settings {
    /// Style applied to newly created fences.
    pub fn default_fence_style(&self) -> FenceStyle {
        FenceStyle {
            background: self.default_fence_background,
            border: self.default_fence_border,
            title: self.default_fence_title,
            opacity: self.default_opacity,
            corner_radius: self.default_corner_radius,
            border_width: self.default_border_width,
        }
        .clamped()
    }
}

const fn default_true() -> bool {
    true
}
