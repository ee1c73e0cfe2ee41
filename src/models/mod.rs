//! Data models for icons, fences, categories, layouts and settings.
//!
//! Models are plain values independent of the services that store and mutate them.

pub mod category;
pub mod color;
pub mod fence;
pub mod geometry;
pub mod icon;
pub mod layout;
pub mod settings;

// Re-export all model types
pub use category::{system_categories, CategoryDefinition};
pub use color::ArgbColor;
pub use fence::{Fence, FenceStyle, IconArrangement, IconSortRule};
pub use geometry::{Point, Size};
pub use icon::{DesktopIcon, ScannedEntry};
pub use layout::{DesktopLayout, FenceSnapshot};
pub use settings::{AnimationSettings, AutoOrganizeRule, Hotkeys, RuleType, Settings, ThemeMode};
