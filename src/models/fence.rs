//! Fence data structures: a movable container holding a subset of desktop icons.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ArgbColor, DesktopIcon, Point, Size};

/// Order applied to a fence's icon collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSortRule {
    /// Keep insertion order
    #[default]
    None,
    /// Name A-Z
    NameAscending,
    /// Name Z-A
    NameDescending,
    /// Oldest first
    DateAscending,
    /// Newest first
    DateDescending,
    /// Smallest first
    SizeAscending,
    /// Largest first
    SizeDescending,
    /// Extension A-Z
    TypeAscending,
    /// Extension Z-A
    TypeDescending,
}

impl IconSortRule {
    /// Compares two icons under this rule.
    ///
    /// Equal keys fall back to the path so the order is total and stable across
    /// runs. `None` reports every pair as equal.
    pub fn compare(self, a: &DesktopIcon, b: &DesktopIcon) -> Ordering {
        let by_path = || a.path.cmp(&b.path);
        let ordering = match self {
            Self::None => return Ordering::Equal,
            Self::NameAscending | Self::NameDescending => {
                a.name.to_lowercase().cmp(&b.name.to_lowercase())
            }
            Self::DateAscending | Self::DateDescending => a.created.cmp(&b.created),
            Self::SizeAscending | Self::SizeDescending => a.size_bytes.cmp(&b.size_bytes),
            Self::TypeAscending | Self::TypeDescending => a.extension.cmp(&b.extension),
        };
        let ordering = ordering.then_with(by_path);
        if self.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }

    const fn is_descending(self) -> bool {
        matches!(
            self,
            Self::NameDescending | Self::DateDescending | Self::SizeDescending | Self::TypeDescending
        )
    }
}

/// How icons are laid out inside a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconArrangement {
    /// Rows and columns
    #[default]
    Grid,
    /// Single row
    Horizontal,
    /// Single column
    Vertical,
    /// User-placed
    Freeform,
}

/// Visual style of a fence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FenceStyle {
    /// Background fill
    pub background: ArgbColor,
    /// Border color
    pub border: ArgbColor,
    /// Title text color
    pub title: ArgbColor,
    /// Overall opacity, 0.0 to 1.0
    pub opacity: f64,
    /// Corner radius in pixels
    pub corner_radius: u32,
    /// Border width in pixels
    pub border_width: u32,
}

impl Default for FenceStyle {
    fn default() -> Self {
        Self {
            background: ArgbColor::new(200, 240, 240, 240),
            border: ArgbColor::new(200, 180, 180, 180),
            title: ArgbColor::BLACK,
            opacity: 0.8,
            corner_radius: 4,
            border_width: 1,
        }
    }
}

impl FenceStyle {
    /// Returns the style with opacity clamped to the 0.0-1.0 range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.opacity = if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        };
        self
    }
}

/// A user-positioned container holding a subset of desktop icons.
///
/// `icons` holds icon paths in display order. Membership is only changed by
/// the fence membership index, which keeps every icon in at most one fence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fence {
    /// Unique identifier
    pub id: Uuid,
    /// Title shown in the header
    pub title: String,
    /// Top-left corner on the desktop
    pub position: Point,
    /// Outer size
    pub size: Size,
    /// Colors, opacity and border
    pub style: FenceStyle,
    /// Fence is shown
    pub visible: bool,
    /// Fence cannot be moved or resized
    pub locked: bool,
    /// Title bar is shown
    pub show_title: bool,
    /// Icon ordering rule
    pub sort_rule: IconSortRule,
    /// Icon arrangement mode
    pub arrangement: IconArrangement,
    /// Spacing between icons in pixels
    pub icon_spacing: u32,
    /// Category this fence collects (smart box)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Member icon paths, in display order
    #[serde(default)]
    pub icons: Vec<String>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
}

impl Fence {
    /// Creates an empty, visible, unlocked fence with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            position: Point::default(),
            size: Size::new(200, 150),
            style: FenceStyle::default(),
            visible: true,
            locked: false,
            show_title: true,
            sort_rule: IconSortRule::None,
            arrangement: IconArrangement::Grid,
            icon_spacing: 5,
            category_id: None,
            icons: Vec::new(),
            created: now,
            modified: now,
        }
    }

    /// Links this fence to a category.
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Sets the style.
    pub fn with_style(mut self, style: FenceStyle) -> Self {
        self.style = style.clamped();
        self
    }

    /// Sets the position.
    pub const fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Returns true if the icon path is a member.
    pub fn contains(&self, path: &str) -> bool {
        self.icons.iter().any(|p| p == path)
    }

    /// Appends a member path unless already present. Returns true if added.
    pub(crate) fn push_icon(&mut self, path: &str) -> bool {
        if self.contains(path) {
            return false;
        }
        self.icons.push(path.to_string());
        self.touch();
        true
    }

    /// Removes a member path. Returns true if it was present.
    pub(crate) fn remove_icon(&mut self, path: &str) -> bool {
        let before = self.icons.len();
        self.icons.retain(|p| p != path);
        let removed = self.icons.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Reorders the member paths according to `sort_rule`.
    ///
    /// `members` supplies the icon records; paths without a record keep their
    /// relative order at the end.
    pub(crate) fn sort_members(&mut self, members: &[DesktopIcon]) {
        if self.sort_rule == IconSortRule::None {
            return;
        }
        let rule = self.sort_rule;
        let mut known: Vec<&DesktopIcon> = members
            .iter()
            .filter(|icon| self.contains(&icon.path))
            .collect();
        known.sort_by(|a, b| rule.compare(a, b));

        let mut ordered: Vec<String> = known.iter().map(|icon| icon.path.clone()).collect();
        for path in &self.icons {
            if !ordered.contains(path) {
                ordered.push(path.clone());
            }
        }
        self.icons = ordered;
        self.touch();
    }
}
