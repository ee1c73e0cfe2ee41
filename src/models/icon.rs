//! Desktop icon records and scan tuples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SHORTCUT_EXTENSIONS;
use crate::models::Point;

/// One entry reported by the scan collaborator.
///
/// The engine does not interpret file-system semantics beyond these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedEntry {
    /// Absolute path (the icon's identity)
    pub path: String,
    /// Display name
    pub name: String,
    /// File extension including the dot (empty for directories)
    pub extension: String,
    /// Size in bytes (0 for directories)
    pub size_bytes: u64,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
    /// Entry is a directory
    pub is_directory: bool,
    /// Entry is a shortcut (.lnk, .url, .desktop)
    pub is_shortcut: bool,
}

/// Icon shown on the desktop, keyed by its absolute path.
///
/// `fence_id` is a relation only: the owning fence is looked up in the fence
/// registry and only the fence membership index changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    /// Record identifier (fresh for every cloned copy)
    pub id: Uuid,
    /// Absolute file-system path
    pub path: String,
    /// Display name
    pub name: String,
    /// Lower-cased extension including the dot, e.g. ".exe"
    pub extension: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
    /// Position on the desktop
    pub position: Point,
    /// Icon represents a directory
    pub is_directory: bool,
    /// Icon represents a shortcut
    pub is_shortcut: bool,
    /// Fence currently holding this icon
    #[serde(default)]
    pub fence_id: Option<Uuid>,
    /// Cached thumbnail image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Vec<u8>>,
}

impl DesktopIcon {
    /// Creates an icon for a regular file, deriving the extension from `path`.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            is_shortcut: is_shortcut_extension(&extension),
            path,
            name: name.into(),
            extension,
            size_bytes: 0,
            created: now,
            modified: now,
            position: Point::default(),
            is_directory: false,
            fence_id: None,
            thumbnail: None,
        }
    }

    /// Builds an unfenced icon from a scan tuple.
    pub fn from_scan(entry: ScannedEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: entry.path,
            name: entry.name,
            extension: normalize_extension(&entry.extension),
            size_bytes: entry.size_bytes,
            created: entry.created,
            modified: entry.modified,
            position: Point::default(),
            is_directory: entry.is_directory,
            is_shortcut: entry.is_shortcut,
            fence_id: None,
            thumbnail: None,
        }
    }

    /// Refreshes file attributes from a newer scan of the same path.
    ///
    /// Position, fence membership and thumbnail are kept.
    pub fn refresh_from(&mut self, entry: &ScannedEntry) {
        self.name.clone_from(&entry.name);
        self.extension = normalize_extension(&entry.extension);
        self.size_bytes = entry.size_bytes;
        self.created = entry.created;
        self.modified = entry.modified;
        self.is_directory = entry.is_directory;
        self.is_shortcut = entry.is_shortcut;
    }

    /// Marks this icon as a directory (clears the extension).
    pub fn with_directory(mut self) -> Self {
        self.is_directory = true;
        self.extension.clear();
        self.is_shortcut = false;
        self
    }

    /// Sets the size in bytes.
    pub const fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Sets the desktop position.
    pub const fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Sets creation and modification timestamps.
    pub const fn with_dates(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    /// Returns true if the icon is not held by any fence.
    pub const fn is_unfenced(&self) -> bool {
        self.fence_id.is_none()
    }
}

/// Lower-cases an extension and ensures a leading dot. Empty stays empty.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() || trimmed == "." {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Extracts the normalized extension of the last path component.
pub fn extension_of(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// Returns true for extensions treated as desktop shortcuts.
pub fn is_shortcut_extension(extension: &str) -> bool {
    let normalized = normalize_extension(extension);
    SHORTCUT_EXTENSIONS.contains(&normalized.as_str())
}
