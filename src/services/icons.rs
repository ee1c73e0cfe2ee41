//! Icon registry service and the desktop scan collaborator.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::icon::{is_shortcut_extension, normalize_extension};
use crate::models::{DesktopIcon, Point, ScannedEntry};
use crate::services::FenceIndex;

/// Source of desktop entries.
///
/// Implementations report every entry currently on the desktop. The engine
/// never touches the file system itself.
pub trait DesktopScanner: Send + Sync {
    /// Lists the desktop entries.
    fn scan(&self) -> Result<Vec<ScannedEntry>>;
}

/// Scans one or more folders (non-recursive) with `std::fs`.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    roots: Vec<PathBuf>,
}

impl DirectoryScanner {
    /// Creates a scanner over the given folders.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Scanner over the current user's desktop folder, if the platform has one.
    pub fn user_desktop() -> Option<Self> {
        dirs::desktop_dir().map(|dir| Self::new([dir]))
    }

    /// Folders this scanner reads.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn scan_root(root: &Path, entries: &mut Vec<ScannedEntry>) -> Result<()> {
        let listing = fs::read_dir(root)
            .with_context(|| format!("Failed to read desktop folder {}", root.display()))?;

        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                    continue;
                }
            };
            match scanned_entry(&entry.path()) {
                Ok(scanned) => entries.push(scanned),
                Err(e) => tracing::warn!("Skipping {}: {:#}", entry.path().display(), e),
            }
        }
        Ok(())
    }
}

impl DesktopScanner for DirectoryScanner {
    fn scan(&self) -> Result<Vec<ScannedEntry>> {
        let mut entries = Vec::new();
        for root in &self.roots {
            Self::scan_root(root, &mut entries)?;
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(
            "Scanned {} entries from {} folder(s)",
            entries.len(),
            self.roots.len()
        );
        Ok(entries)
    }
}

/// Builds a scan tuple for one path.
///
/// Files are named by their stem; directories keep their full name and carry
/// no extension.
pub fn scanned_entry(path: &Path) -> Result<ScannedEntry> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?;
    let is_directory = metadata.is_dir();

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (name, extension) = if is_directory {
        (file_name, String::new())
    } else {
        let stem = path
            .file_stem()
            .map_or_else(|| file_name.clone(), |stem| stem.to_string_lossy().into_owned());
        let extension = path
            .extension()
            .map(|ext| normalize_extension(&ext.to_string_lossy()))
            .unwrap_or_default();
        (stem, extension)
    };

    let modified = metadata.modified().ok().map(to_utc);
    let created = metadata.created().ok().map(to_utc).or(modified);
    let now = Utc::now();

    Ok(ScannedEntry {
        path: path.to_string_lossy().into_owned(),
        is_shortcut: !is_directory && is_shortcut_extension(&extension),
        name,
        extension,
        size_bytes: if is_directory { 0 } else { metadata.len() },
        created: created.unwrap_or(now),
        modified: modified.unwrap_or(now),
        is_directory,
    })
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Whether an ingested entry was new or refreshed an existing icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new icon was registered
    Added,
    /// An existing icon's file attributes were refreshed
    Updated,
}

/// Counts from applying a full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Newly registered icons
    pub added: usize,
    /// Existing icons refreshed
    pub updated: usize,
    /// Icons removed because their path vanished
    pub removed: usize,
}

/// CRUD over the icon registry.
///
/// Owning-fence references are never written here; they belong to the
/// [`FenceIndex`].
#[derive(Debug, Clone)]
pub struct IconService {
    index: Arc<FenceIndex>,
}

impl IconService {
    /// Creates a service over the shared index.
    pub const fn new(index: Arc<FenceIndex>) -> Self {
        Self { index }
    }

    /// Registers a new, unfenced icon.
    pub fn add_icon(&self, icon: DesktopIcon) -> EngineResult<DesktopIcon> {
        let icon = self.index.insert_icon(icon)?;
        tracing::debug!("Added icon '{}'", icon.path);
        Ok(icon)
    }

    /// Returns a copy of an icon.
    pub fn get_icon(&self, path: &str) -> EngineResult<DesktopIcon> {
        self.index.icon(path)
    }

    /// Replaces an icon's attributes, keeping its record id and fence.
    pub fn update_icon(&self, icon: DesktopIcon) -> EngineResult<DesktopIcon> {
        let path = icon.path.clone();
        self.index.modify_icon(&path, |stored| {
            let id = stored.id;
            let fence_id = stored.fence_id;
            *stored = icon;
            stored.id = id;
            stored.fence_id = fence_id;
            stored.clone()
        })
    }

    /// Moves an icon on the desktop.
    pub fn move_icon(&self, path: &str, position: Point) -> EngineResult<DesktopIcon> {
        self.index.modify_icon(path, |icon| {
            icon.position = position;
            icon.clone()
        })
    }

    /// Stores a thumbnail for an icon. Pass `None` to clear it.
    pub fn set_thumbnail(&self, path: &str, thumbnail: Option<Vec<u8>>) -> EngineResult<()> {
        self.index
            .modify_icon(path, |icon| icon.thumbnail = thumbnail)
    }

    /// Removes an icon, detaching it from its fence first.
    pub fn remove_icon(&self, path: &str) -> EngineResult<DesktopIcon> {
        let icon = self.index.delete_icon(path)?;
        tracing::debug!("Removed icon '{}'", path);
        Ok(icon)
    }

    /// Every icon, ordered by path.
    pub fn list_icons(&self) -> Vec<DesktopIcon> {
        self.index.icons()
    }

    /// Upserts one scan tuple.
    ///
    /// A known path keeps its position, fence and thumbnail.
    pub fn ingest(&self, entry: ScannedEntry) -> EngineResult<IngestOutcome> {
        let refreshed = self
            .index
            .modify_icon(&entry.path, |icon| icon.refresh_from(&entry));
        match refreshed {
            Ok(()) => Ok(IngestOutcome::Updated),
            Err(e) if e.is_not_found() => {
                match self.index.insert_icon(DesktopIcon::from_scan(entry)) {
                    Ok(_) => Ok(IngestOutcome::Added),
                    // Raced with another ingest of the same path.
                    Err(EngineError::DuplicateKey { .. }) => Ok(IngestOutcome::Updated),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Applies a full desktop scan.
    ///
    /// Every reported entry is upserted and icons whose path is no longer
    /// reported are removed (detached first). A failed scan changes nothing.
    pub fn refresh(&self, scanner: &dyn DesktopScanner) -> EngineResult<RefreshSummary> {
        let entries = scanner.scan().map_err(|e| {
            tracing::warn!("Desktop scan failed: {:#}", e);
            EngineError::ScanFailure(format!("{e:#}"))
        })?;

        let mut summary = RefreshSummary::default();
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            seen.insert(entry.path.clone());
            match self.ingest(entry)? {
                IngestOutcome::Added => summary.added += 1,
                IngestOutcome::Updated => summary.updated += 1,
            }
        }

        for icon in self.index.icons() {
            if seen.contains(&icon.path) {
                continue;
            }
            match self.index.delete_icon(&icon.path) {
                Ok(_) => summary.removed += 1,
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Desktop refresh: {} added, {} updated, {} removed",
            summary.added,
            summary.updated,
            summary.removed
        );
        Ok(summary)
    }
}
