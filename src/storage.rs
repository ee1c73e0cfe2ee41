//! Layout storage on disk.
//!
//! Each layout is one pretty-printed JSON file named `<uuid>.json` inside the
//! layouts directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::DesktopLayout;
use crate::services::LayoutStore;

/// Layout store backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct LayoutDirectory {
    dir: PathBuf,
}

impl LayoutDirectory {
    /// Creates a store over the given directory. The directory is created on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the layout files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for a layout id.
    pub fn file_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Reads one stored layout.
    pub fn load(&self, id: Uuid) -> Result<DesktopLayout> {
        Self::read_file(&self.file_for(id))
    }

    fn read_file(path: &Path) -> Result<DesktopLayout> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layout file: {}", path.display()))
    }
}

impl LayoutStore for LayoutDirectory {
    /// Performs an atomic write using a temp file + rename pattern.
    fn persist(&self, layout: &DesktopLayout) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create layouts directory: {}", self.dir.display())
        })?;

        let content =
            serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;

        let path = self.file_for(layout.id);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp layout file: {}", temp_path.display()))?;

        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename temp layout file to: {}", path.display()))?;

        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.file_for(id);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete layout file: {}", path.display()))
    }

    /// Unreadable files are logged and skipped.
    fn load_all(&self) -> Result<Vec<DesktopLayout>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to read layouts directory: {}", self.dir.display())
        })?;

        let mut layouts = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match Self::read_file(&path) {
                Ok(layout) => layouts.push(layout),
                Err(e) => tracing::warn!("Skipping layout file: {:#}", e),
            }
        }

        layouts.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        Ok(layouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DesktopIcon, Fence, FenceSnapshot};
    use tempfile::TempDir;

    fn sample() -> DesktopLayout {
        let mut layout = DesktopLayout::new("Work").unwrap();
        let fence = Fence::new("Docs");
        let mut icon = DesktopIcon::new("/desk/a.pdf", "a");
        icon.fence_id = Some(fence.id);
        layout.fences.push(FenceSnapshot {
            fence,
            icons: vec![icon],
        });
        layout
    }

    #[test]
    fn test_persist_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = LayoutDirectory::new(temp_dir.path().join("layouts"));
        assert!(store.load_all().unwrap().is_empty());

        let layout = sample();
        store.persist(&layout).unwrap();
        assert!(store.file_for(layout.id).exists());

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![layout.clone()]);
        assert_eq!(store.load(layout.id).unwrap(), layout);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = LayoutDirectory::new(temp_dir.path());
        let layout = sample();

        store.persist(&layout).unwrap();
        store.delete(layout.id).unwrap();
        store.delete(layout.id).unwrap();
        assert!(!store.file_for(layout.id).exists());
    }

    #[test]
    fn test_load_all_skips_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = LayoutDirectory::new(temp_dir.path());
        store.persist(&sample()).unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
