//! Shared test fixtures for engine and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use deskfence::models::{DesktopIcon, DesktopLayout, Settings};
use deskfence::services::{LayoutStore, SettingsStore};
use deskfence::Engine;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// Settings store kept in memory, with a switch to make persisting fail.
#[derive(Default)]
pub struct MemorySettings {
    stored: Mutex<Option<Settings>>,
    fail: AtomicBool,
}

impl MemorySettings {
    /// Makes every following `persist` call fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Last value written.
    pub fn stored(&self) -> Option<Settings> {
        self.stored.lock().unwrap().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.stored())
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        *self.stored.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}

/// Layout store kept in memory.
#[derive(Default)]
pub struct MemoryLayouts {
    layouts: Mutex<HashMap<Uuid, DesktopLayout>>,
}

impl MemoryLayouts {
    /// Number of stored layouts.
    pub fn len(&self) -> usize {
        self.layouts.lock().unwrap().len()
    }

    /// Whether a layout with `id` is stored.
    pub fn contains(&self, id: Uuid) -> bool {
        self.layouts.lock().unwrap().contains_key(&id)
    }
}

impl LayoutStore for MemoryLayouts {
    fn persist(&self, layout: &DesktopLayout) -> Result<()> {
        self.layouts
            .lock()
            .unwrap()
            .insert(layout.id, layout.clone());
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.layouts.lock().unwrap().remove(&id);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<DesktopLayout>> {
        let mut all: Vec<DesktopLayout> = self.layouts.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|layout| layout.created);
        Ok(all)
    }
}

/// Creates an engine over in-memory settings and no layout store.
///
/// # Returns
/// The engine and its settings store, so tests can inspect or break persistence.
pub fn memory_engine() -> (Engine, Arc<MemorySettings>) {
    let settings = Arc::new(MemorySettings::default());
    (Engine::new(settings.clone()), settings)
}

/// Creates an engine over in-memory settings and an in-memory layout store.
pub fn memory_engine_with_layouts() -> (Engine, Arc<MemoryLayouts>) {
    let layouts = Arc::new(MemoryLayouts::default());
    let engine = Engine::with_layout_store(
        Arc::new(MemorySettings::default()),
        layouts.clone(),
    );
    (engine, layouts)
}

/// Creates an icon with deterministic timestamps.
///
/// # Arguments
/// * `path` - Absolute path, the icon's identity
/// * `name` - Display name
pub fn test_icon(path: &str, name: &str) -> DesktopIcon {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let modified = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    DesktopIcon::new(path, name).with_dates(created, modified)
}

/// Registers icons for every `(path, name)` pair.
pub fn add_icons(engine: &Engine, icons: &[(&str, &str)]) {
    for (path, name) in icons {
        engine.icons().add_icon(test_icon(path, name)).unwrap();
    }
}

/// Creates a desktop folder with a few entries of known categories.
///
/// # Returns
/// The temp dir guard and the desktop folder path. The folder holds
/// `Budget.xlsx` (office tools), `steam.exe` (games), `notes.txt` (files and
/// documents), `zzz.bin` (no category) and an empty `Projects` folder.
pub fn sample_desktop() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let desk = temp_dir.path().join("desk");
    fs::create_dir_all(desk.join("Projects")).unwrap();
    write_file(&desk, "Budget.xlsx", b"sheet");
    write_file(&desk, "steam.exe", b"MZ");
    write_file(&desk, "notes.txt", b"remember");
    write_file(&desk, "zzz.bin", &[0, 1, 2, 3]);
    (temp_dir, desk)
}

/// Writes one file into `dir`.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Path string of `name` inside `dir`, as the scanner reports it.
pub fn entry_path(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().into_owned()
}
