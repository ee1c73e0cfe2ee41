//! Layout snapshot manager.
//!
//! Captures the live arrangement into named layouts, clones and removes them,
//! and owns the single active-layout pointer. Activation, removal and the
//! default-layout bootstrap all run under the pointer's lock, so the pointer
//! never names a layout that is absent from the registry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::Result;
use uuid::Uuid;

use crate::constants::DEFAULT_LAYOUT_NAME;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::{DesktopLayout, Size};
use crate::registry::Registry;
use crate::services::{FenceIndex, SettingsHolder};

/// Durable storage for layouts.
pub trait LayoutStore: Send + Sync {
    /// Writes one layout, replacing any stored copy with the same id.
    fn persist(&self, layout: &DesktopLayout) -> Result<()>;

    /// Deletes the stored copy of a layout. Deleting a missing layout succeeds.
    fn delete(&self, id: Uuid) -> Result<()>;

    /// Reads every stored layout.
    fn load_all(&self) -> Result<Vec<DesktopLayout>>;
}

/// Registry of layouts plus the active pointer.
pub struct LayoutService {
    layouts: Registry<Uuid, DesktopLayout>,
    active: Mutex<Option<Uuid>>,
    index: Arc<FenceIndex>,
    settings: Arc<SettingsHolder>,
    resolution: RwLock<Size>,
    store: Option<Arc<dyn LayoutStore>>,
}

impl std::fmt::Debug for LayoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutService")
            .field("layouts", &self.layouts.len())
            .field("active", &self.active_id())
            .field("persistent", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

impl LayoutService {
    /// Creates an in-memory manager.
    pub fn new(index: Arc<FenceIndex>, settings: Arc<SettingsHolder>) -> Self {
        Self {
            layouts: Registry::new(EntityKind::Layout),
            active: Mutex::new(None),
            index,
            settings,
            resolution: RwLock::new(Size::default()),
            store: None,
        }
    }

    /// Attaches a durable store used by `persist_layout`, `load_persisted`
    /// and `remove`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn LayoutStore>) -> Self {
        self.store = Some(store);
        self
    }

    fn active_lock(&self) -> MutexGuard<'_, Option<Uuid>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the desktop resolution stamped into captured layouts.
    pub fn set_desktop_resolution(&self, size: Size) {
        *self
            .resolution
            .write()
            .unwrap_or_else(PoisonError::into_inner) = size;
    }

    /// Desktop resolution stamped into captured layouts.
    pub fn desktop_resolution(&self) -> Size {
        *self
            .resolution
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn blank_layout(&self, name: &str) -> EngineResult<DesktopLayout> {
        let mut layout = DesktopLayout::new(name)?;
        layout.resolution = self.desktop_resolution();
        layout.settings = (*self.settings.get()).clone();
        Ok(layout)
    }

    /// Captures every fence with its icons and the unfenced icons into a new
    /// layout. The active pointer is left alone.
    ///
    /// # Returns
    ///
    /// The new layout's id.
    pub fn capture_current(&self, name: &str) -> EngineResult<Uuid> {
        let mut layout = self.blank_layout(name)?;
        let (fences, unfenced) = self.index.arrangement();
        layout.fences = fences;
        layout.unfenced_icons = unfenced;

        let id = layout.id;
        tracing::info!(
            "Captured layout '{}' ({}): {} fence(s), {} icon(s)",
            layout.name,
            id,
            layout.fences.len(),
            layout.icon_count()
        );
        self.layouts.add(id, layout)?;
        Ok(id)
    }

    /// Makes a layout active and returns it for the caller to apply.
    pub fn set_active(&self, id: Uuid) -> EngineResult<DesktopLayout> {
        let mut active = self.active_lock();
        let layout = self.layouts.get(&id)?;
        *active = Some(id);
        tracing::info!("Activated layout '{}' ({})", layout.name, id);
        Ok(layout)
    }

    /// Returns the active layout, bootstrapping an empty default one when the
    /// pointer is unset.
    pub fn get_current(&self) -> EngineResult<DesktopLayout> {
        let mut active = self.active_lock();
        if let Some(id) = *active {
            match self.layouts.get(&id) {
                Ok(layout) => return Ok(layout),
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Active layout {} vanished, bootstrapping default", id);
                }
                Err(e) => return Err(e),
            }
        }

        let mut layout = self.blank_layout(DEFAULT_LAYOUT_NAME)?;
        layout.is_default = true;
        self.layouts.add(layout.id, layout.clone())?;
        *active = Some(layout.id);
        tracing::info!("Bootstrapped default layout ({})", layout.id);
        Ok(layout)
    }

    /// Id of the active layout, if any.
    pub fn active_id(&self) -> Option<Uuid> {
        *self.active_lock()
    }

    /// Deep-copies a layout under a new name. The copy is not made active.
    pub fn clone_layout(&self, id: Uuid, new_name: &str) -> EngineResult<DesktopLayout> {
        let source = self.layouts.get(&id)?;
        let copy = source.deep_copy(new_name)?;
        self.layouts.add(copy.id, copy.clone())?;
        tracing::info!(
            "Cloned layout '{}' ({}) into '{}' ({})",
            source.name,
            id,
            copy.name,
            copy.id
        );
        Ok(copy)
    }

    /// Deletes a layout. Removing the active layout unsets the pointer.
    ///
    /// With a store attached the stored copy is deleted too. If that delete
    /// fails the in-memory removal still stands and `PersistenceFailure` is
    /// returned, so the caller knows the layout can come back on next load.
    pub fn remove(&self, id: Uuid) -> EngineResult<DesktopLayout> {
        let removed = {
            let mut active = self.active_lock();
            let removed = self.layouts.remove(&id)?;
            if *active == Some(id) {
                *active = None;
                tracing::info!("Removed active layout '{}', no layout is active", removed.name);
            } else {
                tracing::info!("Removed layout '{}' ({})", removed.name, id);
            }
            removed
        };

        if let Some(store) = &self.store {
            if let Err(e) = store.delete(id) {
                tracing::warn!("Failed to delete stored layout {}: {:#}", id, e);
                return Err(EngineError::PersistenceFailure(format!("{e:#}")));
            }
        }
        Ok(removed)
    }

    /// Returns a copy of a layout.
    pub fn get(&self, id: Uuid) -> EngineResult<DesktopLayout> {
        self.layouts.get(&id)
    }

    /// All layouts ordered by creation time, then id.
    pub fn list(&self) -> Vec<DesktopLayout> {
        let mut layouts = self.layouts.list_all();
        layouts.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        layouts
    }

    /// Renames a layout.
    pub fn rename(&self, id: Uuid, name: &str) -> EngineResult<DesktopLayout> {
        DesktopLayout::validate_name(name)?;
        self.layouts.modify(&id, |layout| {
            layout.name = name.to_string();
            layout.touch();
            layout.clone()
        })
    }

    /// Replaces a layout wholesale, keeping its id and creation time.
    pub fn update(&self, layout: DesktopLayout) -> EngineResult<DesktopLayout> {
        DesktopLayout::validate_name(&layout.name)?;
        let id = layout.id;
        self.layouts.modify(&id, |stored| {
            let created = stored.created;
            *stored = layout;
            stored.created = created;
            stored.touch();
            stored.clone()
        })
    }

    fn store(&self) -> EngineResult<&Arc<dyn LayoutStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| EngineError::InvalidState("no layout store is configured".to_string()))
    }

    /// Writes a layout to the attached store.
    pub fn persist_layout(&self, id: Uuid) -> EngineResult<()> {
        let store = self.store()?;
        let layout = self.layouts.get(&id)?;
        store.persist(&layout).map_err(|e| {
            tracing::warn!("Failed to persist layout '{}' ({}): {:#}", layout.name, id, e);
            EngineError::PersistenceFailure(format!("{e:#}"))
        })?;
        tracing::debug!("Persisted layout '{}' ({})", layout.name, id);
        Ok(())
    }

    /// Registers every stored layout. Ids already registered are skipped.
    ///
    /// # Returns
    ///
    /// Number of layouts registered.
    pub fn load_persisted(&self) -> EngineResult<usize> {
        let store = self.store()?;
        let stored = store.load_all().map_err(|e| {
            tracing::warn!("Failed to load stored layouts: {:#}", e);
            EngineError::PersistenceFailure(format!("{e:#}"))
        })?;

        let mut loaded = 0;
        for layout in stored {
            let (id, name) = (layout.id, layout.name.clone());
            match self.layouts.add(id, layout) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!("Skipping stored layout '{}': {}", name, e),
            }
        }
        tracing::debug!("Loaded {} stored layout(s)", loaded);
        Ok(loaded)
    }
}
