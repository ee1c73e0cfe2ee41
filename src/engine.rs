//! Engine facade wiring the registries and services together.
//!
//! Nothing here is global: every engine owns its registries, and callers pass
//! the engine (or the services it hands out) explicitly.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::{CategoryDefinition, DesktopIcon, Fence, Point, Settings};
use crate::services::{
    ArrangementReport, Categorizer, Classification, DesktopScanner, FenceIndex, IconService,
    LayoutService, LayoutStore, Organizer, RefreshSummary, SettingsHolder, SettingsStore,
};

/// Horizontal and vertical gap between fences created by auto-organize.
const FENCE_GAP: i32 = 20;

/// Fences created by auto-organize per row.
const FENCES_PER_ROW: usize = 4;

/// Outcome of an auto-organize pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeSummary {
    /// Icons moved into a fence
    pub assigned: usize,
    /// Fences created for categories that had none
    pub created_fences: Vec<Fence>,
    /// Matched categories still without a fence
    pub missing_categories: Vec<String>,
    /// Unfenced icons that matched nothing
    pub unmatched: Vec<String>,
}

type SharedCategorizer = Arc<RwLock<Arc<Categorizer>>>;

/// The organization engine.
pub struct Engine {
    index: Arc<FenceIndex>,
    icons: IconService,
    layouts: LayoutService,
    settings: Arc<SettingsHolder>,
    categorizer: SharedCategorizer,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("icons", &self.index.icon_count())
            .field("fences", &self.index.fence_count())
            .field("layouts", &self.layouts)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine whose layouts live in memory only.
    pub fn new(settings_store: Arc<dyn SettingsStore>) -> Self {
        Self::build(settings_store, None)
    }

    /// Creates an engine that can persist layouts to `layout_store`.
    ///
    /// Stored layouts are not read until
    /// [`LayoutService::load_persisted`] is called.
    pub fn with_layout_store(
        settings_store: Arc<dyn SettingsStore>,
        layout_store: Arc<dyn LayoutStore>,
    ) -> Self {
        Self::build(settings_store, Some(layout_store))
    }

    fn build(
        settings_store: Arc<dyn SettingsStore>,
        layout_store: Option<Arc<dyn LayoutStore>>,
    ) -> Self {
        let settings = Arc::new(SettingsHolder::load(settings_store));
        let index = Arc::new(FenceIndex::new());

        let categorizer: SharedCategorizer = Arc::new(RwLock::new(Arc::new(
            Categorizer::with_user_categories(&settings.get().custom_categories),
        )));
        let shared = Arc::clone(&categorizer);
        settings.subscribe(move |settings: &Settings| {
            let rebuilt = Categorizer::with_user_categories(&settings.custom_categories);
            tracing::debug!(
                "Rebuilt category set with {} categories",
                rebuilt.categories().len()
            );
            *shared.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(rebuilt);
        });

        let mut layouts = LayoutService::new(Arc::clone(&index), Arc::clone(&settings));
        if let Some(store) = layout_store {
            layouts = layouts.with_store(store);
        }

        Self {
            icons: IconService::new(Arc::clone(&index)),
            index,
            layouts,
            settings,
            categorizer,
        }
    }

    /// The fence membership index.
    pub fn index(&self) -> &FenceIndex {
        &self.index
    }

    /// The icon registry service.
    pub const fn icons(&self) -> &IconService {
        &self.icons
    }

    /// The layout snapshot manager.
    pub const fn layouts(&self) -> &LayoutService {
        &self.layouts
    }

    /// The settings holder.
    pub fn settings(&self) -> &SettingsHolder {
        &self.settings
    }

    /// The category set in effect.
    pub fn categorizer(&self) -> Arc<Categorizer> {
        Arc::clone(
            &self
                .categorizer
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Effective categories: system set, then user categories.
    pub fn categories(&self) -> Vec<CategoryDefinition> {
        self.categorizer().categories().to_vec()
    }

    /// Classifies one icon against the effective category set.
    pub fn classify(&self, icon: &DesktopIcon) -> Classification {
        self.categorizer().classify(icon)
    }

    /// Adds a user category by saving it into the settings.
    ///
    /// The category set is rebuilt once the settings are persisted; if
    /// persisting fails the category stays in the in-memory settings only,
    /// and a second add of the same id is still rejected.
    pub fn add_category(&self, category: CategoryDefinition) -> EngineResult<()> {
        category.validate()?;
        let mut settings = (*self.settings.get()).clone();
        let known = self.categorizer().get(&category.id).is_some()
            || settings.custom_categories.iter().any(|c| c.id == category.id);
        if known {
            return Err(EngineError::duplicate(EntityKind::Category, &category.id));
        }
        settings.custom_categories.push(category);
        self.settings.save(settings)?;
        Ok(())
    }

    /// Applies a desktop scan to the icon registry.
    pub fn refresh(&self, scanner: &dyn DesktopScanner) -> EngineResult<RefreshSummary> {
        self.icons.refresh(scanner)
    }

    /// Creates an empty fence styled from the current settings.
    pub fn create_fence(&self, title: &str) -> EngineResult<Fence> {
        let settings = self.settings.get();
        let mut fence = Fence::new(title).with_style(settings.default_fence_style());
        fence.icon_spacing = settings.icon_spacing;
        fence.show_title = settings.show_fence_titles;
        self.index.create_fence(fence)
    }

    /// Creates a fence collecting one category, placed after existing fences.
    pub fn create_category_fence(&self, category_id: &str) -> EngineResult<Fence> {
        let categorizer = self.categorizer();
        let category = categorizer
            .get(category_id)
            .ok_or_else(|| EngineError::not_found(EntityKind::Category, category_id))?;

        let settings = self.settings.get();
        let slot = self.index.fence_count();
        let mut fence = Fence::new(&category.name)
            .with_style(settings.default_fence_style())
            .with_category(category_id);
        fence.style.title = category.color;
        fence.icon_spacing = settings.icon_spacing;
        fence.show_title = settings.show_fence_titles;
        fence.position = slot_position(slot, &fence);
        if settings.grid_snapping {
            fence.position = fence.position.snapped(settings.grid_size);
        }
        self.index.create_fence(fence)
    }

    /// Moves a fence, snapping to the grid when enabled in the settings.
    pub fn move_fence(&self, id: Uuid, position: Point) -> EngineResult<Fence> {
        let settings = self.settings.get();
        let position = if settings.grid_snapping {
            position.snapped(settings.grid_size)
        } else {
            position
        };
        self.index.move_fence(id, position)
    }

    /// Routes unfenced icons into fences by user rules, then by category.
    ///
    /// With `create_missing`, a fence is created for every matched category
    /// that has none before assignments are made.
    pub fn auto_organize(&self, create_missing: bool) -> EngineResult<OrganizeSummary> {
        let settings = self.settings.get();
        let categorizer = self.categorizer();
        let organizer = Organizer::new(&settings.auto_organize_rules, &categorizer);

        let icons = self.index.icons();
        let mut plan = organizer.plan(&icons, &self.index.list_fences());

        let mut summary = OrganizeSummary::default();
        if create_missing && !plan.missing_categories.is_empty() {
            for category_id in &plan.missing_categories {
                summary
                    .created_fences
                    .push(self.create_category_fence(category_id)?);
            }
            plan = organizer.plan(&icons, &self.index.list_fences());
        }

        for assignment in &plan.assignments {
            match self.index.assign(&assignment.path, assignment.fence_id) {
                Ok(()) => summary.assigned += 1,
                Err(e) if e.is_not_found() => {
                    tracing::debug!("Skipping assignment of '{}': {}", assignment.path, e);
                }
                Err(e) => return Err(e),
            }
        }

        summary.missing_categories = plan.missing_categories;
        summary.unmatched = plan.unmatched;
        tracing::info!(
            "Auto-organize: {} assigned, {} fence(s) created, {} unmatched",
            summary.assigned,
            summary.created_fences.len(),
            summary.unmatched.len()
        );
        Ok(summary)
    }

    /// Captures the live arrangement into a new layout.
    pub fn capture_layout(&self, name: &str) -> EngineResult<Uuid> {
        self.layouts.capture_current(name)
    }

    /// Applies a layout's arrangement to the live desktop, then makes it the
    /// active layout. A rejected arrangement leaves the active pointer alone.
    pub fn restore_layout(&self, id: Uuid) -> EngineResult<ArrangementReport> {
        let layout = self.layouts.get(id)?;
        let report = self.index.apply_arrangement(&layout)?;
        self.layouts.set_active(id)?;
        Ok(report)
    }
}

fn slot_position(slot: usize, fence: &Fence) -> Point {
    let column = i32::try_from(slot % FENCES_PER_ROW).unwrap_or(0);
    let row = i32::try_from(slot / FENCES_PER_ROW).unwrap_or(0);
    let width = i32::try_from(fence.size.width).unwrap_or(i32::MAX / 8);
    let height = i32::try_from(fence.size.height).unwrap_or(i32::MAX / 8);
    Point::new(
        FENCE_GAP + column * (width + FENCE_GAP),
        FENCE_GAP + row * (height + FENCE_GAP),
    )
}
