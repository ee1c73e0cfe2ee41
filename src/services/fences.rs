//! Fence membership index.
//!
//! Owns the icon and fence registries and is the only place where an icon's
//! owning-fence reference or a fence's icon collection changes. Every membership
//! transition runs under one transition lock, so an icon is in at most one
//! fence and concurrent assigns into the same fence never lose an update.
//! Attribute edits (position, title, style) go straight to the sharded
//! registries and do not contend on that lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::{DesktopIcon, DesktopLayout, Fence, FenceSnapshot, IconSortRule, Point, Size};
use crate::registry::Registry;

/// Outcome of applying a layout's arrangement to the live desktop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrangementReport {
    /// Fences now live
    pub fences: usize,
    /// Icons placed into a fence
    pub assigned: usize,
    /// Icons left unfenced with a restored position
    pub unfenced: usize,
    /// Icon paths in the layout that no longer exist on the desktop
    pub skipped: Vec<String>,
}

/// Keeps fence collections and icon owning-fence references consistent.
#[derive(Debug)]
pub struct FenceIndex {
    icons: Registry<String, DesktopIcon>,
    fences: Registry<Uuid, Fence>,
    transitions: Mutex<()>,
}

impl Default for FenceIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FenceIndex {
    /// Creates an index with empty registries.
    pub fn new() -> Self {
        Self {
            icons: Registry::new(EntityKind::Icon),
            fences: Registry::new(EntityKind::Fence),
            transitions: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Fences
    // ---------------------------------------------------------------------

    /// Registers a new fence.
    ///
    /// Any icon paths on the incoming value are dropped: membership is only
    /// established through [`FenceIndex::assign`].
    pub fn create_fence(&self, mut fence: Fence) -> EngineResult<Fence> {
        if fence.size.is_empty() {
            return Err(EngineError::Validation(format!(
                "Fence '{}' must have a non-zero size",
                fence.title
            )));
        }
        fence.icons.clear();
        fence.style = fence.style.clamped();
        self.fences.add(fence.id, fence.clone())?;
        tracing::info!("Created fence '{}' ({})", fence.title, fence.id);
        Ok(fence)
    }

    /// Returns a copy of a fence.
    pub fn get_fence(&self, id: Uuid) -> EngineResult<Fence> {
        self.fences.get(&id)
    }

    /// All fences ordered by creation time, then id.
    pub fn list_fences(&self) -> Vec<Fence> {
        let mut fences = self.fences.list_all();
        fences.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        fences
    }

    /// Number of registered fences.
    pub fn fence_count(&self) -> usize {
        self.fences.len()
    }

    /// Replaces a fence's attributes.
    ///
    /// Identity, creation time and the icon collection are kept from the
    /// stored fence. A changed sort rule reorders the collection.
    pub fn update_fence(&self, fence: Fence) -> EngineResult<Fence> {
        if fence.size.is_empty() {
            return Err(EngineError::Validation(format!(
                "Fence '{}' must have a non-zero size",
                fence.title
            )));
        }
        let id = fence.id;
        let (updated, resort) = self.fences.modify(&id, |stored| {
            let resort = stored.sort_rule != fence.sort_rule;
            let icons = std::mem::take(&mut stored.icons);
            let created = stored.created;
            *stored = fence;
            stored.icons = icons;
            stored.created = created;
            stored.style = stored.style.clamped();
            stored.touch();
            (stored.clone(), resort)
        })?;

        if resort {
            let _guard = self.lock();
            return self.resort(id);
        }
        Ok(updated)
    }

    /// Moves a fence. Locked fences are rejected with `InvalidState`.
    pub fn move_fence(&self, id: Uuid, position: Point) -> EngineResult<Fence> {
        self.fences.modify(&id, |fence| {
            if fence.locked {
                return Err(EngineError::InvalidState(format!(
                    "Fence '{}' is locked and cannot be moved",
                    fence.title
                )));
            }
            fence.position = position;
            fence.touch();
            Ok(fence.clone())
        })?
    }

    /// Resizes a fence. Zero-sized fences are rejected with `Validation`.
    pub fn resize_fence(&self, id: Uuid, size: Size) -> EngineResult<Fence> {
        if size.is_empty() {
            return Err(EngineError::Validation(format!(
                "Fence size {}x{} must be non-zero",
                size.width, size.height
            )));
        }
        self.fences.modify(&id, |fence| {
            if fence.locked {
                return Err(EngineError::InvalidState(format!(
                    "Fence '{}' is locked and cannot be resized",
                    fence.title
                )));
            }
            fence.size = size;
            fence.touch();
            Ok(fence.clone())
        })?
    }

    /// Sets a fence's sort rule and reorders its icon collection.
    pub fn sort_fence(&self, id: Uuid, rule: IconSortRule) -> EngineResult<Fence> {
        let _guard = self.lock();
        self.fences.modify(&id, |fence| fence.sort_rule = rule)?;
        self.resort(id)
    }

    /// Deletes a fence. Its icons become unfenced, not deleted.
    pub fn remove_fence(&self, id: Uuid) -> EngineResult<Fence> {
        let _guard = self.lock();
        let fence = self.fences.remove(&id)?;
        for path in &fence.icons {
            let _ = self.icons.modify(path, |icon| {
                if icon.fence_id == Some(id) {
                    icon.fence_id = None;
                }
            });
        }
        tracing::info!(
            "Removed fence '{}' ({}), {} icon(s) unfenced",
            fence.title,
            id,
            fence.icons.len()
        );
        Ok(fence)
    }

    // ---------------------------------------------------------------------
    // Membership
    // ---------------------------------------------------------------------

    /// Places an icon into a fence, detaching it from its previous fence first.
    ///
    /// Idempotent when the icon is already in the target fence.
    ///
    /// # Errors
    ///
    /// `NotFound` if either the fence or the icon is absent; nothing changes
    /// in that case.
    pub fn assign(&self, path: &str, fence_id: Uuid) -> EngineResult<()> {
        let key = path.to_string();
        let _guard = self.lock();

        let target = self.fences.get(&fence_id)?;
        let icon = self.icons.get(&key)?;

        if icon.fence_id == Some(fence_id) && target.contains(path) {
            return Ok(());
        }

        if let Some(previous) = icon.fence_id.filter(|previous| *previous != fence_id) {
            let _ = self.fences.modify(&previous, |fence| fence.remove_icon(path));
            self.icons.modify(&key, |icon| icon.fence_id = None)?;
            tracing::debug!("Detached '{}' from fence {}", path, previous);
        }

        self.fences.modify(&fence_id, |fence| fence.push_icon(path))?;
        self.icons
            .modify(&key, |icon| icon.fence_id = Some(fence_id))?;
        if target.sort_rule != IconSortRule::None {
            self.resort(fence_id)?;
        }

        tracing::debug!("Assigned '{}' to fence '{}'", path, target.title);
        Ok(())
    }

    /// Removes an icon from its fence. No-op for unfenced icons.
    pub fn detach(&self, path: &str) -> EngineResult<()> {
        let _guard = self.lock();
        self.detach_locked(path)
    }

    fn detach_locked(&self, path: &str) -> EngineResult<()> {
        let key = path.to_string();
        let Some(previous) = self.icons.get(&key)?.fence_id else {
            return Ok(());
        };
        let _ = self.fences.modify(&previous, |fence| fence.remove_icon(path));
        self.icons.modify(&key, |icon| icon.fence_id = None)?;
        tracing::debug!("Detached '{}' from fence {}", path, previous);
        Ok(())
    }

    /// Snapshot of a fence's icons in display order.
    ///
    /// Only icons whose owning-fence reference points at this fence are
    /// returned.
    pub fn icons_of(&self, fence_id: Uuid) -> EngineResult<Vec<DesktopIcon>> {
        let fence = self.fences.get(&fence_id)?;
        Ok(fence
            .icons
            .iter()
            .filter_map(|path| self.icons.get(path).ok())
            .filter(|icon| icon.fence_id == Some(fence_id))
            .collect())
    }

    /// The fence holding an icon, if any.
    pub fn fence_of(&self, path: &str) -> EngineResult<Option<Fence>> {
        let icon = self.icons.get(&path.to_string())?;
        Ok(icon.fence_id.and_then(|id| self.fences.get(&id).ok()))
    }

    /// Icons not held by any fence, ordered by path.
    pub fn unfenced_icons(&self) -> Vec<DesktopIcon> {
        let mut icons: Vec<_> = self
            .icons
            .list_all()
            .into_iter()
            .filter(DesktopIcon::is_unfenced)
            .collect();
        icons.sort_by(|a, b| a.path.cmp(&b.path));
        icons
    }

    /// Consistent view of every fence with its icons plus the unfenced icons.
    ///
    /// Taken under the transition lock, so no icon appears twice.
    pub fn arrangement(&self) -> (Vec<FenceSnapshot>, Vec<DesktopIcon>) {
        let _guard = self.lock();
        let fences = self
            .list_fences()
            .into_iter()
            .map(|fence| {
                let icons = fence
                    .icons
                    .iter()
                    .filter_map(|path| self.icons.get(path).ok())
                    .filter(|icon| icon.fence_id == Some(fence.id))
                    .collect();
                FenceSnapshot { fence, icons }
            })
            .collect();
        (fences, self.unfenced_icons())
    }

    /// Replaces the live fence set with a layout's arrangement.
    ///
    /// Fences keep the layout's ids. Icons that still exist are re-assigned and
    /// get their captured position back; icons that vanished are reported in
    /// `skipped`. Live icons the layout does not mention end up unfenced.
    ///
    /// The layout is checked before either registry changes: repeated fence
    /// ids or an empty fence size reject it and leave the live desktop as is.
    pub fn apply_arrangement(&self, layout: &DesktopLayout) -> EngineResult<ArrangementReport> {
        let _guard = self.lock();

        let mut ids = HashSet::with_capacity(layout.fences.len());
        for snapshot in &layout.fences {
            let fence = &snapshot.fence;
            if !ids.insert(fence.id) {
                return Err(EngineError::duplicate(EntityKind::Fence, fence.id));
            }
            if fence.size.is_empty() {
                return Err(EngineError::Validation(format!(
                    "Fence '{}' in layout '{}' must have a non-zero size",
                    fence.title, layout.name
                )));
            }
        }

        for path in self.icons.keys() {
            let _ = self.icons.modify(&path, |icon| icon.fence_id = None);
        }
        self.fences.clear();

        let mut report = ArrangementReport::default();
        let mut placed: HashSet<&str> = HashSet::new();

        for snapshot in &layout.fences {
            let positions: HashMap<&str, Point> = snapshot
                .icons
                .iter()
                .map(|icon| (icon.path.as_str(), icon.position))
                .collect();

            let mut fence = snapshot.fence.clone();
            let mut members = Vec::with_capacity(fence.icons.len());
            for path in &snapshot.fence.icons {
                if !self.icons.contains(path) {
                    report.skipped.push(path.clone());
                    continue;
                }
                if !placed.insert(path.as_str()) {
                    continue;
                }
                let position = positions.get(path.as_str()).copied();
                self.icons.modify(path, |icon| {
                    icon.fence_id = Some(fence.id);
                    if let Some(position) = position {
                        icon.position = position;
                    }
                })?;
                members.push(path.clone());
            }
            report.assigned += members.len();
            fence.icons = members;
            self.fences.add(fence.id, fence)?;
            report.fences += 1;
        }

        for icon in &layout.unfenced_icons {
            if !self.icons.contains(&icon.path) {
                report.skipped.push(icon.path.clone());
                continue;
            }
            if placed.contains(icon.path.as_str()) {
                continue;
            }
            self.icons
                .modify(&icon.path, |live| live.position = icon.position)?;
            report.unfenced += 1;
        }

        tracing::info!(
            "Applied layout '{}': {} fence(s), {} assigned, {} unfenced, {} skipped",
            layout.name,
            report.fences,
            report.assigned,
            report.unfenced,
            report.skipped.len()
        );
        Ok(report)
    }

    // ---------------------------------------------------------------------
    // Icons
    // ---------------------------------------------------------------------

    /// Returns a copy of an icon.
    pub fn icon(&self, path: &str) -> EngineResult<DesktopIcon> {
        self.icons.get(&path.to_string())
    }

    /// Returns true if the icon path is registered.
    pub fn has_icon(&self, path: &str) -> bool {
        self.icons.contains(&path.to_string())
    }

    /// Every icon, ordered by path.
    pub fn icons(&self) -> Vec<DesktopIcon> {
        let mut icons = self.icons.list_all();
        icons.sort_by(|a, b| a.path.cmp(&b.path));
        icons
    }

    /// Number of registered icons.
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    pub(crate) fn insert_icon(&self, mut icon: DesktopIcon) -> EngineResult<DesktopIcon> {
        icon.fence_id = None;
        self.icons.add(icon.path.clone(), icon.clone())?;
        Ok(icon)
    }

    pub(crate) fn modify_icon<R>(
        &self,
        path: &str,
        f: impl FnOnce(&mut DesktopIcon) -> R,
    ) -> EngineResult<R> {
        self.icons.modify(&path.to_string(), f)
    }

    pub(crate) fn delete_icon(&self, path: &str) -> EngineResult<DesktopIcon> {
        let _guard = self.lock();
        self.detach_locked(path)?;
        self.icons.remove(&path.to_string())
    }

    /// Reorders a fence's collection by its sort rule. Caller holds the lock.
    fn resort(&self, id: Uuid) -> EngineResult<Fence> {
        let paths = self.fences.get(&id)?.icons;
        let members: Vec<DesktopIcon> = paths
            .iter()
            .filter_map(|path| self.icons.get(path).ok())
            .collect();
        self.fences.modify(&id, |fence| {
            fence.sort_members(&members);
            fence.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn index_with_icons(paths: &[&str]) -> FenceIndex {
        let index = FenceIndex::new();
        for path in paths {
            index.insert_icon(DesktopIcon::new(*path, *path)).unwrap();
        }
        index
    }

    fn assert_consistent(index: &FenceIndex) {
        for icon in index.icons() {
            let holders: Vec<_> = index
                .list_fences()
                .into_iter()
                .filter(|fence| fence.contains(&icon.path))
                .collect();
            assert!(holders.len() <= 1, "{} held by {} fences", icon.path, holders.len());
            assert_eq!(icon.fence_id, holders.first().map(|fence| fence.id));
        }
    }

    #[test]
    fn test_assign_moves_between_fences() {
        let index = index_with_icons(&["/desk/x.txt"]);
        let f1 = index.create_fence(Fence::new("F1")).unwrap();
        let f2 = index.create_fence(Fence::new("F2")).unwrap();

        index.assign("/desk/x.txt", f1.id).unwrap();
        index.assign("/desk/x.txt", f2.id).unwrap();

        assert!(index.get_fence(f1.id).unwrap().icons.is_empty());
        assert_eq!(index.get_fence(f2.id).unwrap().icons, vec!["/desk/x.txt"]);
        assert_eq!(index.icon("/desk/x.txt").unwrap().fence_id, Some(f2.id));
        assert_consistent(&index);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let index = index_with_icons(&["/desk/x.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();

        index.assign("/desk/x.txt", fence.id).unwrap();
        index.assign("/desk/x.txt", fence.id).unwrap();

        assert_eq!(index.icons_of(fence.id).unwrap().len(), 1);
    }

    #[test]
    fn test_assign_unknown_entities() {
        let index = index_with_icons(&["/desk/x.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();

        let err = index.assign("/desk/missing.txt", fence.id).unwrap_err();
        assert!(err.is_not_found());
        let err = index.assign("/desk/x.txt", Uuid::new_v4()).unwrap_err();
        assert!(err.is_not_found());
        assert!(index.get_fence(fence.id).unwrap().icons.is_empty());
    }

    #[test]
    fn test_detach_unfenced_is_noop() {
        let index = index_with_icons(&["/desk/x.txt"]);
        index.detach("/desk/x.txt").unwrap();
        assert_eq!(index.unfenced_icons().len(), 1);
    }

    #[test]
    fn test_remove_fence_unfences_icons() {
        let index = index_with_icons(&["/desk/a.txt", "/desk/b.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();
        index.assign("/desk/a.txt", fence.id).unwrap();
        index.assign("/desk/b.txt", fence.id).unwrap();

        let removed = index.remove_fence(fence.id).unwrap();
        assert_eq!(removed.icons.len(), 2);
        assert_eq!(index.unfenced_icons().len(), 2);
        assert_eq!(index.icon_count(), 2);
    }

    #[test]
    fn test_duplicate_fence_leaves_existing() {
        let index = FenceIndex::new();
        let fence = index.create_fence(Fence::new("Original")).unwrap();

        let mut clash = Fence::new("Clash");
        clash.id = fence.id;
        let err = index.create_fence(clash).unwrap_err();
        assert_eq!(err, EngineError::duplicate(EntityKind::Fence, fence.id));
        assert_eq!(index.get_fence(fence.id).unwrap().title, "Original");
    }

    #[test]
    fn test_create_fence_drops_incoming_members() {
        let index = FenceIndex::new();
        let mut fence = Fence::new("F");
        fence.icons.push("/desk/ghost.txt".to_string());
        let created = index.create_fence(fence).unwrap();
        assert!(created.icons.is_empty());
    }

    #[test]
    fn test_locked_fence_rejects_move_and_resize() {
        let index = FenceIndex::new();
        let mut fence = Fence::new("F");
        fence.locked = true;
        let fence = index.create_fence(fence).unwrap();

        let err = index.move_fence(fence.id, Point::new(5, 5)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
        let err = index.resize_fence(fence.id, Size::new(10, 10)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn test_resize_rejects_empty_size() {
        let index = FenceIndex::new();
        let fence = index.create_fence(Fence::new("F")).unwrap();
        let err = index.resize_fence(fence.id, Size::new(0, 10)).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let resized = index.resize_fence(fence.id, Size::new(300, 100)).unwrap();
        assert_eq!(resized.size, Size::new(300, 100));
    }

    #[test]
    fn test_update_fence_keeps_membership() {
        let index = index_with_icons(&["/desk/a.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();
        index.assign("/desk/a.txt", fence.id).unwrap();

        let mut edited = index.get_fence(fence.id).unwrap();
        edited.title = "Renamed".to_string();
        edited.icons.clear();
        let updated = index.update_fence(edited).unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.icons, vec!["/desk/a.txt"]);
    }

    #[test]
    fn test_sort_fence() {
        let index = index_with_icons(&["/desk/c.txt", "/desk/a.txt", "/desk/b.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();
        for path in ["/desk/c.txt", "/desk/a.txt", "/desk/b.txt"] {
            index.assign(path, fence.id).unwrap();
        }

        let sorted = index.sort_fence(fence.id, IconSortRule::NameAscending).unwrap();
        assert_eq!(sorted.icons, vec!["/desk/a.txt", "/desk/b.txt", "/desk/c.txt"]);

        index
            .insert_icon(DesktopIcon::new("/desk/0.txt", "/desk/0.txt"))
            .unwrap();
        index.assign("/desk/0.txt", fence.id).unwrap();
        assert_eq!(index.get_fence(fence.id).unwrap().icons[0], "/desk/0.txt");
    }

    #[test]
    fn test_delete_icon_detaches() {
        let index = index_with_icons(&["/desk/a.txt"]);
        let fence = index.create_fence(Fence::new("F")).unwrap();
        index.assign("/desk/a.txt", fence.id).unwrap();

        index.delete_icon("/desk/a.txt").unwrap();
        assert!(index.get_fence(fence.id).unwrap().icons.is_empty());
        assert!(index.icon("/desk/a.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_apply_arrangement_skips_vanished_icons() {
        let index = index_with_icons(&["/desk/a.txt", "/desk/b.txt"]);
        let mut layout = DesktopLayout::new("L").unwrap();
        let mut fence = Fence::new("Docs");
        fence.icons = vec!["/desk/a.txt".to_string(), "/desk/gone.txt".to_string()];
        let snapshot_icon = DesktopIcon::new("/desk/a.txt", "a").with_position(Point::new(7, 9));
        layout.fences.push(FenceSnapshot {
            fence: fence.clone(),
            icons: vec![snapshot_icon],
        });
        layout
            .unfenced_icons
            .push(DesktopIcon::new("/desk/b.txt", "b").with_position(Point::new(1, 2)));

        let report = index.apply_arrangement(&layout).unwrap();
        assert_eq!(report.fences, 1);
        assert_eq!(report.assigned, 1);
        assert_eq!(report.unfenced, 1);
        assert_eq!(report.skipped, vec!["/desk/gone.txt"]);

        let a = index.icon("/desk/a.txt").unwrap();
        assert_eq!(a.fence_id, Some(fence.id));
        assert_eq!(a.position, Point::new(7, 9));
        assert_eq!(index.icon("/desk/b.txt").unwrap().position, Point::new(1, 2));
        assert_consistent(&index);
    }

    #[test]
    fn test_apply_arrangement_rejects_repeated_fence_ids() {
        let index = index_with_icons(&["/desk/a.txt", "/desk/b.txt"]);
        let live = index.create_fence(Fence::new("Live")).unwrap();
        index.assign("/desk/a.txt", live.id).unwrap();

        let mut layout = DesktopLayout::new("Broken").unwrap();
        let mut first = Fence::new("First");
        first.icons = vec!["/desk/b.txt".to_string()];
        let mut second = first.clone();
        second.title = "Second".to_string();
        for fence in [first, second] {
            layout.fences.push(FenceSnapshot { fence, icons: Vec::new() });
        }

        let err = index.apply_arrangement(&layout).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKey { kind: EntityKind::Fence, .. }));

        assert_eq!(index.fence_count(), 1);
        assert_eq!(index.get_fence(live.id).unwrap().icons, vec!["/desk/a.txt"]);
        assert_eq!(index.icon("/desk/a.txt").unwrap().fence_id, Some(live.id));
        assert_eq!(index.icon("/desk/b.txt").unwrap().fence_id, None);
        assert_consistent(&index);
    }

    #[test]
    fn test_apply_arrangement_rejects_empty_fence_size() {
        let index = index_with_icons(&["/desk/a.txt"]);
        let live = index.create_fence(Fence::new("Live")).unwrap();
        index.assign("/desk/a.txt", live.id).unwrap();

        let mut layout = DesktopLayout::new("Flat").unwrap();
        let mut fence = Fence::new("Flat");
        fence.size = Size::new(0, 0);
        layout.fences.push(FenceSnapshot { fence, icons: Vec::new() });

        let err = index.apply_arrangement(&layout).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(index.list_fences(), vec![index.get_fence(live.id).unwrap()]);
        assert_eq!(index.icon("/desk/a.txt").unwrap().fence_id, Some(live.id));
    }

    #[test]
    fn test_concurrent_assigns_into_same_fence() {
        let paths: Vec<String> = (0..64).map(|i| format!("/desk/{i}.txt")).collect();
        let index = Arc::new(FenceIndex::new());
        for path in &paths {
            index.insert_icon(DesktopIcon::new(path.clone(), path.clone())).unwrap();
        }
        let fence_id = index.create_fence(Fence::new("F")).unwrap().id;

        thread::scope(|s| {
            for chunk in paths.chunks(8) {
                let index = Arc::clone(&index);
                s.spawn(move || {
                    for path in chunk {
                        index.assign(path, fence_id).unwrap();
                    }
                });
            }
        });

        assert_eq!(index.icons_of(fence_id).unwrap().len(), 64);
        assert_consistent(&index);
    }

    #[test]
    fn test_concurrent_moves_keep_single_owner() {
        let index = Arc::new(index_with_icons(&["/desk/x.txt"]));
        let fences: Vec<Uuid> = (0..4)
            .map(|i| index.create_fence(Fence::new(format!("F{i}"))).unwrap().id)
            .collect();

        thread::scope(|s| {
            for (i, fence) in fences.iter().enumerate() {
                let index = Arc::clone(&index);
                s.spawn(move || {
                    for _ in 0..50 {
                        index.assign("/desk/x.txt", *fence).unwrap();
                        if i % 2 == 0 {
                            index.detach("/desk/x.txt").unwrap();
                        }
                    }
                });
            }
        });

        assert_consistent(&index);
    }
}
