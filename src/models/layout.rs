//! Layout snapshot data structures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::LAYOUT_VERSION;
use crate::error::{EngineError, EngineResult};
use crate::models::{DesktopIcon, Fence, Settings, Size};

/// A fence together with copies of its member icons at capture time.
///
/// `fence.icons` and `icons` list the same paths in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceSnapshot {
    /// Fence attributes
    pub fence: Fence,
    /// Owned icon records, in display order
    pub icons: Vec<DesktopIcon>,
}

/// Named, versioned snapshot of every fence and unfenced icon.
///
/// # Validation
///
/// - name must be non-empty, max 100 characters
/// - created must be <= modified
///
/// Ownership is tree-shaped (layout owns fences own icons), so cloning is a
/// plain value copy with fresh identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopLayout {
    /// Unique identifier
    pub id: Uuid,
    /// Layout name
    pub name: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Fences in capture order
    #[serde(default)]
    pub fences: Vec<FenceSnapshot>,
    /// Icons that were not in any fence
    #[serde(default)]
    pub unfenced_icons: Vec<DesktopIcon>,
    /// Desktop resolution at capture time
    #[serde(default)]
    pub resolution: Size,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
    /// Layout synthesized as the bootstrap default
    #[serde(default)]
    pub is_default: bool,
    /// Schema version (e.g., "1.0")
    #[serde(default = "default_version")]
    pub version: String,
    /// Settings in effect at capture time
    #[serde(default)]
    pub settings: Settings,
}

fn default_version() -> String {
    LAYOUT_VERSION.to_string()
}

impl DesktopLayout {
    /// Creates an empty layout with a fresh id.
    pub fn new(name: impl Into<String>) -> EngineResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            fences: Vec::new(),
            unfenced_icons: Vec::new(),
            resolution: Size::default(),
            created: now,
            modified: now,
            is_default: false,
            version: default_version(),
            settings: Settings::default(),
        })
    }

    /// Validates a layout name.
    pub fn validate_name(name: &str) -> EngineResult<()> {
        if name.trim().is_empty() {
            return Err(EngineError::Validation(
                "Layout name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > 100 {
            return Err(EngineError::Validation(format!(
                "Layout name '{name}' exceeds maximum length of 100 characters"
            )));
        }

        Ok(())
    }

    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Deep copy with fresh identity.
    ///
    /// The copy gets a new id, new timestamps and a cleared default flag. Every
    /// fence gets a new id, every icon record a new id, and fenced icons point
    /// at their copied fence. Thumbnails are copied by value.
    pub fn deep_copy(&self, name: impl Into<String>) -> EngineResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        let fence_ids: HashMap<Uuid, Uuid> = self
            .fences
            .iter()
            .map(|snapshot| (snapshot.fence.id, Uuid::new_v4()))
            .collect();

        let copy_icon = |icon: &DesktopIcon| {
            let mut copy = icon.clone();
            copy.id = Uuid::new_v4();
            copy.fence_id = icon
                .fence_id
                .map(|old| fence_ids.get(&old).copied().unwrap_or(old));
            copy
        };

        let fences = self
            .fences
            .iter()
            .map(|snapshot| {
                let mut fence = snapshot.fence.clone();
                fence.id = fence_ids
                    .get(&snapshot.fence.id)
                    .copied()
                    .unwrap_or_else(Uuid::new_v4);
                let icons = snapshot
                    .icons
                    .iter()
                    .map(|icon| {
                        let mut copy = copy_icon(icon);
                        copy.fence_id = Some(fence.id);
                        copy
                    })
                    .collect();
                FenceSnapshot { fence, icons }
            })
            .collect();

        let unfenced_icons = self.unfenced_icons.iter().map(copy_icon).collect();

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: self.description.clone(),
            fences,
            unfenced_icons,
            resolution: self.resolution,
            created: now,
            modified: now,
            is_default: false,
            version: self.version.clone(),
            settings: self.settings.clone(),
        })
    }

    /// Ids of every fence in the layout.
    pub fn fence_ids(&self) -> Vec<Uuid> {
        self.fences.iter().map(|snapshot| snapshot.fence.id).collect()
    }

    /// Ids of every icon record in the layout, fenced and unfenced.
    pub fn icon_ids(&self) -> Vec<Uuid> {
        self.fences
            .iter()
            .flat_map(|snapshot| snapshot.icons.iter())
            .chain(self.unfenced_icons.iter())
            .map(|icon| icon.id)
            .collect()
    }

    /// Total number of icons in the layout.
    pub fn icon_count(&self) -> usize {
        self.unfenced_icons.len()
            + self
                .fences
                .iter()
                .map(|snapshot| snapshot.icons.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout() -> DesktopLayout {
        let mut layout = DesktopLayout::new("Work").unwrap();
        let mut fence = Fence::new("Apps");
        let mut icon = DesktopIcon::new("/desk/steam.exe", "steam");
        icon.fence_id = Some(fence.id);
        icon.thumbnail = Some(vec![9, 9, 9]);
        fence.icons.push(icon.path.clone());
        layout.fences.push(FenceSnapshot {
            fence,
            icons: vec![icon],
        });
        layout
            .unfenced_icons
            .push(DesktopIcon::new("/desk/notes.txt", "notes"));
        layout.is_default = true;
        layout
    }

    #[test]
    fn test_new_validates_name() {
        assert!(DesktopLayout::new("").is_err());
        assert!(DesktopLayout::new("  ").is_err());
        assert!(DesktopLayout::new("a".repeat(101)).is_err());

        let layout = DesktopLayout::new("Home").unwrap();
        assert_eq!(layout.version, "1.0");
        assert!(layout.created <= layout.modified);
    }

    #[test]
    fn test_deep_copy_fresh_identity() {
        let source = sample_layout();
        let copy = source.deep_copy("Work (Copy)").unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, "Work (Copy)");
        assert!(!copy.is_default);

        for id in copy.fence_ids() {
            assert!(!source.fence_ids().contains(&id));
        }
        for id in copy.icon_ids() {
            assert!(!source.icon_ids().contains(&id));
        }
        assert_eq!(copy.icon_count(), source.icon_count());
    }

    #[test]
    fn test_deep_copy_rewrites_fence_references() {
        let source = sample_layout();
        let copy = source.deep_copy("Copy").unwrap();

        let fence = &copy.fences[0];
        assert_eq!(fence.icons[0].fence_id, Some(fence.fence.id));
        assert_eq!(fence.fence.icons, vec!["/desk/steam.exe".to_string()]);
        assert_eq!(fence.icons[0].thumbnail, Some(vec![9, 9, 9]));
        assert_eq!(copy.unfenced_icons[0].fence_id, None);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let source = sample_layout();
        let mut copy = source.deep_copy("Copy").unwrap();

        copy.fences[0].fence.title = "Changed".to_string();
        copy.fences[0].icons[0].name = "renamed".to_string();
        if let Some(bytes) = copy.fences[0].icons[0].thumbnail.as_mut() {
            bytes[0] = 0;
        }

        assert_eq!(source.fences[0].fence.title, "Apps");
        assert_eq!(source.fences[0].icons[0].name, "steam");
        assert_eq!(source.fences[0].icons[0].thumbnail, Some(vec![9, 9, 9]));
    }

    #[test]
    fn test_json_roundtrip() {
        let layout = sample_layout();
        let json = serde_json::to_string_pretty(&layout).unwrap();
        let parsed: DesktopLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, layout);
    }
}
