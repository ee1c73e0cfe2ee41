//! Service layer for the organization engine.
//!
//! Each service owns one concern and is shared behind `Arc`; the
//! [`Engine`](crate::engine::Engine) wires them together.

pub mod categorizer;
pub mod fences;
pub mod icons;
pub mod layouts;
pub mod organizer;
pub mod settings;

// Re-export commonly used types
pub use categorizer::{categorize, match_reason, Categorizer, Classification, MatchReason};
pub use fences::{ArrangementReport, FenceIndex};
pub use icons::{DesktopScanner, DirectoryScanner, IconService, IngestOutcome, RefreshSummary};
pub use layouts::{LayoutService, LayoutStore};
pub use organizer::{rule_matches, AssignmentSource, OrganizePlan, Organizer, PlannedAssignment};
pub use settings::{SettingsHolder, SettingsStore, SubscriptionId};
