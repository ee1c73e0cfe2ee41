//! DeskFence Library
//!
//! This library provides the desktop organization engine: concurrent registries
//! for icons, fences and layouts, rule-based icon categorization, layout
//! snapshots with a single active layout, and a settings holder with change
//! notification.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod registry;
pub mod services;
pub mod storage;

pub use engine::{Engine, OrganizeSummary};
pub use error::{EngineError, EngineResult, EntityKind};
