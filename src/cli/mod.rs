//! Command-line interface commands.
//!
//! Every command builds its own engine over the resolved config directory,
//! prints human-readable text by default and JSON with `--json`.

pub mod category;
pub mod common;
pub mod config;
pub mod layout;
pub mod organize;
pub mod scan;

pub use category::CategoryArgs;
pub use common::{exit_status, CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use layout::LayoutArgs;
pub use organize::OrganizeArgs;
pub use scan::ScanArgs;
