//! DeskFence - desktop icon organizer
//!
//! Scans a desktop folder, routes icons into category fences and stores the
//! resulting arrangements as restorable layouts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use deskfence::cli::{
    exit_status, CategoryArgs, CliResult, ConfigArgs, LayoutArgs, OrganizeArgs, ScanArgs,
};
use deskfence::config::AppPaths;
use deskfence::constants::{APP_NAME, CONFIG_DIR_ENV};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// DeskFence - desktop icon organizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding settings and stored layouts
    #[arg(long, value_name = "DIR", env = CONFIG_DIR_ENV, global = true)]
    config_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a desktop folder and classify its entries
    Scan(ScanArgs),
    /// Organize a desktop folder into category fences
    Organize(OrganizeArgs),
    /// Manage icon categories
    Category(CategoryArgs),
    /// Manage stored layouts
    Layout(LayoutArgs),
    /// Manage settings
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays clean on stdout
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths = AppPaths::resolve(cli.config_dir.as_deref())?;
    tracing::debug!("{} using config directory {}", APP_NAME, paths.config_dir().display());

    let result = run(cli.command, &paths);
    std::process::exit(exit_status(&result));
}

fn run(command: Command, paths: &AppPaths) -> CliResult<()> {
    match command {
        Command::Scan(args) => args.execute(paths),
        Command::Organize(args) => args.execute(paths),
        Command::Category(args) => args.execute(paths),
        Command::Layout(args) => args.execute(paths),
        Command::Config(args) => args.execute(paths),
    }
}
