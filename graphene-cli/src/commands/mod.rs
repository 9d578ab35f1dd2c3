//! CLI command implementations

pub mod account;
pub mod airdrop;
pub mod balance;
pub mod info;
pub mod key;
pub mod locale;
pub mod logs;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use graphene_core::{EntryPoint, GrapheneContext, LogEvent, LoggingService};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let graphene_dir = get_graphene_dir();
    std::fs::create_dir_all(&graphene_dir).ok()?;
    LoggingService::new(&graphene_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the graphene directory from environment or default
pub fn get_graphene_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GRAPHENE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".graphene")
    }
}

/// Get or create graphene context
pub fn get_context() -> Result<GrapheneContext> {
    let graphene_dir = get_graphene_dir();

    std::fs::create_dir_all(&graphene_dir)
        .with_context(|| format!("Failed to create graphene directory: {:?}", graphene_dir))?;

    GrapheneContext::new(&graphene_dir).context("Failed to initialize graphene context")
}
