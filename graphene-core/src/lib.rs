//! Graphene Core - encrypted account store for the Graphene token bot
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, key metadata, errors)
//! - **ports**: Trait definitions for external dependencies (TransferProvider)
//! - **services**: Business logic orchestration (store, crypto, keys, distribution)
//! - **adapters**: Concrete implementations (DuckDB, mock transfer provider)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::{AccountStore, FieldCipher, KeyService, StatusService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Account, KeySource};
pub use ports::{TransferProvider, TransferReceipt};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Graphene operations
///
/// This is the primary entry point for consumers (the bot handlers and the
/// admin CLI). It resolves the master key, opens the database, runs pending
/// migrations, and wires the services together.
pub struct GrapheneContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub account_store: Arc<AccountStore>,
    pub status_service: StatusService,
}

impl GrapheneContext {
    /// Create a new Graphene context rooted at `graphene_dir`
    pub fn new(graphene_dir: &Path) -> Result<Self> {
        let config = Config::load(graphene_dir)?;

        // Determine which database file to use
        let db_filename = if config.demo_mode {
            "demo.duckdb"
        } else {
            "graphene.duckdb"
        };
        let db_path = graphene_dir.join(db_filename);

        let repository = Arc::new(
            DuckDbRepository::new(&db_path)
                .with_context(|| format!("Failed to open database at {:?}", db_path))?,
        );
        repository.ensure_schema()?;

        let key = KeyService::new(graphene_dir)
            .load()
            .context("Failed to resolve master key")?;
        let cipher = FieldCipher::new(key.bytes());

        let account_store = Arc::new(AccountStore::new(Arc::clone(&repository), cipher));
        let status_service = StatusService::new(Arc::clone(&repository), key.source());

        Ok(Self {
            config,
            repository,
            account_store,
            status_service,
        })
    }
}
