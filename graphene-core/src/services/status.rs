//! Status service - store summaries for the CLI

use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::locale::SUPPORTED_LOCALES;
use crate::domain::result::Result;
use crate::domain::KeySource;

/// Status service for store summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
    key_source: KeySource,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>, key_source: KeySource) -> Self {
        Self {
            repository,
            key_source,
        }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let total_accounts = self.repository.count_accounts()?;
        let db_path = self.repository.db_path();
        let db_size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

        Ok(StatusSummary {
            total_accounts,
            db_path: db_path.display().to_string(),
            db_size_bytes,
            key_source: self.key_source.as_str().to_string(),
            supported_locales: SUPPORTED_LOCALES.iter().map(|l| l.to_string()).collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub db_path: String,
    pub db_size_bytes: u64,
    pub key_source: String,
    pub supported_locales: Vec<String>,
}
