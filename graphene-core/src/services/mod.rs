//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod crypto;
mod distribution;
pub mod keys;
pub mod logging;
pub mod migration;
mod status;
mod store;

pub use crypto::FieldCipher;
pub use distribution::{DistributionResult, DistributionService};
pub use keys::{KeyMaterial, KeyService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use status::{StatusService, StatusSummary};
pub use store::AccountStore;
