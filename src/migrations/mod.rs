//! Data migrations module
//!
//! Schema-version tracking and ordered, transactional data migrations,
//! plus the read-mostly maintenance passes (integrity check, orphaned
//! photo cleanup) that keep the record store healthy.

pub mod catalog;
pub mod manager;
pub mod registry;

pub use catalog::builtin_registry;
pub use manager::{
    CleanupReport, CompatibilityReport, IntegrityReport, MigrationError, MigrationManager,
    MigrationReport,
};
pub use registry::{DataMigration, MigrationInfo, MigrationRegistry};
