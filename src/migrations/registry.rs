//! Migration trait and registry
//!
//! Data migrations are registered once at startup into an ordered,
//! immutable registry. Registration order is execution order; version
//! strings are labels for humans and never influence ordering. The
//! persisted applied-list is the sole source of truth for "already ran".

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::HashSet;
use std::sync::Arc;

/// One unit of data transformation with a stable identifier.
///
/// `up` runs inside the transaction the manager opens for the whole run;
/// it must not commit or roll back itself. Migrations that can be safely
/// undone override `down` and report `supports_rollback`.
#[async_trait]
pub trait DataMigration: Send + Sync {
    /// Stable unique identifier; once shipped it never changes
    fn id(&self) -> &'static str;

    /// App version that introduced this migration (informational)
    fn version(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn up(&self, conn: &mut SqliteConnection) -> Result<()>;

    fn supports_rollback(&self) -> bool {
        false
    }

    async fn down(&self, _conn: &mut SqliteConnection) -> Result<()> {
        Err(AppError::RollbackNotSupported(self.id().to_string()))
    }
}

/// Human-facing summary of a registered migration
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MigrationInfo {
    pub id: String,
    pub version: String,
    pub description: String,
}

impl MigrationInfo {
    pub fn of(migration: &dyn DataMigration) -> Self {
        Self {
            id: migration.id().to_string(),
            version: migration.version().to_string(),
            description: migration.description().to_string(),
        }
    }
}

/// Ordered, validated set of registered migrations
#[derive(Clone)]
pub struct MigrationRegistry {
    migrations: Vec<Arc<dyn DataMigration>>,
}

impl MigrationRegistry {
    /// Build a registry, rejecting duplicate ids.
    ///
    /// Two migrations sharing an id would make the applied-list
    /// ambiguous, so this is a fatal configuration error.
    pub fn new(migrations: Vec<Arc<dyn DataMigration>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for migration in &migrations {
            if !seen.insert(migration.id()) {
                return Err(AppError::Config(format!(
                    "duplicate migration id: {}",
                    migration.id()
                )));
            }
        }

        Ok(Self { migrations })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DataMigration>> {
        self.migrations.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn DataMigration>> {
        self.migrations.iter().find(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}
