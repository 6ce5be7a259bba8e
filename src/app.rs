//! Application bootstrap
//!
//! Wires the whole engine together: data directories, database pool,
//! startup migrations, and the services the shell talks to. A failed
//! migration run aborts initialization — the app must never run against
//! data in a shape it does not expect, so the shell should block
//! startup and offer a retry.

use crate::database::{create_pool, Repository};
use crate::error::{AppError, Result};
use crate::migrations::{builtin_registry, MigrationManager};
use crate::services::{PhotosService, RecordsService, StatsService};
use crate::storage::PhotoStore;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the process. Call once, before `App::initialize`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catchlog=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// The initialized engine: all services, ready for the shell
#[derive(Clone)]
pub struct App {
    pub records: RecordsService,
    pub photos: PhotosService,
    pub stats: StatsService,
    pub migrations: MigrationManager,
}

impl App {
    /// Initialize the engine under the given data directory.
    ///
    /// Creates directories, opens the database, verifies schema
    /// compatibility, and applies pending data migrations before any
    /// service is handed out.
    pub async fn initialize(data_dir: &Path) -> Result<Self> {
        tracing::info!("Initializing application at {:?}", data_dir);

        std::fs::create_dir_all(data_dir)?;

        let pool = create_pool(&data_dir.join("catchlog.db")).await?;
        let repo = Repository::new(pool);

        let photo_store = PhotoStore::new(data_dir.join("photos"));
        photo_store.initialize().await?;

        let registry = builtin_registry()?;
        let migrations = MigrationManager::new(repo.clone(), photo_store.clone(), registry);

        let compat = migrations.check_schema_compatibility().await?;
        if !compat.compatible {
            return Err(AppError::SchemaCompatibility(format!(
                "data has schema version {} but this build supports at most {}",
                compat.persisted_schema_version, compat.supported_schema_version
            )));
        }

        let report = migrations.run_migrations(false).await?;
        if !report.success {
            let failed: Vec<&str> = report.errors.iter().map(|e| e.id.as_str()).collect();
            return Err(AppError::MigrationFailed(format!(
                "startup migration run failed: {}",
                failed.join(", ")
            )));
        }
        if !report.applied_migrations.is_empty() {
            tracing::info!(
                "Startup migrations applied: {:?}",
                report.applied_migrations
            );
        }

        let app = Self {
            records: RecordsService::new(repo.clone()),
            photos: PhotosService::new(repo.clone(), photo_store),
            stats: StatsService::new(repo),
            migrations,
        };

        tracing::info!("Application initialized successfully");
        Ok(app)
    }
}
