//! Database layer for NameHub
//!
//! Provides:
//! - SeaORM entity models
//! - Repository (the query layer)
//! - Connection pool management and schema bootstrap

pub mod models;
mod repository;

pub use repository::{
    CategoryInput, CollectionInput, CollectionPatch, CollectionSummary,
    DashboardStats, EntityRef, GroupNameFilter, GroupNameListItem, GroupNamePatch,
    NewGroupName, Page, PageRequest, Repository, MAX_PAGE, MAX_PAGE_SIZE, utc_day_bounds,
};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use models::{CategoryEntity, CollectionEntity, GroupNameColumn, GroupNameEntity, UserEntity};
use sea_orm::{
    sea_query::Index, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema,
};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
///
/// Owned by the process entry point and handed to [`Repository`]; nothing
/// in the crate holds a global handle.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e)
            })?;

        let pool = Self { conn };

        if config.bootstrap_schema {
            pool.bootstrap_schema().await?;
        }

        info!("Database connection established");
        Ok(pool)
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }

    /// Create any missing tables from the entity definitions.
    ///
    /// Tables are created parents first so the foreign keys resolve.
    pub async fn bootstrap_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let tables = [
            schema.create_table_from_entity(UserEntity).if_not_exists().to_owned(),
            schema.create_table_from_entity(CategoryEntity).if_not_exists().to_owned(),
            schema.create_table_from_entity(CollectionEntity).if_not_exists().to_owned(),
            schema.create_table_from_entity(GroupNameEntity).if_not_exists().to_owned(),
        ];

        for table in &tables {
            self.conn.execute(backend.build(table)).await?;
        }

        let status_index = Index::create()
            .if_not_exists()
            .name("idx_group_names_status")
            .table(GroupNameEntity)
            .col(GroupNameColumn::Status)
            .to_owned();
        self.conn.execute(backend.build(&status_index)).await?;

        info!("Schema bootstrap complete");
        Ok(())
    }
}
