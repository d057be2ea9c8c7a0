//! Database layer for flashpoll.
//!
//! - [`DbGateway`]: the process-wide, lazily connected database handle
//! - [`entities`]: the `poll` table and its embedded value objects
//! - [`repositories`]: single-statement storage operations
//! - [`migrations`]: schema setup

pub mod entities;
pub mod gateway;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

pub use gateway::DbGateway;

use flashpoll_common::AppError;
use sea_orm::DatabaseConnection;

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
