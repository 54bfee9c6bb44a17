//! Database configuration module for the promotions service.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema (including the UNIQUE constraint on promotion names) always matches the
//! Rust structs without hand-written SQL.

use crate::entities::Promotion;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Used when `DATABASE_URL` is not set. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/promotions.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(database_url)?;
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Path of the database file behind a `sqlite:` URL; `None` for in-memory or other backends.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.starts_with(":memory:") {
        None
    } else {
        Some(Path::new(file))
    }
}

/// `mode=rwc` creates the database file but not its directory.
fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    if let Some(parent) = sqlite_file_path(database_url)
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty() && !dir.exists())
    {
        info!("Creating database directory {}", parent.display());
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Creates the `promotions` table from its entity definition if it does not exist yet.
#[instrument(skip(db))]
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut promotion_table = schema.create_table_from_entity(Promotion);
    promotion_table.if_not_exists();

    db.execute(builder.build(&promotion_table)).await?;
    info!("Database tables ensured.");

    Ok(())
}
