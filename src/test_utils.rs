//! Shared test utilities for the promotions service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test promotions with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::promotion,
    entities::{self, PromotionStatus},
    errors::Result,
    models::PromotionInput,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds a complete, valid promotion input.
///
/// # Defaults
/// * `discount_percent`: 15.5
/// * `description`: "Test promotion"
/// * `status`: ACTIVE
pub fn promotion_input(name: &str, start_date: NaiveDate, end_date: NaiveDate) -> PromotionInput {
    PromotionInput {
        name: Some(name.to_string()),
        discount_percent: Some(Decimal::new(155, 1)),
        start_date: Some(start_date),
        end_date: Some(end_date),
        description: Some("Test promotion".to_string()),
        status: Some(PromotionStatus::Active),
    }
}

/// Creates a test promotion running through the first half of 2024.
pub async fn create_test_promotion(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::promotion::Model> {
    let input = promotion_input(name, date(2024, 1, 1), date(2024, 6, 1));
    promotion::create_promotion(db, &input).await
}

/// Creates a test promotion with a custom status and date window.
pub async fn create_custom_promotion(
    db: &DatabaseConnection,
    name: &str,
    status: PromotionStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<entities::promotion::Model> {
    let mut input = promotion_input(name, start_date, end_date);
    input.status = Some(status);
    promotion::create_promotion(db, &input).await
}
