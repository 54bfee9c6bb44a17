//! Promotion entity - A discount campaign with a validity window and a status.
//!
//! The `status` column is caller-supplied and never transitions on its own. Whether a
//! promotion is currently running is derived from the status plus the date window, see
//! [`Model::is_active`] and [`Model::is_expiring_soon`].

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How far ahead (in days) a promotion's end date counts as "expiring soon".
pub const EXPIRING_SOON_WINDOW_DAYS: u64 = 7;

/// Lifecycle label attached to a promotion.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionStatus {
    /// Running
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Switched off
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    /// Finished
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    /// Scheduled
    #[sea_orm(string_value = "UPCOMING")]
    Upcoming,
}

impl PromotionStatus {
    /// The token used in storage, JSON and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Expired => "EXPIRED",
            Self::Upcoming => "UPCOMING",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status token is not one of the four known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown promotion status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PromotionStatus {
    type Err = UnknownStatus;

    /// Parses a status token, ignoring ASCII case (`active` == `ACTIVE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "EXPIRED" => Ok(Self::Expired),
            "UPCOMING" => Ok(Self::Upcoming),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Promotion database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier assigned by storage on insert, never changed afterwards
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across all promotions (exact, case-sensitive)
    #[sea_orm(unique)]
    pub name: String,
    /// Discount in percent, in (0, 100] with two decimal places
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percent: Decimal,
    /// First day the promotion applies
    pub start_date: NaiveDate,
    /// Last day the promotion applies, never before `start_date`
    pub end_date: NaiveDate,
    /// Optional free text, at most 255 characters
    pub description: Option<String>,
    /// Caller-supplied lifecycle label
    pub status: PromotionStatus,
    /// `name` lower-cased in Rust, matched by search
    #[serde(skip)]
    pub name_folded: String,
    /// `description` lower-cased in Rust, matched by search
    #[serde(skip)]
    pub description_folded: Option<String>,
}

impl Model {
    /// `true` when the promotion is ACTIVE and `today` falls inside its date window.
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status == PromotionStatus::Active && self.start_date <= today && today <= self.end_date
    }

    /// `true` when the promotion is ACTIVE and ends strictly after `today` but strictly
    /// before `today + 7 days`.
    #[must_use]
    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        let Some(horizon) = today.checked_add_days(Days::new(EXPIRING_SOON_WINDOW_DAYS)) else {
            return false;
        };
        self.status == PromotionStatus::Active && today < self.end_date && self.end_date < horizon
    }
}

/// Promotions stand alone; no relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
