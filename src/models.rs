//! Request-side transfer records for promotions.
//!
//! [`PromotionInput`] is what a client sends: every field may be missing, so the
//! validator can report exactly which one. [`PromotionDraft`] is what validation
//! hands back, with every required field present.

use crate::entities::PromotionStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A promotion as submitted for create or update. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionInput {
    /// Display name, unique across promotions
    pub name: Option<String>,
    /// Percentage off, in (0, 100] with at most two decimals
    pub discount_percent: Option<Decimal>,
    /// First day the promotion applies
    pub start_date: Option<NaiveDate>,
    /// Last day the promotion applies
    pub end_date: Option<NaiveDate>,
    /// Free-form text, optional
    pub description: Option<String>,
    /// Lifecycle status
    pub status: Option<PromotionStatus>,
}

/// A promotion that passed validation and is ready to be written.
/// Fields mirror [`PromotionInput`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDraft {
    pub name: String,
    pub discount_percent: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub status: PromotionStatus,
}
