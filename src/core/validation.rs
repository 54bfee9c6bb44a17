//! Validation rules for promotions and for the parameters the HTTP layer accepts.
//!
//! [`validate_promotion`] runs the field checks in a fixed order and stops at the
//! first failure. [`check_business_rules`] is a separate pass the API runs before
//! handing a record to the service. Both re-check that the end date is not before
//! the start date.

use crate::{
    core::pagination::{MAX_PAGE_SIZE, PageRequest},
    errors::{Error, Result},
    models::{PromotionDraft, PromotionInput},
};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

/// Minimum promotion name length, counted after trimming.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum promotion name length.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum description length.
pub const DESCRIPTION_MAX_CHARS: usize = 255;
/// Minimum search keyword length, counted after trimming.
pub const KEYWORD_MIN_CHARS: usize = 2;
/// Maximum search keyword length.
pub const KEYWORD_MAX_CHARS: usize = 100;

const MAX_DURATION: Months = Months::new(12);
const MAX_LEAD_TIME: Months = Months::new(24);
const DISCOUNT_SCALE: u32 = 2;
const UNSAFE_FRAGMENTS: [&str; 3] = ["<", ">", "script"];

/// `true` if `value` contains `<`, `>` or `script`.
#[must_use]
pub fn contains_unsafe_text(value: &str) -> bool {
    UNSAFE_FRAGMENTS.iter().any(|fragment| value.contains(fragment))
}

/// First check of the ordered list: the record itself must be present.
pub fn require_promotion(input: Option<PromotionInput>) -> Result<PromotionInput> {
    input.ok_or_else(|| Error::validation("Promotion data must not be empty"))
}

/// Runs the ordered field checks and returns the validated draft.
///
/// Order: name present and non-blank, name length, discount present and in
/// range, start date, end date, end not before start, status, description length.
pub fn validate_promotion(input: &PromotionInput) -> Result<PromotionDraft> {
    let name = match input.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(Error::validation("Promotion name must not be blank")),
    };
    if name.trim().chars().count() < NAME_MIN_CHARS {
        return Err(Error::validation(format!(
            "Promotion name must be at least {NAME_MIN_CHARS} characters"
        )));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(Error::validation(format!(
            "Promotion name must not exceed {NAME_MAX_CHARS} characters"
        )));
    }

    let discount_percent = input
        .discount_percent
        .ok_or_else(|| Error::validation("Discount percent must not be empty"))?;
    if discount_percent <= Decimal::ZERO {
        return Err(Error::validation("Discount percent must be greater than 0"));
    }
    if discount_percent > Decimal::ONE_HUNDRED {
        return Err(Error::validation("Discount percent must not exceed 100%"));
    }
    if discount_percent.normalize().scale() > DISCOUNT_SCALE {
        return Err(Error::validation(
            "Discount percent must have at most two decimal places",
        ));
    }

    let start_date = input
        .start_date
        .ok_or_else(|| Error::validation("Start date must not be empty"))?;
    let end_date = input
        .end_date
        .ok_or_else(|| Error::validation("End date must not be empty"))?;
    if end_date < start_date {
        return Err(Error::validation("End date must not be before start date"));
    }

    let status = input
        .status
        .ok_or_else(|| Error::validation("Status must not be empty"))?;

    if let Some(description) = input.description.as_deref() {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(Error::validation(format!(
                "Description must not exceed {DESCRIPTION_MAX_CHARS} characters"
            )));
        }
    }

    Ok(PromotionDraft {
        name: name.to_string(),
        discount_percent,
        start_date,
        end_date,
        description: input.description.clone(),
        status,
    })
}

/// Business rules checked at the API boundary before the service sees the record.
///
/// Fields that are absent are skipped here; [`validate_promotion`] reports them.
pub fn check_business_rules(input: &PromotionInput, today: NaiveDate) -> Result<()> {
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(Error::validation("End date must not be before start date"));
        }
        // Month arithmetic clamps Feb 29 to Feb 28 in non-leap years.
        if start.checked_add_months(MAX_DURATION).is_some_and(|max_end| end > max_end) {
            return Err(Error::validation(
                "A promotion must not run for longer than one year",
            ));
        }
    }

    if let Some(start) = input.start_date {
        if today
            .checked_add_months(MAX_LEAD_TIME)
            .is_some_and(|max_start| start > max_start)
        {
            return Err(Error::validation(
                "A promotion must not start more than two years from today",
            ));
        }
    }

    if input.name.as_deref().is_some_and(contains_unsafe_text) {
        return Err(Error::validation(
            "Promotion name contains characters that are not allowed",
        ));
    }

    Ok(())
}

/// Checks a search keyword and returns it trimmed.
pub fn validate_keyword(keyword: &str) -> Result<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Search keyword must not be empty"));
    }
    if trimmed.chars().count() < KEYWORD_MIN_CHARS {
        return Err(Error::validation(format!(
            "Search keyword must be at least {KEYWORD_MIN_CHARS} characters"
        )));
    }
    if keyword.chars().count() > KEYWORD_MAX_CHARS {
        return Err(Error::validation(format!(
            "Search keyword must not exceed {KEYWORD_MAX_CHARS} characters"
        )));
    }
    if contains_unsafe_text(keyword) {
        return Err(Error::validation(
            "Search keyword contains characters that are not allowed",
        ));
    }
    Ok(trimmed.to_string())
}

/// Checks `page >= 0` and `1 <= size <= 100`.
pub fn validate_page_request(page: i64, size: i64) -> Result<PageRequest> {
    let page = u64::try_from(page).map_err(|_| Error::validation("Page number must be >= 0"))?;
    let size = u64::try_from(size)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| Error::validation("Page size must be > 0"))?;
    if size > MAX_PAGE_SIZE {
        return Err(Error::validation(format!(
            "Page size must not exceed {MAX_PAGE_SIZE}"
        )));
    }
    Ok(PageRequest { page, size })
}

/// Promotion ids are positive.
pub fn validate_id(id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(Error::validation("Invalid promotion id"));
    }
    Ok(id)
}
