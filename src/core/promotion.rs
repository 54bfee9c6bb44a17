//! Promotion business logic - Queries and mutations over the `promotions` table.
//!
//! Every function takes any SeaORM [`ConnectionTrait`], so the same code runs against a
//! pooled connection, a transaction, or an in-memory `SQLite` database in tests. Listing
//! functions return rows in ascending id order unless they say otherwise.

use crate::{
    core::{
        pagination::{Page, PageRequest},
        validation::validate_promotion,
    },
    entities::{Promotion, PromotionStatus, promotion},
    errors::{Error, Result},
    models::{PromotionDraft, PromotionInput},
};
use chrono::{Days, NaiveDate};
use sea_orm::{
    Condition, PaginatorTrait, QueryOrder, Select, Set, SqlErr,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

const LIKE_ESCAPE: char = '!';

/// Columns a promotion list can be sorted by, always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionSort {
    /// Lexical order of `name`
    Name,
    /// Chronological order of `start_date`
    StartDate,
    /// Chronological order of `end_date`
    EndDate,
}

impl FromStr for PromotionSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "start-date" => Ok(Self::StartDate),
            "end-date" => Ok(Self::EndDate),
            other => Err(Error::validation(format!("Unsupported sort field '{other}'"))),
        }
    }
}

/// The server's current calendar date, used for the derived date filters.
#[must_use]
pub fn current_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Retrieves every promotion.
pub async fn get_all_promotions<C>(db: &C) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    Promotion::find()
        .order_by_asc(promotion::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a promotion by id, returning None if it does not exist.
pub async fn get_promotion_by_id<C>(db: &C, id: i64) -> Result<Option<promotion::Model>>
where
    C: ConnectionTrait,
{
    Promotion::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Retrieves the promotions carrying exactly `status`.
pub async fn get_promotions_by_status<C>(
    db: &C,
    status: PromotionStatus,
) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    by_status(status).all(db).await.map_err(Into::into)
}

/// Retrieves the promotions that are active today.
pub async fn get_active_promotions<C>(db: &C) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    get_active_promotions_on(db, current_date()).await
}

/// Retrieves the promotions that are ACTIVE and whose window contains `today`.
///
/// Matches [`promotion::Model::is_active`].
pub async fn get_active_promotions_on<C>(db: &C, today: NaiveDate) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    by_status(PromotionStatus::Active)
        .filter(promotion::Column::StartDate.lte(today))
        .filter(promotion::Column::EndDate.gte(today))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the promotions expiring within the next week, counted from today.
pub async fn get_promotions_expiring_soon<C>(db: &C) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    get_promotions_expiring_soon_on(db, current_date()).await
}

/// Retrieves the ACTIVE promotions with `today < end_date < today + 7 days`.
///
/// Matches [`promotion::Model::is_expiring_soon`].
pub async fn get_promotions_expiring_soon_on<C>(
    db: &C,
    today: NaiveDate,
) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    let Some(horizon) =
        today.checked_add_days(Days::new(promotion::EXPIRING_SOON_WINDOW_DAYS))
    else {
        return Ok(Vec::new());
    };
    by_status(PromotionStatus::Active)
        .filter(promotion::Column::EndDate.gt(today))
        .filter(promotion::Column::EndDate.lt(horizon))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every promotion sorted ascending by `sort`; ties keep id order.
pub async fn get_promotions_sorted<C>(db: &C, sort: PromotionSort) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    let column = match sort {
        PromotionSort::Name => promotion::Column::Name,
        PromotionSort::StartDate => promotion::Column::StartDate,
        PromotionSort::EndDate => promotion::Column::EndDate,
    };
    Promotion::find()
        .order_by_asc(column)
        .order_by_asc(promotion::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one page of all promotions.
pub async fn get_promotions_page<C>(db: &C, request: PageRequest) -> Result<Page<promotion::Model>>
where
    C: ConnectionTrait,
{
    fetch_page(db, Promotion::find().order_by_asc(promotion::Column::Id), request).await
}

/// Retrieves one page of the promotions carrying `status`.
pub async fn get_promotions_by_status_page<C>(
    db: &C,
    status: PromotionStatus,
    request: PageRequest,
) -> Result<Page<promotion::Model>>
where
    C: ConnectionTrait,
{
    fetch_page(db, by_status(status), request).await
}

/// Case-insensitive substring search over name and description.
///
/// `keyword` is expected to be validated and trimmed already.
pub async fn search_promotions<C>(db: &C, keyword: &str) -> Result<Vec<promotion::Model>>
where
    C: ConnectionTrait,
{
    let results = search_query(keyword).all(db).await?;
    debug!("Search for '{}' matched {} promotions", keyword, results.len());
    Ok(results)
}

/// Paginated form of [`search_promotions`].
pub async fn search_promotions_page<C>(
    db: &C,
    keyword: &str,
    request: PageRequest,
) -> Result<Page<promotion::Model>>
where
    C: ConnectionTrait,
{
    fetch_page(db, search_query(keyword), request).await
}

/// Whether any promotion other than `exclude_id` already uses exactly `name`.
pub async fn name_exists<C>(db: &C, name: &str, exclude_id: Option<i64>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let mut query = Promotion::find().filter(promotion::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(promotion::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Creates a new promotion after validating it and checking the name is free.
///
/// # Errors
/// Returns an error if:
/// - A field breaks a validation rule (`Error::Validation`)
/// - Another promotion already has this name (`Error::DuplicateName`)
/// - The database insert fails
#[instrument(skip(db, input), fields(name = ?input.name))]
pub async fn create_promotion<C>(db: &C, input: &PromotionInput) -> Result<promotion::Model>
where
    C: ConnectionTrait,
{
    let draft = validate_promotion(input)?;

    if name_exists(db, &draft.name, None).await? {
        return Err(Error::DuplicateName { name: draft.name });
    }

    let name = draft.name.clone();
    let created = draft_to_active_model(draft)
        .insert(db)
        .await
        .map_err(|e| map_unique_violation(e, &name))?;
    info!("Created promotion '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Replaces every field of an existing promotion except its id.
///
/// # Errors
/// Returns an error if:
/// - No promotion has this id (`Error::PromotionNotFound`)
/// - A field breaks a validation rule (`Error::Validation`)
/// - Another promotion already has the new name (`Error::DuplicateName`)
/// - The database update fails
#[instrument(skip(db, input), fields(name = ?input.name))]
pub async fn update_promotion<C>(
    db: &C,
    id: i64,
    input: &PromotionInput,
) -> Result<promotion::Model>
where
    C: ConnectionTrait,
{
    let existing = Promotion::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::PromotionNotFound { id })?;

    let draft = validate_promotion(input)?;

    if name_exists(db, &draft.name, Some(id)).await? {
        return Err(Error::DuplicateName { name: draft.name });
    }

    let name = draft.name.clone();
    let mut promotion: promotion::ActiveModel = existing.into();
    promotion.name_folded = Set(fold_case(&draft.name));
    promotion.description_folded = Set(draft.description.as_deref().map(fold_case));
    promotion.name = Set(draft.name);
    promotion.discount_percent = Set(draft.discount_percent);
    promotion.start_date = Set(draft.start_date);
    promotion.end_date = Set(draft.end_date);
    promotion.description = Set(draft.description);
    promotion.status = Set(draft.status);

    let updated = promotion
        .update(db)
        .await
        .map_err(|e| map_unique_violation(e, &name))?;
    info!("Updated promotion {} ('{}')", updated.id, updated.name);
    Ok(updated)
}

/// Hard-deletes a promotion. Returns `false` if there was nothing to delete.
#[instrument(skip(db))]
pub async fn delete_promotion<C>(db: &C, id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Promotion::delete_by_id(id).exec(db).await?;
    info!(
        "Attempted to delete promotion {}, rows affected: {}",
        id, result.rows_affected
    );
    Ok(result.rows_affected > 0)
}

/// Creates each seed promotion whose name is not taken yet.
///
/// Seeds that fail validation are logged and skipped. Returns how many were created.
#[instrument(skip_all, fields(count = seeds.len()))]
pub async fn seed_promotions<C>(db: &C, seeds: &[PromotionInput]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for seed in seeds {
        let Some(name) = seed.name.as_deref() else {
            warn!("Skipping seed promotion without a name");
            continue;
        };
        if name_exists(db, name, None).await? {
            debug!("Seed promotion '{}' already exists, skipping", name);
            continue;
        }
        match create_promotion(db, seed).await {
            Ok(_) => created += 1,
            Err(Error::Validation { message }) => {
                warn!("Skipping invalid seed promotion '{}': {}", name, message);
            }
            Err(e) => return Err(e),
        }
    }
    info!("Seeded {} promotions", created);
    Ok(created)
}

fn by_status(status: PromotionStatus) -> Select<Promotion> {
    Promotion::find()
        .filter(promotion::Column::Status.eq(status))
        .order_by_asc(promotion::Column::Id)
}

/// Lower-cases with full Unicode rules. Search compares folded text on both sides
/// because SQLite's `LOWER()` only folds ASCII.
fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

fn search_query(keyword: &str) -> Select<Promotion> {
    let pattern = format!("%{}%", escape_like(&fold_case(keyword)));
    Promotion::find()
        .filter(
            Condition::any()
                .add(
                    Expr::col(promotion::Column::NameFolded)
                        .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                )
                .add(
                    Expr::col(promotion::Column::DescriptionFolded)
                        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                ),
        )
        .order_by_asc(promotion::Column::Id)
}

/// Escapes LIKE wildcards so the keyword matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

async fn fetch_page<C>(
    db: &C,
    query: Select<Promotion>,
    request: PageRequest,
) -> Result<Page<promotion::Model>>
where
    C: ConnectionTrait,
{
    let paginator = query.paginate(db, request.size());
    let total = paginator.num_items().await?;
    // Pages at or past the end, including offsets that overflow u64, are empty
    let in_range = request
        .page()
        .checked_mul(request.size())
        .is_some_and(|offset| offset < total);
    let content = if in_range {
        paginator.fetch_page(request.page()).await?
    } else {
        Vec::new()
    };
    Ok(Page::new(content, request, total))
}

fn draft_to_active_model(draft: PromotionDraft) -> promotion::ActiveModel {
    promotion::ActiveModel {
        name_folded: Set(fold_case(&draft.name)),
        description_folded: Set(draft.description.as_deref().map(fold_case)),
        name: Set(draft.name),
        discount_percent: Set(draft.discount_percent),
        start_date: Set(draft.start_date),
        end_date: Set(draft.end_date),
        description: Set(draft.description),
        status: Set(draft.status),
        ..Default::default()
    }
}

/// The storage unique index on `name` backs up the check-then-insert above when two
/// writers race for the same name.
fn map_unique_violation(err: DbErr, name: &str) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::DuplicateName {
            name: name.to_string(),
        }
    } else {
        Error::Database(err)
    }
}
