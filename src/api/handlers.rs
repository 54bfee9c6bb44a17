//! HTTP handlers for `/promotions`.
//!
//! Handlers check request parameters, run the business-rule pass on bodies, then call
//! into [`crate::core::promotion`]. Errors become responses through
//! [`IntoResponse`](axum::response::IntoResponse) on [`Error`].

use super::{
    ApiState,
    params::{PageParams, SearchParams},
};
use crate::{
    core::{
        pagination::Page,
        promotion::{self, PromotionSort},
        validation,
    },
    entities::{PromotionModel, PromotionStatus, promotion::UnknownStatus},
    errors::{Error, Result},
    models::PromotionInput,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// GET /promotions
pub async fn list_promotions(State(state): State<ApiState>) -> Result<Json<Vec<PromotionModel>>> {
    promotion::get_all_promotions(&*state.database).await.map(Json)
}

/// GET /promotions/{id}
pub async fn get_promotion(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<PromotionModel>> {
    let id = validation::validate_id(id)?;
    promotion::get_promotion_by_id(&*state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::PromotionNotFound { id })
}

/// GET /promotions/status/{status}
pub async fn list_by_status(
    State(state): State<ApiState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<PromotionModel>>> {
    let status = parse_status(&status)?;
    promotion::get_promotions_by_status(&*state.database, status)
        .await
        .map(Json)
}

/// GET /promotions/status/{status}/paginated
pub async fn list_by_status_paginated(
    State(state): State<ApiState>,
    Path(status): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PromotionModel>>> {
    let status = parse_status(&status)?;
    let request = validation::validate_page_request(params.page, params.size)?;
    promotion::get_promotions_by_status_page(&*state.database, status, request)
        .await
        .map(Json)
}

/// GET /promotions/active
pub async fn list_active(State(state): State<ApiState>) -> Result<Json<Vec<PromotionModel>>> {
    promotion::get_active_promotions(&*state.database)
        .await
        .map(Json)
}

/// GET /promotions/expiring-soon
pub async fn list_expiring_soon(
    State(state): State<ApiState>,
) -> Result<Json<Vec<PromotionModel>>> {
    promotion::get_promotions_expiring_soon(&*state.database)
        .await
        .map(Json)
}

/// GET /promotions/sorted/{name|start-date|end-date}
pub async fn list_sorted(
    State(state): State<ApiState>,
    Path(field): Path<String>,
) -> Result<Json<Vec<PromotionModel>>> {
    let sort: PromotionSort = field.parse()?;
    promotion::get_promotions_sorted(&*state.database, sort)
        .await
        .map(Json)
}

/// GET /promotions/paginated
pub async fn list_paginated(
    State(state): State<ApiState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PromotionModel>>> {
    let request = validation::validate_page_request(params.page, params.size)?;
    promotion::get_promotions_page(&*state.database, request)
        .await
        .map(Json)
}

/// GET /promotions/search
pub async fn search(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PromotionModel>>> {
    let keyword = validation::validate_keyword(params.keyword.as_deref().unwrap_or_default())?;
    promotion::search_promotions(&*state.database, &keyword)
        .await
        .map(Json)
}

/// GET /promotions/search/paginated
pub async fn search_paginated(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<PromotionModel>>> {
    let keyword = validation::validate_keyword(params.keyword.as_deref().unwrap_or_default())?;
    let request = validation::validate_page_request(params.page, params.size)?;
    promotion::search_promotions_page(&*state.database, &keyword, request)
        .await
        .map(Json)
}

/// POST /promotions
pub async fn create_promotion(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PromotionModel>)> {
    let input = checked_body(&body)?;
    let created = promotion::create_promotion(&*state.database, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /promotions/{id}
///
/// A missing id is reported as 400, not 404.
pub async fn update_promotion(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<PromotionModel>> {
    let id = validation::validate_id(id)?;
    let input = checked_body(&body)?;
    match promotion::update_promotion(&*state.database, id, &input).await {
        Ok(updated) => Ok(Json(updated)),
        Err(e @ Error::PromotionNotFound { .. }) => Err(Error::validation(e.to_string())),
        Err(e) => Err(e),
    }
}

/// DELETE /promotions/{id}
pub async fn delete_promotion(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<&'static str> {
    let id = validation::validate_id(id)?;
    if promotion::delete_promotion(&*state.database, id).await? {
        Ok("Promotion deleted successfully")
    } else {
        Err(Error::PromotionNotFound { id })
    }
}

fn parse_status(raw: &str) -> Result<PromotionStatus> {
    raw.parse()
        .map_err(|e: UnknownStatus| Error::validation(e.to_string()))
}

/// Parses a request body and runs the boundary checks: present, then business rules.
fn checked_body(body: &[u8]) -> Result<PromotionInput> {
    let input = validation::require_promotion(parse_body(body)?)?;
    validation::check_business_rules(&input, promotion::current_date())?;
    Ok(input)
}

/// An empty body or a JSON `null` is an absent record, not a parse error.
fn parse_body(body: &[u8]) -> Result<Option<PromotionInput>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map_err(|e| Error::validation(format!("Malformed promotion data: {e}")))
}
