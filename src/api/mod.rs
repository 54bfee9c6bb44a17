//! HTTP layer - axum router, shared state and handlers for the promotions resource.

/// Endpoint handlers
pub mod handlers;
/// Query-string parameter types
pub mod params;
/// Error to HTTP response mapping
pub mod response;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared data available to every handler.
#[derive(Clone)]
pub struct ApiState {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
}

impl ApiState {
    /// Creates a new `ApiState` around the given database connection.
    #[must_use]
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database: Arc::new(database),
        }
    }
}

/// Builds the `/promotions` router.
///
/// Static segments (`/active`, `/paginated`, ...) take precedence over `/:id`.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/promotions",
            get(handlers::list_promotions).post(handlers::create_promotion),
        )
        .route("/promotions/active", get(handlers::list_active))
        .route("/promotions/expiring-soon", get(handlers::list_expiring_soon))
        .route("/promotions/paginated", get(handlers::list_paginated))
        .route("/promotions/search", get(handlers::search))
        .route("/promotions/search/paginated", get(handlers::search_paginated))
        .route("/promotions/sorted/:field", get(handlers::list_sorted))
        .route("/promotions/status/:status", get(handlers::list_by_status))
        .route(
            "/promotions/status/:status/paginated",
            get(handlers::list_by_status_paginated),
        )
        .route(
            "/promotions/:id",
            get(handlers::get_promotion)
                .put(handlers::update_promotion)
                .delete(handlers::delete_promotion),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::promotion::current_date, entities::PromotionStatus, errors::Result, test_utils::*,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use chrono::{Days, NaiveDate};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_app() -> Result<Router> {
        let db = setup_test_db().await?;
        Ok(router(ApiState::new(db)))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        send(app, Method::GET, uri, None).await
    }

    async fn post(app: &Router, body: Value) -> (StatusCode, String) {
        send(app, Method::POST, "/promotions", Some(body)).await
    }

    async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, String) {
        send(app, Method::PUT, uri, Some(body)).await
    }

    async fn delete(app: &Router, uri: &str) -> StatusCode {
        send(app, Method::DELETE, uri, None).await.0
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    fn promotion_json(name: &str, start: NaiveDate, end: NaiveDate) -> Value {
        json!({
            "name": name,
            "discountPercent": 20,
            "startDate": start.to_string(),
            "endDate": end.to_string(),
            "description": "Weekday colour treatments",
            "status": "ACTIVE",
        })
    }

    fn this_week(name: &str) -> Value {
        let today = current_date();
        promotion_json(name, today - Days::new(1), today + Days::new(3))
    }

    async fn create(app: &Router, name: &str) -> i64 {
        let (status, body) = post(app, this_week(name)).await;
        assert_eq!(status, StatusCode::CREATED);
        parse(&body)["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() -> Result<()> {
        let app = test_app().await?;

        let (status, body) = post(&app, this_week("Spring Sale")).await;
        assert_eq!(status, StatusCode::CREATED);
        let created = parse(&body);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "Spring Sale");
        assert_eq!(created["status"], "ACTIVE");

        let (status, body) = get(&app, &format!("/promotions/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), created);

        let (status, body) = get(&app, "/promotions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body).as_array().unwrap().len(), 1);

        let (status, _) = get(&app, "/promotions/active").await;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_and_invalid_id() -> Result<()> {
        let app = test_app().await?;
        assert_eq!(get(&app, "/promotions/999").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/promotions/0").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/promotions/abc").await.0, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejections() -> Result<()> {
        let app = test_app().await?;

        let (status, body) = send(&app, Method::POST, "/promotions", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("must not be empty"));

        let (status, body) = post(&app, this_week("<script>")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("not allowed"));

        let start = current_date();
        let far_end = start + Days::new(400);
        let (status, body) = post(&app, promotion_json("Long Sale", start, far_end)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("one year"));

        let mut missing_status = this_week("No Status");
        missing_status["status"] = Value::Null;
        let (status, body) = post(&app, missing_status).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Status"));

        create(&app, "Spring Sale").await;
        let (status, body) = post(&app, this_week("Spring Sale")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("already exists"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_flow() -> Result<()> {
        let app = test_app().await?;
        let id = create(&app, "Spring Sale").await;

        let mut replacement = this_week("Spring Sale");
        replacement["discountPercent"] = json!("35.25");
        let (status, body) = put(&app, &format!("/promotions/{id}"), replacement).await;
        assert_eq!(status, StatusCode::OK);
        let updated = parse(&body);
        assert_eq!(updated["id"], id);
        assert_eq!(updated["discountPercent"], json!(35.25));

        // Unknown id is folded into a client error
        let (status, body) = put(&app, "/promotions/999", this_week("Other")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("does not exist"));

        let (status, _) = put(&app, "/promotions/-1", this_week("Other")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_flow() -> Result<()> {
        let app = test_app().await?;
        let id = create(&app, "Spring Sale").await;

        let uri = format!("/promotions/{id}");
        assert_eq!(delete(&app, &uri).await, StatusCode::OK);
        assert_eq!(delete(&app, &uri).await, StatusCode::NOT_FOUND);
        assert_eq!(delete(&app, "/promotions/0").await, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_routes() -> Result<()> {
        let app = test_app().await?;
        create(&app, "Spring Sale").await;

        let (status, body) = get(&app, "/promotions/status/active").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body).as_array().unwrap().len(), 1);

        let (status, _) = get(&app, "/promotions/status/archived").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(&app, "/promotions/status/EXPIRED/paginated?page=0&size=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["totalElements"], 0);

        let (status, _) = get(&app, "/promotions/status/ACTIVE/paginated?size=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_pagination_routes() -> Result<()> {
        let db = setup_test_db().await?;
        for i in 0..12 {
            let name = format!("Promotion {i:02}");
            let (start, end) = (date(2024, 1, 1), date(2024, 2, 1));
            create_custom_promotion(&db, &name, PromotionStatus::Upcoming, start, end).await?;
        }
        let app = router(ApiState::new(db));

        let (status, body) = get(&app, "/promotions/paginated").await;
        assert_eq!(status, StatusCode::OK);
        let page = parse(&body);
        assert_eq!(page["content"].as_array().unwrap().len(), 10);
        assert_eq!(page["totalElements"], 12);
        assert_eq!(page["totalPages"], 2);

        let (_, body) = get(&app, "/promotions/paginated?page=5&size=10").await;
        assert!(parse(&body)["content"].as_array().unwrap().is_empty());

        // Largest accepted page number is still just an empty page
        let uri = format!("/promotions/paginated?page={}&size=100", i64::MAX);
        let (status, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        let page = parse(&body);
        assert!(page["content"].as_array().unwrap().is_empty());
        assert_eq!(page["totalElements"], 12);

        let rejected = ["page=-1", "size=0", "size=101"];
        for query in rejected {
            let (status, _) = get(&app, &format!("/promotions/paginated?{query}")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_search_routes() -> Result<()> {
        let app = test_app().await?;
        create(&app, "Spring Sale").await;
        create(&app, "Loyalty Week").await;

        let (status, body) = get(&app, "/promotions/search?keyword=sal").await;
        assert_eq!(status, StatusCode::OK);
        let found = parse(&body);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["name"], "Spring Sale");

        let (status, body) = get(&app, "/promotions/search?keyword=%3Cscript%3E").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("not allowed"));

        assert_eq!(get(&app, "/promotions/search?keyword=a").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/promotions/search").await.0, StatusCode::BAD_REQUEST);

        let uri = "/promotions/search/paginated?keyword=colour&page=0&size=1";
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        let page = parse(&body);
        assert_eq!(page["totalElements"], 2);
        assert_eq!(page["content"].as_array().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_non_ascii_keyword() -> Result<()> {
        let app = test_app().await?;
        create(&app, "ĐẶC BIỆT Sale").await;

        // keyword=đặc biệt, percent-encoded
        let uri = "/promotions/search?keyword=%C4%91%E1%BA%B7c%20bi%E1%BB%87t";
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        let found = parse(&body);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["name"], "ĐẶC BIỆT Sale");
        Ok(())
    }

    #[tokio::test]
    async fn test_sorted_routes() -> Result<()> {
        let app = test_app().await?;
        create(&app, "Zeta Sale").await;
        create(&app, "Alpha Sale").await;

        let (status, body) = get(&app, "/promotions/sorted/name").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)[0]["name"], "Alpha Sale");

        for field in ["start-date", "end-date"] {
            let (status, _) = get(&app, &format!("/promotions/sorted/{field}")).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, _) = get(&app, "/promotions/sorted/price").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_expiring_soon_route() -> Result<()> {
        let app = test_app().await?;
        let today = current_date();
        let start = today - Days::new(3);
        post(&app, promotion_json("Ends Soon", start, today + Days::new(2))).await;
        post(&app, promotion_json("Ends Later", start, today + Days::new(30))).await;

        let (status, body) = get(&app, "/promotions/expiring-soon").await;
        assert_eq!(status, StatusCode::OK);
        let found = parse(&body);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["name"], "Ends Soon");
        Ok(())
    }
}
