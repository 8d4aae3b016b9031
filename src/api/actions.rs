use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::services;

#[derive(Debug, Deserialize)]
pub struct FetchMetadataRequest {
    pub ids: Vec<i32>,
}

/// The filter may come from the query string, a JSON body, or both; body
/// criteria override query criteria.
#[utoipa::path(
    post,
    path = "/api/books/actions/category-report",
    params(BookFilter),
    request_body(
        content = Option<BookFilter>,
        description = "Optional filter; keys set here override the query string"
    ),
    responses(
        (status = 200, description = "Books per category", body = crate::models::Notification),
        (status = 400, description = "Malformed filter body")
    )
)]
pub async fn category_report(
    State(state): State<AppState>,
    Query(query): Query<BookFilter>,
    body: Bytes,
) -> Response {
    let filter = if body.iter().all(u8::is_ascii_whitespace) {
        query
    } else {
        match serde_json::from_slice::<BookFilter>(&body) {
            Ok(from_body) => query.merged(from_body),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Invalid filter body: {}", e) })),
                )
                    .into_response();
            }
        }
    };

    match services::count_books_by_category(state.book_repo.as_ref(), filter).await {
        Ok(notification) => Json(notification).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/books/actions/fetch-metadata",
    responses(
        (status = 200, description = "One outcome line per book", body = crate::models::Notification),
        (status = 404, description = "A selected book does not exist")
    )
)]
pub async fn fetch_metadata(
    State(state): State<AppState>,
    Json(payload): Json<FetchMetadataRequest>,
) -> Response {
    match services::fetch_metadata_for_ids(
        state.book_repo.as_ref(),
        state.catalog.as_ref(),
        &payload.ids,
    )
    .await
    {
        Ok(notification) => Json(notification).into_response(),
        Err(e) => error_response(e),
    }
}
