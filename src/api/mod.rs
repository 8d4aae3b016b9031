pub mod actions;
pub mod books;
pub mod health;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/batch", post(books::batch_write))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Actions
        .route(
            "/books/actions/category-report",
            post(actions::category_report),
        )
        .route(
            "/books/actions/fetch-metadata",
            post(actions::fetch_metadata),
        )
        .with_state(state)
}

/// Map a domain error onto an HTTP status with a `{ "error": ... }` body
pub(crate) fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Database(_) => {
            tracing::error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match e {
        DomainError::NotFound => "Book not found".to_string(),
        DomainError::Validation(msg) => msg,
        other => other.to_string(),
    };

    (status, Json(json!({ "error": message }))).into_response()
}
