use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::models::{Book, BookPatch};
use crate::services::book_service;

#[derive(Debug, Deserialize)]
pub struct BatchWriteRequest {
    pub ids: Vec<i32>,
    pub values: BookPatch,
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(filter): Query<BookFilter>,
) -> Response {
    match book_service::list_books(state.book_repo.as_ref(), filter).await {
        Ok(books) => Json(json!({
            "total": books.len(),
            "books": books,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created"),
        (status = 422, description = "Invalid title or negative price")
    )
)]
pub async fn create_book(State(state): State<AppState>, Json(book): Json<Book>) -> Response {
    match book_service::create_book(state.book_repo.as_ref(), book).await {
        Ok(book) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Book created successfully",
                "book": book
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match book_service::get_book(state.book_repo.as_ref(), id).await {
        Ok(book) => Json(json!({ "book": book })).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book updated"),
        (status = 404, description = "No such book"),
        (status = 422, description = "Invalid title or negative price")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<BookPatch>,
) -> Response {
    match book_service::update_book(state.book_repo.as_ref(), id, patch).await {
        Ok(book) => Json(json!({
            "message": "Book updated successfully",
            "book": book
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted (or already absent)")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match book_service::delete_book(state.book_repo.as_ref(), id).await {
        Ok(()) => Json(json!({ "message": "Book deleted successfully" })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn batch_write(
    State(state): State<AppState>,
    Json(payload): Json<BatchWriteRequest>,
) -> Response {
    match book_service::write_books(state.book_repo.as_ref(), &payload.ids, payload.values).await
    {
        Ok(books) => Json(json!({
            "total": books.len(),
            "books": books,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}
