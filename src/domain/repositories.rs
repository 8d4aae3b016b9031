//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::DomainError;
use crate::models::book::{Book, BookPatch, Category};

/// Filter criteria for book queries
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    pub category: Option<Category>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// Combine two filters; criteria set in `other` take precedence.
    pub fn merged(self, other: BookFilter) -> BookFilter {
        BookFilter {
            category: other.category.or(self.category),
            title: other.title.or(self.title),
            author: other.author.or(self.author),
            isbn: other.isbn.or(self.isbn),
        }
    }
}

/// One row of the per-category count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter criteria, ordered by id
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Find the books with the given IDs. Missing IDs are skipped.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Book>, DomainError>;

    /// Create a new book
    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    /// Apply a partial update to an existing book
    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError>;

    /// Apply the same partial update to several books, all or nothing
    async fn update_many(&self, ids: &[i32], patch: BookPatch)
    -> Result<Vec<Book>, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Count books per category, skipping books without one
    async fn count_by_category(&self, filter: BookFilter)
    -> Result<Vec<CategoryCount>, DomainError>;
}
