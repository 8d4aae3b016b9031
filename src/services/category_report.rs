//! Books-per-category report

use crate::domain::{BookFilter, BookRepository, CategoryCount, DomainError};
use crate::models::Notification;

pub const REPORT_TITLE: &str = "Books per Category";

/// One `"<category> : <count> books"` line per category, each newline-terminated.
pub fn format_report(counts: &[CategoryCount]) -> String {
    counts
        .iter()
        .map(|c| format!("{} : {} books\n", c.category.key(), c.count))
        .collect()
}

/// Count books per category over the (optionally filtered) collection and
/// wrap the result in a transient notification.
pub async fn count_books_by_category(
    repo: &dyn BookRepository,
    filter: BookFilter,
) -> Result<Notification, DomainError> {
    let counts = repo.count_by_category(filter).await?;
    tracing::info!("Category report over {} categories", counts.len());
    Ok(Notification::transient(REPORT_TITLE, format_report(&counts)))
}
