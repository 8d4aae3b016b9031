//! Metadata enrichment from the OpenLibrary catalogue
//!
//! Each selected book is looked up by ISBN and its title, author and
//! publication year are overwritten with whatever the catalogue knows.
//! Failures are reported per book and never stop the batch.

use std::fmt;

use crate::domain::{BookRepository, DomainError};
use crate::models::{Book, BookPatch, Notification};
use crate::modules::integrations::openlibrary::{self, CatalogError, CatalogTransport, Edition};
use crate::services::book_service;

pub const NOTIFICATION_TITLE: &str = "OpenLibrary fetch";
pub const EMPTY_BATCH_MESSAGE: &str = "No records processed.";

/// What happened to one book during enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    MissingIsbn,
    NotFound(u16),
    NetworkError(String),
    FetchFailed(String),
    Updated(Vec<&'static str>),
    UpdateFailed(String),
    NoUsableData,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::MissingIsbn => write!(f, "missing ISBN."),
            Outcome::NotFound(code) => write!(f, "ISBN not found ({}).", code),
            Outcome::NetworkError(msg) => write!(f, "network error ({}).", msg),
            Outcome::FetchFailed(msg) => write!(f, "failed to fetch ({}).", msg),
            Outcome::Updated(fields) => write!(f, "updated ({}).", fields.join(", ")),
            Outcome::UpdateFailed(msg) => write!(f, "failed to update ({}).", msg),
            Outcome::NoUsableData => write!(f, "no usable data found."),
        }
    }
}

impl From<CatalogError> for Outcome {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Status(code) => Outcome::NotFound(code),
            CatalogError::Network(msg) => Outcome::NetworkError(msg),
            CatalogError::Fetch(msg) => Outcome::FetchFailed(msg),
        }
    }
}

/// Build the write for a fetched edition. Only title, author and
/// publication year are ever touched.
async fn edition_patch(catalog: &dyn CatalogTransport, edition: Edition) -> BookPatch {
    let names = openlibrary::resolve_author_names(catalog, &edition.authors).await;

    BookPatch {
        title: edition.title,
        author: (!names.is_empty()).then(|| Some(names.join(", "))),
        publication_year: edition.publication_year.map(Some),
        ..Default::default()
    }
}

/// Enrich a single book and report the outcome
pub async fn enrich_book(
    repo: &dyn BookRepository,
    catalog: &dyn CatalogTransport,
    book: &Book,
) -> Outcome {
    enrich(repo, catalog, book).await.0
}

/// Like `enrich_book`, also handing back the stored record after a write.
async fn enrich(
    repo: &dyn BookRepository,
    catalog: &dyn CatalogTransport,
    book: &Book,
) -> (Outcome, Option<Book>) {
    let Some(isbn) = book
        .isbn
        .as_deref()
        .map(str::trim)
        .filter(|isbn| !isbn.is_empty())
    else {
        return (Outcome::MissingIsbn, None);
    };

    let edition = match openlibrary::fetch_edition(catalog, isbn).await {
        Ok(edition) => edition,
        Err(e) => {
            tracing::warn!("Catalogue lookup failed for ISBN {}: {}", isbn, e);
            return (e.into(), None);
        }
    };

    let patch = edition_patch(catalog, edition).await;
    if patch.is_empty() {
        return (Outcome::NoUsableData, None);
    }

    let Some(id) = book.id else {
        return (
            Outcome::UpdateFailed("record has not been saved".to_string()),
            None,
        );
    };

    let fields = patch.field_names();
    match book_service::update_book(repo, id, patch).await {
        Ok(updated) => (Outcome::Updated(fields), Some(updated)),
        Err(e) => {
            tracing::warn!("Failed to store metadata for book {}: {}", id, e);
            (Outcome::UpdateFailed(e.to_string()), None)
        }
    }
}

/// Enrich every book in `books`, in order, and summarize the outcomes
pub async fn fetch_metadata(
    repo: &dyn BookRepository,
    catalog: &dyn CatalogTransport,
    books: &[Book],
) -> Notification {
    tracing::info!("Fetching catalogue metadata for {} books", books.len());

    let mut lines = Vec::with_capacity(books.len());
    for book in books {
        // Report under the stored name, so a fetched title shows up as-is
        let (outcome, updated) = enrich(repo, catalog, book).await;
        let name = updated.as_ref().unwrap_or(book).display_name();
        lines.push(format!("{}: {}", name, outcome));
    }

    let message = if lines.is_empty() {
        EMPTY_BATCH_MESSAGE.to_string()
    } else {
        lines.join("\n")
    };

    Notification::transient(NOTIFICATION_TITLE, message)
}

/// Load the selected books, keeping the caller's order, then enrich them.
/// Unknown IDs fail the whole call before anything is fetched.
pub async fn fetch_metadata_for_ids(
    repo: &dyn BookRepository,
    catalog: &dyn CatalogTransport,
    ids: &[i32],
) -> Result<Notification, DomainError> {
    let found = repo.find_by_ids(ids).await?;

    let mut selection = Vec::with_capacity(ids.len());
    for id in ids {
        if selection.iter().any(|b: &Book| b.id == Some(*id)) {
            continue;
        }
        let book = found
            .iter()
            .find(|b| b.id == Some(*id))
            .ok_or(DomainError::NotFound)?;
        selection.push(book.clone());
    }

    Ok(fetch_metadata(repo, catalog, &selection).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookFilter;
    use crate::infrastructure::SeaOrmBookRepository;
    use crate::infrastructure::db;
    use crate::modules::integrations::openlibrary::tests::FakeCatalog;
    use serde_json::json;

    async fn setup_repo() -> SeaOrmBookRepository {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        SeaOrmBookRepository::new(db)
    }

    async fn insert(repo: &SeaOrmBookRepository, title: &str, isbn: Option<&str>) -> Book {
        let mut book = Book::new(title);
        book.isbn = isbn.map(str::to_string);
        repo.create(book).await.unwrap()
    }

    #[tokio::test]
    async fn test_full_record_updates_three_fields() {
        let repo = setup_repo().await;
        let book = insert(&repo, "Placeholder", Some("9780441013593")).await;
        let catalog = FakeCatalog::default().with(
            "/isbn/9780441013593.json",
            Ok(json!({
                "title": "Dune",
                "authors": [{"name": "Frank Herbert"}],
                "publish_year": [1965]
            })),
        );

        let outcome = enrich_book(&repo, &catalog, &book).await;
        assert_eq!(
            outcome,
            Outcome::Updated(vec!["title", "author", "publication_year"])
        );

        let stored = repo.find_by_id(book.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.title, "Dune");
        assert_eq!(stored.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(stored.publication_year, Some(1965));
    }

    #[tokio::test]
    async fn test_missing_isbn_makes_no_request() {
        let repo = setup_repo().await;
        let book = insert(&repo, "No ISBN", Some("   ")).await;
        let catalog = FakeCatalog::default();

        assert_eq!(
            enrich_book(&repo, &catalog, &book).await,
            Outcome::MissingIsbn
        );
        assert!(catalog.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_classified() {
        let repo = setup_repo().await;
        let missing = insert(&repo, "Missing", Some("111")).await;
        let offline = insert(&repo, "Offline", Some("222")).await;
        let garbled = insert(&repo, "Garbled", Some("333")).await;
        let empty = insert(&repo, "Empty", Some("444")).await;

        let catalog = FakeCatalog::default()
            .with(
                "/isbn/222.json",
                Err(CatalogError::Network("connection refused".into())),
            )
            .with("/isbn/333.json", Ok(json!("just a string")))
            .with("/isbn/444.json", Ok(json!({})));

        assert_eq!(
            enrich_book(&repo, &catalog, &missing).await,
            Outcome::NotFound(404)
        );
        assert_eq!(
            enrich_book(&repo, &catalog, &offline).await,
            Outcome::NetworkError("connection refused".into())
        );
        assert!(matches!(
            enrich_book(&repo, &catalog, &garbled).await,
            Outcome::FetchFailed(_)
        ));
        assert_eq!(
            enrich_book(&repo, &catalog, &empty).await,
            Outcome::NoUsableData
        );

        let books = repo.find_all(BookFilter::default()).await.unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Missing", "Offline", "Garbled", "Empty"]);
    }

    #[tokio::test]
    async fn test_batch_message_lists_every_book() {
        let repo = setup_repo().await;
        let first = insert(&repo, "First", None).await;
        let second = insert(&repo, "Second", Some("555")).await;
        let catalog = FakeCatalog::default().with(
            "/isbn/555.json",
            Ok(json!({"publish_date": "March 2001"})),
        );

        let notification = fetch_metadata_for_ids(
            &repo,
            &catalog,
            &[second.id.unwrap(), first.id.unwrap()],
        )
        .await
        .unwrap();

        assert_eq!(notification.title, NOTIFICATION_TITLE);
        assert!(!notification.sticky);
        assert_eq!(
            notification.message,
            "Second: updated (publication_year).\nFirst: missing ISBN."
        );
    }

    #[tokio::test]
    async fn test_batch_message_uses_fetched_title() {
        let repo = setup_repo().await;
        let book = insert(&repo, "Placeholder", Some("777")).await;
        let catalog = FakeCatalog::default().with(
            "/isbn/777.json",
            Ok(json!({"title": "The Left Hand of Darkness"})),
        );

        let notification = fetch_metadata(&repo, &catalog, &[book]).await;
        assert_eq!(
            notification.message,
            "The Left Hand of Darkness: updated (title)."
        );
    }

    #[tokio::test]
    async fn test_empty_batch_uses_default_message() {
        let repo = setup_repo().await;
        let catalog = FakeCatalog::default();

        let notification = fetch_metadata(&repo, &catalog, &[]).await;
        assert_eq!(notification.message, EMPTY_BATCH_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_id_is_rejected() {
        let repo = setup_repo().await;
        let catalog = FakeCatalog::default();

        let err = fetch_metadata_for_ids(&repo, &catalog, &[42])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[tokio::test]
    async fn test_deleted_record_reports_update_failure() {
        let repo = setup_repo().await;
        let book = insert(&repo, "Vanishing", Some("666")).await;
        repo.delete(book.id.unwrap()).await.unwrap();
        let catalog =
            FakeCatalog::default().with("/isbn/666.json", Ok(json!({"title": "Back"})));

        assert!(matches!(
            enrich_book(&repo, &catalog, &book).await,
            Outcome::UpdateFailed(_)
        ));
    }
}
