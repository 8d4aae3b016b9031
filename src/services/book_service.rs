//! Book Service - Pure business logic without HTTP layer
//!
//! Every write goes through the validators below before the repository is
//! touched, so a rejected write leaves stored data unchanged.

use crate::domain::{BookFilter, BookRepository, DomainError};
use crate::models::{Book, BookPatch};

pub const PRICE_ERROR: &str = "Price must be non-negative.";
pub const TITLE_ERROR: &str = "Title is required.";

pub fn validate_price(price: f64) -> Result<(), DomainError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::Validation(PRICE_ERROR.to_string()))
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation(TITLE_ERROR.to_string()));
    }
    Ok(())
}

pub fn validate_book(book: &Book) -> Result<(), DomainError> {
    validate_title(&book.title)?;
    validate_price(book.price)
}

pub fn validate_patch(patch: &BookPatch) -> Result<(), DomainError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    Ok(())
}

/// List all books with optional filters
pub async fn list_books(
    repo: &dyn BookRepository,
    filter: BookFilter,
) -> Result<Vec<Book>, DomainError> {
    tracing::info!(
        "List books - Filters: category={:?}, title={:?}, author={:?}, isbn={:?}",
        filter.category,
        filter.title,
        filter.author,
        filter.isbn
    );

    let books = repo.find_all(filter).await?;
    tracing::info!("Returning {} books", books.len());
    Ok(books)
}

/// Get a single book by ID
pub async fn get_book(repo: &dyn BookRepository, id: i32) -> Result<Book, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Create a new book
pub async fn create_book(repo: &dyn BookRepository, book: Book) -> Result<Book, DomainError> {
    validate_book(&book)?;
    let created = repo.create(book).await?;
    tracing::info!("Created book {:?} ({})", created.id, created.title);
    Ok(created)
}

/// Update a single book
pub async fn update_book(
    repo: &dyn BookRepository,
    id: i32,
    patch: BookPatch,
) -> Result<Book, DomainError> {
    validate_patch(&patch)?;
    tracing::debug!("Updating book {} fields {:?}", id, patch.field_names());
    repo.update(id, patch).await
}

/// Write the same values onto several books. Either every book is updated or
/// none is.
pub async fn write_books(
    repo: &dyn BookRepository,
    ids: &[i32],
    patch: BookPatch,
) -> Result<Vec<Book>, DomainError> {
    validate_patch(&patch)?;

    let mut unique_ids: Vec<i32> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique_ids.contains(id) {
            unique_ids.push(*id);
        }
    }

    if unique_ids.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        "Batch write on {} books, fields {:?}",
        unique_ids.len(),
        patch.field_names()
    );
    repo.update_many(&unique_ids, patch).await
}

/// Delete a book. Deleting a missing book is not an error.
pub async fn delete_book(repo: &dyn BookRepository, id: i32) -> Result<(), DomainError> {
    match repo.delete(id).await {
        Ok(()) => Ok(()),
        Err(DomainError::NotFound) => {
            tracing::debug!("Book {} already absent", id);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db;
    use crate::infrastructure::SeaOrmBookRepository;
    use crate::models::Category;

    async fn setup_repo() -> SeaOrmBookRepository {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        SeaOrmBookRepository::new(db)
    }

    fn priced(title: &str, price: f64) -> Book {
        let mut book = Book::new(title);
        book.price = price;
        book
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(19.99).is_ok());
        assert!(matches!(
            validate_price(-0.01),
            Err(DomainError::Validation(msg)) if msg == PRICE_ERROR
        ));
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_book_requires_title() {
        assert!(validate_book(&Book::new("Dune")).is_ok());
        assert!(matches!(
            validate_book(&Book::new("   ")),
            Err(DomainError::Validation(msg)) if msg == TITLE_ERROR
        ));
    }

    #[tokio::test]
    async fn test_negative_price_is_not_persisted() {
        let repo = setup_repo().await;

        assert!(create_book(&repo, priced("Cheap", -1.0)).await.is_err());
        assert!(repo.find_all(BookFilter::default()).await.unwrap().is_empty());

        let book = create_book(&repo, priced("Fair", 12.5)).await.unwrap();
        let id = book.id.unwrap();
        assert_eq!(book.price, 12.5);

        let patch = BookPatch {
            price: Some(-3.0),
            ..Default::default()
        };
        let err = update_book(&repo, id, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(get_book(&repo, id).await.unwrap().price, 12.5);
    }

    #[tokio::test]
    async fn test_batch_write_is_all_or_nothing() {
        let repo = setup_repo().await;
        let a = create_book(&repo, Book::new("A")).await.unwrap().id.unwrap();
        let b = create_book(&repo, Book::new("B")).await.unwrap().id.unwrap();

        let patch = BookPatch {
            category: Some(Some(Category::Science)),
            ..Default::default()
        };
        let err = write_books(&repo, &[a, 999, b], patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        assert_eq!(get_book(&repo, a).await.unwrap().category, None);

        let updated = write_books(&repo, &[a, b, a], patch).await.unwrap();
        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|b| b.category == Some(Category::Science)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = setup_repo().await;
        let id = create_book(&repo, Book::new("Gone")).await.unwrap().id.unwrap();

        delete_book(&repo, id).await.unwrap();
        delete_book(&repo, id).await.unwrap();
        assert!(matches!(
            get_book(&repo, id).await,
            Err(DomainError::NotFound)
        ));
    }
}
