//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use crate::domain::{BookFilter, BookRepository, CategoryCount, DomainError};
use crate::models::book::{ActiveModel, Category, Column, Entity as BookEntity};
use crate::models::{Book, BookPatch};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
    category_count: i64,
}

fn apply_filter(mut query: Select<BookEntity>, filter: &BookFilter) -> Select<BookEntity> {
    if let Some(category) = filter.category {
        query = query.filter(Column::Category.eq(category));
    }

    if let Some(title) = &filter.title
        && !title.is_empty()
    {
        query = query.filter(Column::Title.contains(title));
    }

    if let Some(author) = &filter.author
        && !author.is_empty()
    {
        query = query.filter(Column::Author.contains(author));
    }

    if let Some(isbn) = &filter.isbn
        && !isbn.is_empty()
    {
        query = query.filter(Column::Isbn.eq(isbn.trim()));
    }

    query
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let books = apply_filter(BookEntity::find(), &filter)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Book>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let books = BookEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut new_book: ActiveModel = book.into();
        new_book.id = NotSet;
        new_book.created_at = Set(now.clone());
        new_book.updated_at = Set(now);

        let result = new_book.insert(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        patch.apply_to(&mut active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Book::from(result))
    }

    async fn update_many(
        &self,
        ids: &[i32],
        patch: BookPatch,
    ) -> Result<Vec<Book>, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let mut updated = Vec::with_capacity(ids.len());
        for &id in ids {
            // Dropping the transaction on early return rolls everything back
            let existing = BookEntity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(DomainError::NotFound)?;

            let mut active: ActiveModel = existing.into();
            patch.apply_to(&mut active);
            active.updated_at = Set(now.clone());
            updated.push(Book::from(active.update(&txn).await?));
        }

        txn.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count_by_category(
        &self,
        filter: BookFilter,
    ) -> Result<Vec<CategoryCount>, DomainError> {
        let rows = apply_filter(BookEntity::find(), &filter)
            .select_only()
            .column(Column::Category)
            .column_as(Expr::col(Column::Id).count(), "category_count")
            .filter(Column::Category.is_not_null())
            .group_by(Column::Category)
            .order_by_asc(Column::Category)
            .into_model::<CategoryRow>()
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<CategoryCount, DomainError> {
                let category = Category::try_from_value(&row.category)?;
                Ok(CategoryCount {
                    category,
                    count: u64::try_from(row.category_count).unwrap_or(0),
                })
            })
            .collect()
    }
}
