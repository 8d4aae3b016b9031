use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Shelf category of a book. Stored as its lowercase key.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[sea_orm(string_value = "education")]
    Education,
    #[sea_orm(string_value = "novel")]
    Novel,
    #[sea_orm(string_value = "science")]
    Science,
    #[sea_orm(string_value = "technology")]
    Technology,
    #[sea_orm(string_value = "history")]
    History,
}

impl Category {
    pub fn key(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Novel => "novel",
            Category::Science => "science",
            Category::Technology => "technology",
            Category::History => "history",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub category: Option<Category>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[serde(default)]
    pub id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: None,
            price: 0.0,
            category: None,
            isbn: None,
            publication_year: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Name used when reporting on this record in notifications.
    pub fn display_name(&self) -> String {
        if self.title.trim().is_empty() {
            match self.id {
                Some(id) => format!("Book #{}", id),
                None => "New book".to_string(),
            }
        } else {
            self.title.clone()
        }
    }
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            author: model.author,
            price: model.price,
            category: model.category,
            isbn: model.isbn,
            publication_year: model.publication_year,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }
}

impl From<Book> for ActiveModel {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map_or(NotSet, Set),
            title: Set(book.title),
            author: Set(book.author),
            price: Set(book.price),
            category: Set(book.category),
            isbn: Set(book.isbn),
            publication_year: Set(book.publication_year),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

/// Partial write on one or more books.
///
/// Nullable columns use `Option<Option<_>>`: an absent key leaves the column
/// alone, an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<Category>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_year: Option<Option<i32>>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.isbn.is_none()
            && self.publication_year.is_none()
    }

    /// Names of the columns this patch writes, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push("title");
        }
        if self.author.is_some() {
            names.push("author");
        }
        if self.price.is_some() {
            names.push("price");
        }
        if self.category.is_some() {
            names.push("category");
        }
        if self.isbn.is_some() {
            names.push("isbn");
        }
        if self.publication_year.is_some() {
            names.push("publication_year");
        }
        names
    }

    pub fn apply_to(&self, active: &mut ActiveModel) {
        if let Some(title) = &self.title {
            active.title = Set(title.clone());
        }
        if let Some(author) = &self.author {
            active.author = Set(author.clone());
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(category) = self.category {
            active.category = Set(category);
        }
        if let Some(isbn) = &self.isbn {
            active.isbn = Set(isbn.clone());
        }
        if let Some(year) = self.publication_year {
            active.publication_year = Set(year);
        }
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
