//! OpenLibrary catalogue client.
//!
//! Editions are looked up through `/isbn/<isbn>.json`. The response is a JSON
//! object whose interesting keys are all optional: `title`, `authors` (either
//! `{name}` or `{key}` references), `publish_year` and `publish_date`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_USER_AGENT: &str = "LibraryBook/1.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalogue answered with a non-success HTTP status
    Status(u16),
    /// Connection, DNS or timeout failure
    Network(String),
    /// Anything else: unreadable body, invalid JSON, unexpected shape
    Fetch(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Status(code) => write!(f, "HTTP status {}", code),
            CatalogError::Network(msg) => write!(f, "network error: {}", msg),
            CatalogError::Fetch(msg) => write!(f, "fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Transport used to reach the catalogue. `path` is relative to the
/// catalogue root and always starts with `/`.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, CatalogError>;
}

/// reqwest-backed transport talking to a real OpenLibrary instance
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CatalogError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Network("request timed out".to_string())
    } else if e.is_connect() || e.is_request() {
        CatalogError::Network(e.to_string())
    } else {
        CatalogError::Fetch(e.to_string())
    }
}

#[async_trait]
impl CatalogTransport for OpenLibraryClient {
    async fn get_json(&self, path: &str) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::Fetch(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| CatalogError::Fetch(format!("Failed to parse JSON: {}", e)))
    }
}

/// Catalogue path of an edition. The ISBN is used as a single path segment.
pub fn edition_path(isbn: &str) -> String {
    format!("/isbn/{}.json", urlencoding::encode(isbn.trim()))
}

fn author_path(key: &str) -> String {
    format!("/{}.json", key.trim().trim_start_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorRef {
    Named(String),
    /// Reference to an author record, e.g. `/authors/OL23919A`
    Key(String),
}

/// Fields of an edition record we know how to map onto a book
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edition {
    pub title: Option<String>,
    pub authors: Vec<AuthorRef>,
    pub publication_year: Option<i32>,
}

impl Edition {
    pub fn from_json(value: &Value) -> Result<Self, CatalogError> {
        let obj = value.as_object().ok_or_else(|| {
            CatalogError::Fetch("unexpected response: expected a JSON object".to_string())
        })?;

        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let authors = obj
            .get("authors")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(author_ref).collect())
            .unwrap_or_default();

        Ok(Self {
            title,
            authors,
            publication_year: publication_year(obj),
        })
    }
}

fn author_ref(entry: &Value) -> Option<AuthorRef> {
    let entry = entry.as_object()?;
    let non_empty = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    non_empty("name")
        .map(AuthorRef::Named)
        .or_else(|| non_empty("key").map(AuthorRef::Key))
}

/// A non-empty `publish_year` list wins; otherwise the first 4-digit run of
/// `publish_date`. Year 0 counts as absent.
fn publication_year(obj: &Map<String, Value>) -> Option<i32> {
    let year = match obj.get("publish_year") {
        Some(Value::Array(years)) if !years.is_empty() => year_value(&years[0]),
        _ => obj
            .get("publish_date")
            .and_then(Value::as_str)
            .and_then(first_four_digits),
    };

    year.filter(|y| *y != 0)
}

fn year_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_four_digits(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let start = bytes
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))?;
    text[start..start + 4].parse().ok()
}

/// Fetch the edition registered under `isbn`.
pub async fn fetch_edition(
    transport: &dyn CatalogTransport,
    isbn: &str,
) -> Result<Edition, CatalogError> {
    let value = transport.get_json(&edition_path(isbn)).await?;
    Edition::from_json(&value)
}

/// Turn author references into display names. Key references are looked up
/// on the catalogue; a reference that cannot be resolved is dropped.
pub async fn resolve_author_names(
    transport: &dyn CatalogTransport,
    authors: &[AuthorRef],
) -> Vec<String> {
    let mut names = Vec::with_capacity(authors.len());

    for author in authors {
        match author {
            AuthorRef::Named(name) => names.push(name.clone()),
            AuthorRef::Key(key) => match transport.get_json(&author_path(key)).await {
                Ok(record) => {
                    if let Some(name) = record
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                    {
                        names.push(name.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!("Could not resolve author {}: {}", key, e);
                }
            },
        }
    }

    names
}
