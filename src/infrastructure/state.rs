//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::BookRepository;
use crate::infrastructure::SeaOrmBookRepository;
use crate::infrastructure::config::Config;
use crate::modules::integrations::{CatalogError, CatalogTransport, OpenLibraryClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Catalogue used for metadata enrichment
    pub catalog: Arc<dyn CatalogTransport>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, catalog: Arc<dyn CatalogTransport>) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            catalog,
        }
    }

    /// Build the state with an OpenLibrary client configured from `config`
    pub fn from_config(db: DatabaseConnection, config: &Config) -> Result<Self, CatalogError> {
        let client = OpenLibraryClient::new(
            &config.catalog_base_url,
            config.catalog_timeout,
            &config.catalog_user_agent,
        )?;
        tracing::info!(
            "Catalogue: {} (timeout {:?})",
            client.base_url(),
            config.catalog_timeout
        );

        Ok(Self::new(db, Arc::new(client)))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
