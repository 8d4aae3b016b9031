pub mod openlibrary;

pub use openlibrary::{CatalogError, CatalogTransport, OpenLibraryClient};
