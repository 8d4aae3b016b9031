//! Services Layer
//!
//! Business logic extracted from HTTP handlers. Services take repository and
//! catalogue trait objects so they can be driven without the web layer.

pub mod book_service;
pub mod category_report;
pub mod enrichment;

pub use category_report::count_books_by_category;
pub use enrichment::{fetch_metadata, fetch_metadata_for_ids};
