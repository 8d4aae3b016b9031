pub mod book;
pub mod notification;

pub use book::{Book, BookPatch, Category};
pub use notification::Notification;
