pub mod repository;

pub use repository::SqliteDocumentStore;
