//! # storage-adapters
//!
//! Concrete implementations of the persistence and media ports defined in
//! `domains`. The SQLite backend is the implemented database; the feature
//! flags leave room for the Postgres and S3 backends planned later.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "media-local")]
pub mod media;
#[cfg(feature = "media-local")]
pub use media::LocalMediaStore;
