//! Patient document collection.
//!
//! Handlers are generic over `PatientStore`, so the same router serves the
//! in-memory collection used by tests and the SQLite-backed collection used
//! by the binary. Documents come back in insertion order.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::future::Future;

use crate::model::Patient;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait PatientStore: Clone + Send + Sync + 'static {
    fn count(&self) -> impl Future<Output = StoreResult<u64>> + Send;

    fn find(&self, id: i64) -> impl Future<Output = StoreResult<Option<Patient>>> + Send;

    /// Up to `limit` documents after skipping `offset`, in insertion order.
    fn page(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = StoreResult<Vec<Patient>>> + Send;

    /// Runs `apply` against the patient with `id` and persists the result as
    /// one atomic read-modify-write. Returns `None` if no such patient.
    fn modify<F, T>(&self, id: i64, apply: F) -> impl Future<Output = StoreResult<Option<T>>> + Send
    where
        F: FnOnce(&mut Patient) -> T + Send + 'static,
        T: Send + 'static;

    /// Wipes the collection and inserts `patients` in order, atomically.
    fn replace_all(&self, patients: Vec<Patient>) -> impl Future<Output = StoreResult<()>> + Send;
}
