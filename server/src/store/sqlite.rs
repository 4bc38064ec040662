//! SQLite-backed document collection.
//!
//! Each patient is one JSON document in the `patients` table. The `seq`
//! column is an autoincrement key that records insertion order, which is
//! the order listings are served in. All calls hop onto the blocking pool
//! and hold the connection for their whole duration, so a `modify` is a
//! single transaction no other request can interleave with.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use super::{PatientStore, StoreError, StoreResult};
use crate::model::Patient;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id INTEGER NOT NULL UNIQUE,
    document TEXT NOT NULL
);
"#;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open the collection at `path`, creating the file and schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<F, T>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            op(&mut guard)
        })
        .await?
    }
}

fn load(conn: &Connection, id: i64) -> StoreResult<Option<Patient>> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM patients WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    document
        .map(|doc| serde_json::from_str(&doc))
        .transpose()
        .map_err(Into::into)
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl PatientStore for SqliteStore {
    async fn count(&self) -> StoreResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
            Ok(count.unsigned_abs())
        })
        .await
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Patient>> {
        self.with_conn(move |conn| load(conn, id)).await
    }

    async fn page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Patient>> {
        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare("SELECT document FROM patients ORDER BY seq LIMIT ?1 OFFSET ?2")?;
            let documents = stmt
                .query_map(params![to_sql_int(limit), to_sql_int(offset)], |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<Result<Vec<_>, _>>()?;
            documents
                .iter()
                .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    async fn modify<F, T>(&self, id: i64, apply: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut Patient) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut patient) = load(&tx, id)? else {
                return Ok(None);
            };
            let result = apply(&mut patient);
            tx.execute(
                "UPDATE patients SET document = ?2 WHERE id = ?1",
                params![id, serde_json::to_string(&patient)?],
            )?;
            tx.commit()?;
            Ok(Some(result))
        })
        .await
    }

    async fn replace_all(&self, patients: Vec<Patient>) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM patients", [])?;
            {
                let mut insert =
                    tx.prepare("INSERT INTO patients (id, document) VALUES (?1, ?2)")?;
                for patient in &patients {
                    insert.execute(params![patient.id, serde_json::to_string(patient)?])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }
}
