use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use serde_json::Error;

// Mock data standing in for the backend until a real one exists.
const SEED: &str = include_str!("../../../fixtures/seed.json");

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Row mapping error: {0}")]
    Infrastructure(serde_json::Error),
    #[error("Resource not found")]
    NotFound,
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Infrastructure(err)
    }
}

// Repositories borrow the staged tables the same way they would borrow a driver connection.
pub type Connection = Tables;

/// Named, ordered tables of JSON rows. Every row carries a string `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tables {
    #[serde(default)]
    sequence: u64,
    #[serde(default)]
    tables: BTreeMap<String, Vec<Value>>,
}

impl Tables {
    pub fn select<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, RepositoryError> {
        self.rows(table)
            .iter()
            .map(|row| serde_json::from_value(row.clone()).map_err(RepositoryError::from))
            .collect()
    }

    pub fn find<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<Option<T>, RepositoryError> {
        match self.position(table, id) {
            Some(index) => Ok(Some(serde_json::from_value(self.rows(table)[index].clone())?)),
            None => Ok(None),
        }
    }

    pub fn count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    /// Appends a row at the end of the table.
    pub fn insert<T: Serialize>(&mut self, table: &str, row: &T) -> Result<(), RepositoryError> {
        let (id, value) = self.encode(table, row)?;
        self.ensure_unique(table, &id)?;
        self.tables.entry(table.to_string()).or_default().push(value);
        Ok(())
    }

    /// Inserts a row at the head of the table, for newest-first collections.
    pub fn prepend<T: Serialize>(&mut self, table: &str, row: &T) -> Result<(), RepositoryError> {
        let (id, value) = self.encode(table, row)?;
        self.ensure_unique(table, &id)?;
        self.tables.entry(table.to_string()).or_default().insert(0, value);
        Ok(())
    }

    pub fn update<T: Serialize>(&mut self, table: &str, id: &str, row: &T) -> Result<(), RepositoryError> {
        let (row_id, value) = self.encode(table, row)?;
        if row_id != id {
            return Err(RepositoryError::CheckViolation(format!(
                "{table}: row id {row_id} does not match {id}"
            )));
        }

        let index = self.position(table, id).ok_or(RepositoryError::NotFound)?;
        if let Some(rows) = self.tables.get_mut(table) {
            rows[index] = value;
        }
        Ok(())
    }

    pub fn delete(&mut self, table: &str, id: &str) -> Result<(), RepositoryError> {
        let index = self.position(table, id).ok_or(RepositoryError::NotFound)?;
        if let Some(rows) = self.tables.get_mut(table) {
            rows.remove(index);
        }
        Ok(())
    }

    /// Next value of the sequence shared by all tables.
    pub fn next_id(&mut self) -> String {
        self.sequence += 1;
        self.sequence.to_string()
    }

    fn rows(&self, table: &str) -> &[Value] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn position(&self, table: &str, id: &str) -> Option<usize> {
        self.rows(table)
            .iter()
            .position(|row| row.get("id").and_then(Value::as_str) == Some(id))
    }

    fn ensure_unique(&self, table: &str, id: &str) -> Result<(), RepositoryError> {
        if self.position(table, id).is_some() {
            return Err(RepositoryError::UniqueViolation(format!("{table}.id = {id}")));
        }
        Ok(())
    }

    fn encode<T: Serialize>(&self, table: &str, row: &T) -> Result<(String, Value), RepositoryError> {
        let value = serde_json::to_value(row)?;
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::CheckViolation(format!("{table}: row has no string id")))?;
        Ok((id, value))
    }
}

#[derive(Clone)]
pub struct Database {
    tables: Arc<RwLock<Tables>>,
    latency: Duration,
}

impl Database {
    pub fn new(latency: Duration) -> Self {
        Self::from_tables(Tables::default(), latency)
    }

    pub fn with_fixtures(latency: Duration) -> Result<Self, RepositoryError> {
        let tables: Tables = serde_json::from_str(SEED)?;
        tracing::info!(
            tables = tables.tables.len(),
            latency_ms = latency.as_millis() as u64,
            "Loaded mock fixtures"
        );
        Ok(Self::from_tables(tables, latency))
    }

    fn from_tables(tables: Tables, latency: Duration) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            latency,
        }
    }

    /// Simulates backend latency, then stages a private copy of every table.
    pub async fn begin(&self) -> Result<UnitOfWork<'_>, RepositoryError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let guard = self.tables.write().await;
        let staged = guard.clone();
        Ok(UnitOfWork { guard, staged })
    }

    /// Simulates backend latency, then borrows the committed tables under a
    /// shared lock. Any number of views may be open at once; `begin` waits
    /// for all of them to drop.
    pub async fn read(&self) -> Result<ReadView<'_>, RepositoryError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(ReadView { guard: self.tables.read().await })
    }
}

/// Read-only access to the last committed state.
pub struct ReadView<'a> {
    guard: RwLockReadGuard<'a, Tables>,
}

impl<'a> ReadView<'a> {
    pub fn connection(&self) -> &Connection {
        &self.guard
    }
}

/// Changes made through `connection()` become visible only after `commit()`.
pub struct UnitOfWork<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    staged: Tables,
}

impl<'a> UnitOfWork<'a> {
    pub async fn commit(mut self) -> Result<(), RepositoryError> {
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }

    pub fn connection(&mut self) -> &mut Connection {
        &mut self.staged
    }
}

// do not add #[cfg(test)] here because it hides this method from libraries.
pub async fn get_test_db() -> Database {
    Database::with_fixtures(Duration::ZERO).expect("Failed to load fixtures")
}
