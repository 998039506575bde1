use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::{repository, sqlite, DatabaseError};
use crate::models::{DebrisRecord, NewDebrisRecord};

/// Shared handle to the debris table.
///
/// Wraps a single connection so the HTTP workers and the submission
/// pipeline can share it. Each call holds the lock only for its own query.
pub struct DebrisStore {
    conn: Mutex<Connection>,
}

impl DebrisStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (and migrate) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::new(sqlite::open_database(path)?))
    }

    /// In-memory store with the schema applied.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(sqlite::open_memory_database()?))
    }

    pub fn insert(&self, record: &NewDebrisRecord) -> Result<i64, DatabaseError> {
        let conn = self.lock()?;
        repository::insert_debris(&conn, record)
    }

    pub fn get(&self, id: i64) -> Result<DebrisRecord, DatabaseError> {
        let conn = self.lock()?;
        repository::get_debris(&conn, id)
    }

    pub fn list_all(&self) -> Result<Vec<DebrisRecord>, DatabaseError> {
        let conn = self.lock()?;
        repository::list_debris(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_list_through_store() {
        let store = DebrisStore::in_memory().unwrap();
        let id = store
            .insert(&NewDebrisRecord {
                file_path: "Uploads/a.png".into(),
                categories: vec!["Rubber".into()],
                gps_lat: -33.9,
                gps_lon: 18.4,
                country: "South Africa".into(),
                description: "tyre".into(),
            })
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(store.get(id).unwrap().country, "South Africa");
    }
}
