//! The radio database: one SQLite file holding users, catalog, requests and settings.
//! Each domain implements its store trait on [`SqliteRadioStore`] in its own module.

mod schema;

use crate::catalog::CatalogStore;
use crate::radio::{seed_default_settings, RequestStore, SettingsStore};
use crate::sqlite_persistence::open_versioned_db;
use crate::user::FullUserStore;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

pub use schema::VERSIONED_SCHEMAS;

/// Everything the server needs from persistence.
pub trait RadioStore: CatalogStore + FullUserStore + RequestStore + SettingsStore {}

impl<T: CatalogStore + FullUserStore + RequestStore + SettingsStore> RadioStore for T {}

/// 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(page: usize, page_size: usize) -> Self {
        PageWindow {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }
}

/// One page of rows plus the total row count.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[derive(Clone)]
pub struct SqliteRadioStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl SqliteRadioStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path.as_ref(), VERSIONED_SCHEMAS)?;
        let seeded = seed_default_settings(&conn)?;
        if seeded > 0 {
            info!("Seeded {} default settings", seeded);
        }
        Ok(SqliteRadioStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Runs `body` inside `BEGIN IMMEDIATE`, committing on success and rolling back on error.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    body: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    conn.execute("BEGIN IMMEDIATE", [])?;
    match body(conn) {
        Ok(value) => {
            conn.execute("COMMIT", [])?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute("ROLLBACK", []);
            Err(e)
        }
    }
}

/// Maps "no rows" to `None`, keeping every other error.
pub(crate) fn optional_row<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SqliteRadioStore;
    use tempfile::TempDir;

    pub fn create_tmp_store() -> (SqliteRadioStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteRadioStore::new(temp_dir.path().join("radio.db")).unwrap();
        (store, temp_dir)
    }
}
