//! Local persistence for workouts.
//!
//! All workouts live in a single `SQLite` file, `~/.pacer/workout.db` by
//! default, in one append-only table:
//!
//! ```text
//! workout          # One row per saved workout, keyed by health-store id
//! schema_version   # Applied migrations
//! ```
//!
//! A [`Storage`] owns its connection. Open one at startup and pass it to
//! whatever needs persistence; dropping it (or calling [`Storage::close`])
//! releases the file.

mod schema;
mod workout;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::{Timestamp, tz::TimeZone};
use rusqlite::Connection;

use crate::model::ValidationError;

pub use workout::Latest;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("workout already exists: {0}")]
    DuplicateWorkout(String),

    #[error("invalid workout: {0}")]
    Invalid(#[from] ValidationError),

    #[error("corrupt workout data: {0}")]
    Corrupt(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// `SQLite`-backed workout store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database at `path` and brings its schema up to date.
    ///
    /// The parent directory is created if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened workout database");

        let storage = Self { conn };
        storage.ensure_schema()?;
        Ok(storage)
    }

    /// Opens a private in-memory database with the current schema.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let storage = Self {
            conn: Connection::open_in_memory()?,
        };
        storage.ensure_schema()?;
        Ok(storage)
    }

    /// Returns the default database path: `~/.pacer/workout.db`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pacer").join("workout.db"))
    }

    /// Closes the connection, reporting any error `SQLite` raises while doing so.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}

/// Stored timestamp format: UTC with nanosecond fraction, always fixed-width,
/// so text ordering in `SQLite` matches chronological ordering.
fn format_timestamp(ts: Timestamp) -> String {
    let utc = ts.to_zoned(TimeZone::UTC);
    format!(
        "{}.{:09}Z",
        utc.strftime("%Y-%m-%dT%H:%M:%S"),
        utc.subsec_nanosecond()
    )
}
