//! Schema management: idempotent creation and versioned migrations.
//!
//! Migrations are numbered from 1 and applied in order, each in its own
//! transaction together with its `schema_version` row. Databases written
//! before versioning existed (a bare `workout` table, with or without a
//! `steps` column) are adopted in place.

use jiff::Timestamp;
use rusqlite::Connection;

use super::{Result, Storage, StorageError, format_timestamp};

const SCHEMA_VERSION_TABLE: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);";

/// v1: the original workout table.
const WORKOUT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS workout (
    id TEXT PRIMARY KEY,
    type TEXT,
    startDate TEXT,
    endDate TEXT,
    energyBurned REAL,
    energyBurnedUnit TEXT,
    distance REAL,
    distanceUnit TEXT
);";

/// Latest schema version this build knows how to produce.
pub(super) const CURRENT_VERSION: i64 = 3;

type Migration = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: [(i64, Migration); 3] = [
    (1, create_workout_table),
    (2, add_steps_column),
    (3, normalize_timestamps),
];

impl Storage {
    /// Creates the schema if absent and applies any pending migrations.
    ///
    /// Safe to call on every startup: a database already at
    /// [`CURRENT_VERSION`] is left untouched.
    pub fn ensure_schema(&self) -> Result<()> {
        self.migrate().map_err(|e| {
            tracing::error!(error = %e, "failed to prepare workout schema");
            StorageError::Schema(e.to_string())
        })
    }

    /// Returns the highest applied migration, or 0 on a fresh database.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(current_version(&self.conn)?)
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(SCHEMA_VERSION_TABLE)?;
        let from = current_version(&self.conn)?;
        tracing::debug!(from, to = CURRENT_VERSION, "checking workout schema");

        for (version, migration) in MIGRATIONS {
            if version <= from {
                continue;
            }
            let tx = self.conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, Timestamp::now().to_string()],
            )?;
            tx.commit()?;
            tracing::info!(version, "applied workout schema migration");
        }

        Ok(())
    }
}

fn current_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

fn create_workout_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(WORKOUT_TABLE)
}

/// v2: optional step count, plus an index for the latest-workout query.
fn add_steps_column(conn: &Connection) -> rusqlite::Result<()> {
    // Some legacy databases were created with the column already present.
    if !has_column(conn, "workout", "steps")? {
        conn.execute_batch("ALTER TABLE workout ADD COLUMN steps INTEGER;")?;
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_workout_start_date ON workout (startDate);")
}

/// v3: rewrites every start and end date into the fixed-width stored format.
///
/// Older writers stored whatever their clock library produced (`...:00Z`,
/// `...:00.500Z`), which does not sort chronologically as text. Values that
/// don't parse are left alone; reading them later reports corruption.
fn normalize_timestamps(conn: &Connection) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("SELECT rowid, startDate, endDate FROM workout")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    drop(stmt);

    let mut rewritten = 0;
    for (rowid, start, end) in rows {
        let start_fixed = start.as_deref().and_then(normalize);
        let end_fixed = end.as_deref().and_then(normalize);
        if start_fixed.is_none() && end_fixed.is_none() {
            continue;
        }
        conn.execute(
            "UPDATE workout SET startDate = COALESCE(?2, startDate),
             endDate = COALESCE(?3, endDate) WHERE rowid = ?1",
            rusqlite::params![rowid, start_fixed, end_fixed],
        )?;
        rewritten += 1;
    }
    tracing::debug!(rewritten, "normalized stored workout timestamps");
    Ok(())
}

/// Returns the stored form of `raw`, or `None` if it is unparseable or
/// already normalized.
fn normalize(raw: &str) -> Option<String> {
    let ts: Timestamp = raw.parse().ok()?;
    let fixed = format_timestamp(ts);
    (fixed != raw).then_some(fixed)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::{DistanceUnit, EnergyUnit, WorkoutKind, WorkoutRecord};
    use crate::storage::Latest;

    fn count_rows(storage: &Storage) -> i64 {
        storage
            .conn
            .query_row("SELECT COUNT(*) FROM workout", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn fresh_database_is_at_current_version() {
        let storage = Storage::open_in_memory().unwrap();

        assert_eq!(storage.schema_version().unwrap(), CURRENT_VERSION);
        assert!(has_column(&storage.conn, "workout", "steps").unwrap());
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO workout (id, type, startDate, endDate, energyBurned,
                 energyBurnedUnit, distance, distanceUnit)
                 VALUES ('w1', 'Walking', '2024-07-09T10:00:00Z', '2024-07-09T11:00:00Z',
                 120, 'calorie', 3000, 'meter')",
                [],
            )
            .unwrap();

        for _ in 0..3 {
            storage.ensure_schema().unwrap();
        }

        assert_eq!(storage.schema_version().unwrap(), CURRENT_VERSION);
        assert_eq!(count_rows(&storage), 1);
        let applied: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, CURRENT_VERSION);
    }

    #[test]
    fn adopts_unversioned_legacy_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout.db");

        let legacy = Connection::open(&path).unwrap();
        legacy.execute_batch(WORKOUT_TABLE).unwrap();
        legacy
            .execute(
                "INSERT INTO workout VALUES ('legacy', 'Running', '2024-01-01T08:00:00Z',
                 '2024-01-01T09:00:00Z', 300, 'calorie', 5000, 'meter')",
                [],
            )
            .unwrap();
        drop(legacy);

        let storage = Storage::open(&path).unwrap();

        assert_eq!(storage.schema_version().unwrap(), CURRENT_VERSION);
        let Latest::Found(record) = storage.latest_workout() else {
            panic!("expected the legacy workout");
        };
        assert_eq!(record.id, "legacy");
        assert_eq!(record.steps, None);
    }

    #[test]
    fn adopts_legacy_table_that_already_has_steps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout.db");

        let legacy = Connection::open(&path).unwrap();
        legacy
            .execute_batch(
                "CREATE TABLE workout (
                    id TEXT PRIMARY KEY, type TEXT, startDate TEXT, endDate TEXT,
                    energyBurned REAL, energyBurnedUnit TEXT, distance REAL,
                    distanceUnit TEXT, steps INTEGER
                );
                INSERT INTO workout VALUES ('legacy', 'Walking', '2024-01-01T08:00:00Z',
                    '2024-01-01T09:00:00Z', 90, 'calorie', 2000, 'meter', 2500);",
            )
            .unwrap();
        drop(legacy);

        let storage = Storage::open(&path).unwrap();

        assert_eq!(storage.schema_version().unwrap(), CURRENT_VERSION);
        let Latest::Found(record) = storage.latest_workout() else {
            panic!("expected the legacy workout");
        };
        assert_eq!(record.steps, Some(2500));
    }

    fn stored_start(storage: &Storage, id: &str) -> String {
        storage
            .conn
            .query_row("SELECT startDate FROM workout WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn legacy_millisecond_dates_order_against_new_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout.db");

        let legacy = Connection::open(&path).unwrap();
        legacy.execute_batch(WORKOUT_TABLE).unwrap();
        legacy
            .execute(
                "INSERT INTO workout VALUES ('legacy', 'walking', '2024-07-09T10:00:00.500Z',
                 '2024-07-09T11:00:00.500Z', 120, 'calorie', 3000, 'meter')",
                [],
            )
            .unwrap();
        drop(legacy);

        let storage = Storage::open(&path).unwrap();
        assert_eq!(
            stored_start(&storage, "legacy"),
            "2024-07-09T10:00:00.500000000Z"
        );

        let earlier = WorkoutRecord {
            id: "new".into(),
            kind: WorkoutKind::Running,
            start_date: "2024-07-09T10:00:00Z".parse().unwrap(),
            end_date: "2024-07-09T11:00:00Z".parse().unwrap(),
            energy_burned: 200.0,
            energy_burned_unit: EnergyUnit::Calorie,
            distance: 4000.0,
            distance_unit: DistanceUnit::Meter,
            steps: None,
        };
        storage.insert_workout(&earlier).unwrap();

        let Latest::Found(record) = storage.latest_workout() else {
            panic!("expected a workout");
        };
        assert_eq!(record.id, "legacy");
    }

    #[test]
    fn unparseable_legacy_date_is_left_for_the_reader() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO workout (id, type, startDate, endDate, energyBurned,
                 energyBurnedUnit, distance, distanceUnit)
                 VALUES ('bad', 'Walking', 'yesterday', '2024-07-09T11:00:00Z',
                 120, 'calorie', 3000, 'meter')",
                [],
            )
            .unwrap();

        normalize_timestamps(&storage.conn).unwrap();

        assert_eq!(stored_start(&storage, "bad"), "yesterday");
        assert!(matches!(
            storage.latest_workout(),
            Latest::Unavailable(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn schema_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout.db");

        // A view named `workout` cannot take the `steps` column.
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE VIEW workout AS SELECT 1 AS id;")
            .unwrap();
        drop(conn);

        let err = Storage::open(&path).err().unwrap();
        assert!(matches!(err, StorageError::Schema(_)));
    }
}
