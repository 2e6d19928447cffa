//! Workout storage: insert and query the latest workout.

use jiff::Timestamp;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

use crate::model::{DistanceUnit, EnergyUnit, ValidationError, WorkoutKind, WorkoutRecord};

use super::{Result, Storage, StorageError, format_timestamp};

const SELECT_LATEST: &str = "
SELECT id, type, startDate, endDate, energyBurned, energyBurnedUnit,
       distance, distanceUnit, steps
FROM workout
ORDER BY startDate DESC, id ASC
LIMIT 1";

/// Outcome of asking for the most recent workout.
///
/// Keeps an empty store distinct from one that could not be read.
#[derive(Debug)]
pub enum Latest {
    Found(WorkoutRecord),
    NotFound,
    Unavailable(StorageError),
}

impl Storage {
    /// Inserts a single workout in its own transaction.
    ///
    /// Rejects malformed records and id collisions; the stored row is never
    /// overwritten. Every failure is logged before being returned.
    pub fn insert_workout(&self, record: &WorkoutRecord) -> Result<()> {
        match insert_row(&self.conn, record) {
            Ok(()) => {
                tracing::info!(
                    id = %record.id,
                    kind = %record.kind,
                    start = %record.start_date,
                    "saved workout"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "workout not saved");
                Err(e)
            }
        }
    }

    /// Returns the workout with the latest start date.
    ///
    /// Ties on start date go to the smallest id.
    pub fn latest_workout(&self) -> Latest {
        match load_latest(&self.conn) {
            Ok(Some(record)) => Latest::Found(record),
            Ok(None) => Latest::NotFound,
            Err(e) => {
                tracing::error!(error = %e, "failed to load latest workout");
                Latest::Unavailable(e)
            }
        }
    }
}

fn insert_row(conn: &Connection, record: &WorkoutRecord) -> Result<()> {
    record.validate()?;
    let steps = record
        .steps
        .map(|s| i64::try_from(s).map_err(|_| ValidationError::TooManySteps(s)))
        .transpose()?;

    let tx = conn.unchecked_transaction()?;
    let inserted = tx.execute(
        "INSERT INTO workout (id, type, startDate, endDate, energyBurned,
                              energyBurnedUnit, distance, distanceUnit, steps)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            &record.id,
            record.kind.as_str(),
            format_timestamp(record.start_date),
            format_timestamp(record.end_date),
            record.energy_burned,
            record.energy_burned_unit.as_str(),
            record.distance,
            record.distance_unit.as_str(),
            steps,
        ],
    );
    match inserted {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(StorageError::DuplicateWorkout(record.id.clone()));
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit()?;
    Ok(())
}

fn load_latest(conn: &Connection) -> Result<Option<WorkoutRecord>> {
    conn.query_row(SELECT_LATEST, [], WorkoutRow::from_row)
        .optional()?
        .map(WorkoutRow::into_record)
        .transpose()
}

/// A `workout` row as stored, before decoding into domain types.
struct WorkoutRow {
    id: String,
    kind: String,
    start_date: String,
    end_date: String,
    energy_burned: f64,
    energy_burned_unit: String,
    distance: f64,
    distance_unit: String,
    steps: Option<i64>,
}

impl WorkoutRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            start_date: row.get(2)?,
            end_date: row.get(3)?,
            energy_burned: row.get(4)?,
            energy_burned_unit: row.get(5)?,
            distance: row.get(6)?,
            distance_unit: row.get(7)?,
            steps: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<WorkoutRecord> {
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            StorageError::Corrupt(format!("workout {}: invalid {field}: {e}", self.id))
        };

        let kind = self
            .kind
            .parse::<WorkoutKind>()
            .map_err(|e| corrupt("type", &e))?;
        let start_date = self
            .start_date
            .parse::<Timestamp>()
            .map_err(|e| corrupt("startDate", &e))?;
        let end_date = self
            .end_date
            .parse::<Timestamp>()
            .map_err(|e| corrupt("endDate", &e))?;
        let energy_burned_unit = self
            .energy_burned_unit
            .parse::<EnergyUnit>()
            .map_err(|e| corrupt("energyBurnedUnit", &e))?;
        let distance_unit = self
            .distance_unit
            .parse::<DistanceUnit>()
            .map_err(|e| corrupt("distanceUnit", &e))?;
        let steps = self
            .steps
            .map(u64::try_from)
            .transpose()
            .map_err(|e| corrupt("steps", &e))?;

        Ok(WorkoutRecord {
            id: self.id,
            kind,
            start_date,
            end_date,
            energy_burned: self.energy_burned,
            energy_burned_unit,
            distance: self.distance,
            distance_unit,
            steps,
        })
    }
}
