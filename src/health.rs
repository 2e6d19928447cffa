//! Health-data integration: the platform store that authorizes and
//! identifies saved workouts.
//!
//! A workout is written to the health store before it is persisted
//! locally, and the identifier the store issues becomes the workout's
//! primary key. If the store declines, nothing is persisted.

use uuid::Uuid;

use crate::model::WorkoutSample;

/// Reasons the health store did not accept a workout.
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("health data access was declined")]
    Declined,
}

/// A store that accepts finished workouts and issues identifiers for them.
pub trait HealthStore {
    /// Saves the workout, returning the identifier the store assigned.
    fn save_workout(&self, sample: &WorkoutSample) -> Result<String, HealthError>;
}

/// Issues random UUIDs without an external platform.
#[derive(Debug, Default)]
pub struct LocalHealthStore;

impl HealthStore for LocalHealthStore {
    fn save_workout(&self, sample: &WorkoutSample) -> Result<String, HealthError> {
        let id = Uuid::new_v4().to_string();
        tracing::debug!(%id, kind = %sample.kind, "issued local workout id");
        Ok(id)
    }
}

/// Health integration switched off in config: every save is declined.
#[derive(Debug, Default)]
pub struct DisabledHealthStore;

impl HealthStore for DisabledHealthStore {
    fn save_workout(&self, _sample: &WorkoutSample) -> Result<String, HealthError> {
        Err(HealthError::Declined)
    }
}
