//! The save flow: from a filled-in form to a stored workout.
//!
//! Runs strictly in order: finalize the form, register the workout with
//! the health store, snapshot the step count, persist. A failure at any
//! step stops the flow; nothing is retried.

use jiff::{SignedDuration, Timestamp};

use crate::{
    health::{HealthError, HealthStore},
    model::{FormError, WorkoutForm, WorkoutRecord},
    pedometer::StepCounter,
    storage::{Storage, StorageError},
};

/// Why a workout was not saved.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Health(#[from] HealthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Saves the workout described by `form`, spanning `window` from now.
///
/// Returns the record as stored.
pub fn save_workout(
    health: &dyn HealthStore,
    pedometer: &dyn StepCounter,
    storage: &Storage,
    form: &WorkoutForm,
    window: SignedDuration,
) -> Result<WorkoutRecord, SaveError> {
    let sample = form.finalize(Timestamp::now(), window)?;

    let id = health.save_workout(&sample).inspect_err(|e| {
        tracing::warn!(kind = %sample.kind, error = %e, "health store did not accept workout");
    })?;

    let record = WorkoutRecord::from_sample(id, sample, pedometer.steps());
    storage.insert_workout(&record)?;
    Ok(record)
}
