//! Workout commands: init, add, latest.

use crate::{
    config::Config,
    health::{DisabledHealthStore, HealthStore, LocalHealthStore},
    model::{WorkoutForm, WorkoutKind},
    pedometer::SessionPedometer,
    session,
    storage::{Latest, Storage},
};

use super::format::format_summary;

pub(super) fn cmd_init(storage: &Storage) -> Result<(), String> {
    storage
        .ensure_schema()
        .map_err(|e| format!("failed to prepare database: {e}"))?;
    let version = storage
        .schema_version()
        .map_err(|e| format!("failed to read schema version: {e}"))?;

    println!("schema version {version}");
    Ok(())
}

pub(super) fn cmd_add(
    config: &Config,
    storage: &Storage,
    kind: WorkoutKind,
    calories: String,
    distance_km: String,
    steps: Option<u64>,
) -> Result<(), String> {
    let form = WorkoutForm {
        kind,
        calories,
        distance_km,
    };

    let health: &dyn HealthStore = if config.health.enabled {
        &LocalHealthStore
    } else {
        &DisabledHealthStore
    };

    let mut pedometer = SessionPedometer::default();
    if let Some(n) = steps {
        pedometer.observe(n);
    }

    let record = session::save_workout(health, &pedometer, storage, &form, config.window())
        .map_err(|e| format!("workout not saved: {e}"))?;

    println!("{}", record.id);
    Ok(())
}

pub(super) fn cmd_latest(storage: &Storage, json: bool) -> Result<(), String> {
    print!("{}", render_latest(storage.latest_workout(), json)?);
    Ok(())
}

/// Text printed by `pacer latest`, newline-terminated.
fn render_latest(latest: Latest, json: bool) -> Result<String, String> {
    match latest {
        Latest::Found(record) if json => serde_json::to_string_pretty(&record)
            .map(|out| out + "\n")
            .map_err(|e| format!("failed to serialize workout: {e}")),
        Latest::Found(record) => Ok(format_summary(&record)),
        Latest::NotFound if json => Ok("null\n".to_string()),
        Latest::NotFound => Ok("No workouts yet\n".to_string()),
        Latest::Unavailable(e) => Err(format!("failed to load latest workout: {e}")),
    }
}
