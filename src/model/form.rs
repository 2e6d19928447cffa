//! The "add workout" form: raw user input before it becomes a sample.

use jiff::{SignedDuration, Timestamp};

use super::{WorkoutKind, WorkoutSample};

/// Raw values as the user typed them.
///
/// Distance is entered in kilometers; calories as a plain number.
#[derive(Debug, Clone)]
pub struct WorkoutForm {
    pub kind: WorkoutKind,
    pub calories: String,
    pub distance_km: String,
}

/// Reasons a form cannot be finalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a non-negative number, got '{input}'")]
    InvalidNumber { field: &'static str, input: String },

    #[error("invalid workout window: {0}")]
    Window(String),
}

impl WorkoutForm {
    /// Turns the form into a sample spanning `now` to `now + window`.
    ///
    /// Both calories and distance must be filled in.
    ///
    /// `now` is truncated to whole seconds.
    pub fn finalize(
        &self,
        now: Timestamp,
        window: SignedDuration,
    ) -> Result<WorkoutSample, FormError> {
        let calories = parse_field("calories", &self.calories)?;
        let distance_km = parse_field("distance", &self.distance_km)?;

        let start_date = Timestamp::from_second(now.as_second())
            .map_err(|e| FormError::Window(e.to_string()))?;
        let end_date = start_date
            .checked_add(window)
            .map_err(|e| FormError::Window(e.to_string()))?;
        if end_date <= start_date {
            return Err(FormError::Window(format!(
                "window must be positive, got {window}"
            )));
        }

        Ok(WorkoutSample {
            kind: self.kind,
            start_date,
            end_date,
            energy_burned: calories,
            distance: distance_km * 1000.0,
        })
    }
}

fn parse_field(field: &'static str, input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(FormError::InvalidNumber {
            field,
            input: input.to_string(),
        }),
    }
}
