//! Workout types: the single entity Pacer persists.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::Serialize;

/// The closed set of workout types.
///
/// Parsed case-insensitively, displayed capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkoutKind {
    Walking,
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "walking" => Ok(Self::Walking),
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// Unit tag for `energy_burned`. Only calories are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    #[default]
    Calorie,
}

impl EnergyUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calorie => "calorie",
        }
    }
}

impl FromStr for EnergyUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calorie" => Ok(Self::Calorie),
            _ => Err(ValidationError::UnknownUnit(s.to_string())),
        }
    }
}

/// Unit tag for `distance`. Distances are stored in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meter,
}

impl DistanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meter => "meter",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meter" => Ok(Self::Meter),
            _ => Err(ValidationError::UnknownUnit(s.to_string())),
        }
    }
}

/// A finalized workout that has not yet been issued an id.
///
/// This is what the health store receives.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSample {
    pub kind: WorkoutKind,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Calories.
    pub energy_burned: f64,
    /// Meters.
    pub distance: f64,
}

/// A stored workout.
///
/// Field names serialize to the column names of the `workout` table.
/// Records are never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub energy_burned: f64,
    pub energy_burned_unit: EnergyUnit,
    pub distance: f64,
    pub distance_unit: DistanceUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
}

impl WorkoutRecord {
    /// Builds a record from a sample, the id issued for it, and a step snapshot.
    pub fn from_sample(id: String, sample: WorkoutSample, steps: Option<u64>) -> Self {
        Self {
            id,
            kind: sample.kind,
            start_date: sample.start_date,
            end_date: sample.end_date,
            energy_burned: sample.energy_burned,
            energy_burned_unit: EnergyUnit::Calorie,
            distance: sample.distance,
            distance_unit: DistanceUnit::Meter,
            steps,
        }
    }

    /// Checks the invariants a record must satisfy before it is stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.end_date <= self.start_date {
            return Err(ValidationError::EndNotAfterStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        check_non_negative("energyBurned", self.energy_burned)?;
        check_non_negative("distance", self.distance)?;
        Ok(())
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

/// Reasons a workout record is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("workout id is empty")]
    EmptyId,

    #[error("workout must end after it starts (start {start}, end {end})")]
    EndNotAfterStart { start: Timestamp, end: Timestamp },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("step count {0} is too large to store")]
    TooManySteps(u64),

    #[error("unknown workout type: {0}")]
    UnknownKind(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}
