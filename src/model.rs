//! Core data model for Pacer.
//!
//! A workout starts life as a [`WorkoutForm`] filled in by the user,
//! becomes a [`WorkoutSample`] once the form is finalized, and is stored
//! as a [`WorkoutRecord`] after the health store has issued its id.

mod form;
mod workout;

pub use form::{FormError, WorkoutForm};
pub use workout::{
    DistanceUnit, EnergyUnit, ValidationError, WorkoutKind, WorkoutRecord, WorkoutSample,
};
