//! Configuration errors shared by the scale, slider and plan types

use thiserror::Error;

/// Errors raised while validating widget configuration.
///
/// None of these are fatal to a page: the lenient constructors record them
/// and fall back to defaults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid scale JSON {raw:?}: {message}")]
    InvalidScaleJson { raw: String, message: String },

    #[error("a marker scale needs at least 2 markers, got {count}")]
    TooFewMarkers { count: usize },

    #[error("markers must be strictly increasing (marker {index} is {value})")]
    MarkersNotIncreasing { index: usize, value: f64 },

    #[error("scale bounds must be finite numbers")]
    NonFiniteBound,

    #[error("scale minimum {min} must be below maximum {max}")]
    InvalidBounds { min: f64, max: f64 },

    #[error("unknown scale kind {0:?}")]
    UnknownScaleKind(String),

    #[error("a {kind} scale takes exactly 2 bounds, got {count}")]
    WrongBoundCount { kind: &'static str, count: usize },

    #[error("invalid start value {0:?}")]
    InvalidStartValue(String),

    #[error("invalid snap flag {0:?}")]
    InvalidSnapFlag(String),

    #[error("plan table must contain at least one plan")]
    EmptyPlanTable,

    #[error("plan {name:?} has capacity {capacity}, below the previous plan")]
    PlansNotAscending { name: String, capacity: f64 },
}
