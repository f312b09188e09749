pub mod bat;
pub mod bref;
pub mod compliance;
pub mod enums;
pub mod permit;

pub use bat::*;
pub use bref::*;
pub use compliance::*;
pub use enums::*;
pub use permit::*;

use thiserror::Error;

/// Validation errors for model constructors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Confidence must be within 0.0..=1.0, got {0}")]
    ConfidenceOutOfRange(f32),

    #[error("Invalid limit range: low {low} exceeds high {high}")]
    InvalidLimitRange { low: f64, high: f64 },

    #[error("Emission limit value must be non-negative, got {0}")]
    NegativeLimit(f64),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}
