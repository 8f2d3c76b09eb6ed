use thiserror::Error;

use crate::validator::ValidationReport;

#[derive(Debug, Error)]
pub enum CargoPackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("nothing to pack: no packages or no containers supplied")]
    Empty,

    #[error("invalid dimensions: length, width and height must all be greater than 0 (got {length}x{width}x{height})")]
    InvalidDimensions {
        length: i64,
        width: i64,
        height: i64,
    },

    #[error("solution failed validation: {0}")]
    ValidationFailed(ValidationReport),
}

pub type Result<T> = std::result::Result<T, CargoPackError>;
