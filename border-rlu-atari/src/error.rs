//! Errors in the library.
use crate::schema::DType;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RluAtariError {
    /// A stored record does not conform to the record schema.
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// Run index outside of the recorded runs.
    #[error("Invalid run index {0}, expected a value in 1..=5")]
    InvalidRun(usize),
}

/// Details of a [`RluAtariError::SchemaViolation`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    /// A fixed-length field is absent from the record.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field holds values of another primitive type.
    #[error("field '{field}' has type {found:?}, expected {expected:?}")]
    TypeMismatch {
        /// Name of the field.
        field: &'static str,
        /// Type declared in the record schema.
        expected: DType,
        /// Type found in the record.
        found: DType,
    },

    /// A fixed-length field does not hold exactly one value.
    #[error("field '{field}' holds {len} values, expected a scalar")]
    NotScalar {
        /// Name of the field.
        field: &'static str,
        /// Number of values found.
        len: usize,
    },

    /// The record contains no step.
    #[error("episode has no step")]
    EmptyEpisode,

    /// A sequence field disagrees with the episode length given by `actions`.
    #[error("field '{field}' has length {len}, expected {expected}")]
    LengthMismatch {
        /// Name of the field.
        field: &'static str,
        /// Length of the field.
        len: usize,
        /// Episode length.
        expected: usize,
    },

    /// A discount is not a finite value in `[0, 1]`.
    #[error("discount {value} at step {index} is outside [0, 1]")]
    DiscountOutOfRange {
        /// Step index.
        index: usize,
        /// Offending value.
        value: f32,
    },

    /// Observation bytes could not be decoded as an image.
    #[error("observation is not a valid image: {0}")]
    InvalidImage(String),

    /// Decoded observation has an unexpected shape.
    #[error("observation has shape {found:?}, expected {expected:?}")]
    ImageShape {
        /// Shape declared in the output schema.
        expected: [usize; 3],
        /// Shape of the decoded image.
        found: [usize; 3],
    },
}
