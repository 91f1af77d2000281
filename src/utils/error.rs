//! Error Handling Module
//!
//! Defines the error type for MNIST-A dataset access and loading.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for MNIST-A dataset operations
#[derive(Error, Debug)]
pub enum MnistaError {
    /// Index outside `0..len`
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Flattened image cannot be reshaped into a raster
    #[error("Cannot reshape image {index}: expected {expected} samples, found {actual}")]
    Shape {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Label cannot be converted to a plain integer
    #[error("Label at index {index} is not an integer-convertible value: {value}")]
    InvalidLabel { index: usize, value: String },

    /// Error raised by a user-supplied transform
    #[error("Transform error: {0}")]
    Transform(String),

    /// Malformed line in a data file
    #[error("Failed to parse '{}' at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MnistaError {
    fn from(err: serde_json::Error) -> Self {
        MnistaError::Serialization(err.to_string())
    }
}

/// Convenience Result type for MNIST-A operations
pub type Result<T> = std::result::Result<T, MnistaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_display() {
        let err = MnistaError::IndexOutOfRange { index: 4, len: 4 };
        assert_eq!(
            format!("{}", err),
            "Index 4 out of range for dataset of length 4"
        );
    }

    #[test]
    fn test_shape_error_display() {
        let err = MnistaError::Shape {
            index: 1,
            expected: 784,
            actual: 783,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("784"));
        assert!(msg.contains("783"));
    }

    #[test]
    fn test_parse_error_mentions_path() {
        let err = MnistaError::Parse {
            path: PathBuf::from("/data/csvTrainImages.csv"),
            line: 12,
            message: "invalid digit".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("csvTrainImages.csv"));
        assert!(msg.contains("line 12"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MnistaError = io_err.into();
        assert!(matches!(err, MnistaError::Io(_)));
    }
}
