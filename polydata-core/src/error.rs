use thiserror::Error;

use crate::attribute::DataType;

/// Coarse classification of a [PolyDataError]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A caller supplied an argument that violates an invariant of the model. Nothing was changed.
    Validation,
    /// Memory for a buffer could not be reserved. Nothing was committed.
    Allocation,
    /// Received data is malformed or truncated. The receiver was left untouched.
    Protocol,
}

/// Errors raised by the POLYDATA data model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyDataError {
    #[error("index {index} is out of range for a collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid attribute type (kind code {kind_code:#04x}, data type code {data_type_code}, {n_components} components)")]
    InvalidAttributeType {
        kind_code: u8,
        data_type_code: u8,
        n_components: u32,
    },
    #[error("attribute stores {stored} values, but {requested} values were requested")]
    DataTypeMismatch {
        stored: DataType,
        requested: DataType,
    },
    #[error("source holds {actual} values, but {required} values are required")]
    SourceTooShort { required: usize, actual: usize },
    #[error("expected {expected} values, but got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },
    #[error("attribute names must not contain NUL bytes and must be at most {max_len} bytes long")]
    InvalidName { max_len: usize },
    #[error("value at index {index} cannot be represented as {target}")]
    ValueNotRepresentable { index: usize, target: DataType },
    #[error("cell run starting at word {offset} overruns the channel buffer of {len} words")]
    MalformedCells { offset: usize, len: usize },
    #[error("could not reserve memory for {count} elements")]
    Allocation { count: usize },
}

impl PolyDataError {
    /// Returns the [ErrorCategory] of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            PolyDataError::IndexOutOfRange { .. }
            | PolyDataError::InvalidAttributeType { .. }
            | PolyDataError::DataTypeMismatch { .. }
            | PolyDataError::SourceTooShort { .. }
            | PolyDataError::ValueCountMismatch { .. }
            | PolyDataError::InvalidName { .. }
            | PolyDataError::ValueNotRepresentable { .. } => ErrorCategory::Validation,
            PolyDataError::Allocation { .. } => ErrorCategory::Allocation,
            PolyDataError::MalformedCells { .. } => ErrorCategory::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            PolyDataError::IndexOutOfRange { index: 3, len: 3 }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            PolyDataError::Allocation { count: 1 }.category(),
            ErrorCategory::Allocation
        );
        assert_eq!(
            PolyDataError::MalformedCells { offset: 0, len: 0 }.category(),
            ErrorCategory::Protocol
        );
    }

    #[test]
    fn test_error_messages() {
        let err = PolyDataError::DataTypeMismatch {
            stored: DataType::Float32,
            requested: DataType::Int16,
        };
        assert_eq!(
            err.to_string(),
            "attribute stores Float32 values, but Int16 values were requested"
        );
        let err = PolyDataError::InvalidAttributeType {
            kind_code: 0x05,
            data_type_code: 0,
            n_components: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid attribute type (kind code 0x05, data type code 0, 1 components)"
        );
    }
}
