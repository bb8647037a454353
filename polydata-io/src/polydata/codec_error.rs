use thiserror::Error;

/// Errors raised while sizing, packing or unpacking POLYDATA content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("payload is truncated: {section} needs {required} bytes at offset {offset}, but only {available} bytes are left")]
    Truncated {
        section: &'static str,
        offset: usize,
        required: usize,
        available: usize,
    },
    #[error("malformed POLYDATA header: {0}")]
    MalformedHeader(String),
    #[error("could not allocate {bytes} bytes for {section}")]
    Allocation { section: &'static str, bytes: usize },
    #[error("{section} holds {actual} bytes, but {expected} bytes were expected")]
    SizeMismatch {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("value {value} of {field} does not fit into its wire field")]
    FieldOverflow { field: &'static str, value: usize },
}
