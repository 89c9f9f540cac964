//! Errors raised while loading problem data.

use std::fmt;

/// The error type for building an evaluator's immutable problem data.
///
/// Loading is all-or-nothing: any of these aborts construction, so no
/// partially valid evaluator can exist.
#[derive(Debug)]
pub enum InstanceError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input ended before every expected value was read.
    UnexpectedEof {
        /// What was being read when the input ran out.
        expected: &'static str,
    },
    /// A token could not be parsed as a number.
    Parse {
        /// The offending token.
        token: String,
        /// What was being read.
        expected: &'static str,
    },
    /// A sizing parameter that must be positive is zero.
    EmptyDimension(&'static str),
    /// A vector or matrix does not match the declared sizing.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A declared matrix has more cells than `usize` can count.
    Overflow(&'static str),
    /// A matrix entry is NaN or infinite.
    NonFinite {
        what: &'static str,
        row: usize,
        col: usize,
    },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Io(e) => write!(f, "I/O error: {e}"),
            InstanceError::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input while reading {expected}")
            }
            InstanceError::Parse { token, expected } => {
                write!(f, "could not parse token {token:?} as {expected}")
            }
            InstanceError::EmptyDimension(name) => write!(f, "{name} must be positive"),
            InstanceError::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected {expected} entries, got {actual}"),
            InstanceError::Overflow(what) => write!(f, "{what} size overflows usize"),
            InstanceError::NonFinite { what, row, col } => {
                write!(f, "{what}[{row}][{col}] is not finite")
            }
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceError {
    fn from(e: std::io::Error) -> Self {
        InstanceError::Io(e)
    }
}
