//! Row validation error types

use std::fmt;

/// Why a single upload row could not become a [`Color`](super::Color)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Row does not have exactly the schema's column count
    Arity { expected: usize, found: usize },

    /// A column failed to coerce to its declared type
    Coercion { column: &'static str, value: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { expected, found } => {
                write!(f, "expected {} columns, found {}", expected, found)
            }
            Self::Coercion { column, value } => {
                write!(f, "column '{}' has invalid value '{}'", column, value)
            }
        }
    }
}

impl std::error::Error for RowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RowError::Arity {
            expected: 7,
            found: 5,
        };
        assert_eq!(err.to_string(), "expected 7 columns, found 5");

        let err = RowError::Coercion {
            column: "green",
            value: "lots".into(),
        };
        assert_eq!(err.to_string(), "column 'green' has invalid value 'lots'");
    }
}
