use std::fmt::{Display, Formatter};

use crate::{domains::rational::DivisionByZero, tensors::matrix::MatrixError};

/// Error produced while building a point set or reconstructing a polynomial.
#[derive(Debug)]
pub enum ReconstructionError {
    /// A required field is missing or a field could not be decoded.
    MalformedInput(String),
    /// A fraction with a zero denominator was requested.
    DivideByZero,
    /// Fewer than `required` points were supplied.
    InsufficientPoints { required: usize, available: usize },
    /// Fewer than `required` points with pairwise distinct x-coordinates exist.
    InsufficientDistinctX { required: usize, distinct: usize },
    /// The fallback subset produced a singular system.
    UnsolvableSystem,
    /// The input could not be read.
    Io(std::io::Error),
}

impl ReconstructionError {
    pub fn malformed(msg: impl Into<String>) -> ReconstructionError {
        ReconstructionError::MalformedInput(msg.into())
    }

    /// The process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReconstructionError::MalformedInput(_) => 1,
            ReconstructionError::InsufficientPoints { .. } => 2,
            ReconstructionError::UnsolvableSystem => 3,
            ReconstructionError::InsufficientDistinctX { .. } => 4,
            ReconstructionError::DivideByZero => 70,
            ReconstructionError::Io(_) => 74,
        }
    }
}

impl Display for ReconstructionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconstructionError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            ReconstructionError::DivideByZero => write!(f, "Division by zero"),
            ReconstructionError::InsufficientPoints {
                required,
                available,
            } => write!(
                f,
                "Not enough points to determine polynomial: need {}, got {}",
                required, available
            ),
            ReconstructionError::InsufficientDistinctX { required, distinct } => write!(
                f,
                "Not enough points with distinct x-coordinates: need {}, got {}",
                required, distinct
            ),
            ReconstructionError::UnsolvableSystem => {
                write!(f, "Could not solve the Vandermonde system for any subset")
            }
            ReconstructionError::Io(e) => write!(f, "Could not read input: {}", e),
        }
    }
}

impl std::error::Error for ReconstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconstructionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReconstructionError {
    fn from(e: std::io::Error) -> Self {
        ReconstructionError::Io(e)
    }
}

impl From<DivisionByZero> for ReconstructionError {
    fn from(_: DivisionByZero) -> Self {
        ReconstructionError::DivideByZero
    }
}

impl From<MatrixError> for ReconstructionError {
    fn from(e: MatrixError) -> Self {
        match e {
            MatrixError::DivideByZero => ReconstructionError::DivideByZero,
            MatrixError::Singular { .. } | MatrixError::ShapeMismatch => {
                ReconstructionError::UnsolvableSystem
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::ReconstructionError;
    use crate::tensors::matrix::MatrixError;

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            ReconstructionError::malformed("missing keys"),
            ReconstructionError::DivideByZero,
            ReconstructionError::InsufficientPoints {
                required: 3,
                available: 2,
            },
            ReconstructionError::InsufficientDistinctX {
                required: 3,
                distinct: 2,
            },
            ReconstructionError::UnsolvableSystem,
            ReconstructionError::Io(std::io::Error::new(std::io::ErrorKind::Other, "closed")),
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn matrix_errors() {
        assert!(matches!(
            ReconstructionError::from(MatrixError::Singular { column: 1 }),
            ReconstructionError::UnsolvableSystem
        ));
        assert!(matches!(
            ReconstructionError::from(MatrixError::DivideByZero),
            ReconstructionError::DivideByZero
        ));
        assert_eq!(
            ReconstructionError::InsufficientPoints {
                required: 3,
                available: 1
            }
            .to_string(),
            "Not enough points to determine polynomial: need 3, got 1"
        );
    }
}
