//! Text output of a reconstruction.
//!
//! An integer result is printed as one line of coefficients in ascending
//! powers. A rational fallback is printed as the line [`RATIONAL_MARKER`]
//! followed by the coefficient line, with non-integers written as `N/D`.

use std::fmt::{Display, Formatter};

use crate::reconstruct::{Reconstruction, ReconstructionKind};

/// The line that precedes the coefficients of a rational fallback result.
pub const RATIONAL_MARKER: &str = "RATIONAL_SOLUTION";

/// Prints a [`Reconstruction`] without a trailing newline.
pub struct ReconstructionPrinter<'a> {
    reconstruction: &'a Reconstruction,
}

impl<'a> ReconstructionPrinter<'a> {
    pub fn new(reconstruction: &'a Reconstruction) -> ReconstructionPrinter<'a> {
        ReconstructionPrinter { reconstruction }
    }
}

impl<'a> Display for ReconstructionPrinter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reconstruction.kind {
            ReconstructionKind::Integer => write!(f, "{}", self.reconstruction.polynomial),
            ReconstructionKind::RationalFallback => write!(
                f,
                "{}\n{}",
                RATIONAL_MARKER, self.reconstruction.polynomial
            ),
        }
    }
}

impl Display for Reconstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        ReconstructionPrinter::new(self).fmt(f)
    }
}
