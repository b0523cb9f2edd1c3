use rug::Integer;
use tracing::trace;

use crate::{
    domains::rational::Rational,
    error::ReconstructionError,
    points::Point,
    poly::Polynomial,
    tensors::matrix::{Matrix, MatrixError},
};

/// Find the polynomial of degree `points.len() - 1` through `points` by
/// solving the Vandermonde system
///
/// ```text
/// | 1  x_0  x_0^2 ... | | c_0 |   | y_0 |
/// | 1  x_1  x_1^2 ... | | c_1 | = | y_1 |
/// | ...               | | ... |   | ... |
/// ```
///
/// over the rationals. Returns `None` if the system is singular, which is the
/// case exactly when two points share an x-coordinate.
pub fn solve_vandermonde(points: &[&Point]) -> Result<Option<Polynomial>, ReconstructionError> {
    let k = points.len() as u32;

    let mut m = Matrix::new(k, k + 1);
    for (i, p) in points.iter().enumerate() {
        let i = i as u32;
        let mut power = Integer::from(1);
        for j in 0..k {
            m[(i, j)] = Rational::from(&power);
            power *= &p.x;
        }
        m[(i, k)] = Rational::from(&p.y);
    }

    match m.solve_augmented() {
        Ok(c) => Ok(Some(Polynomial::new(c))),
        Err(MatrixError::Singular { column }) => {
            trace!("Singular Vandermonde system: no pivot in column {}", column);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
