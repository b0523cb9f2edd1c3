use std::{
    fmt::{Display, Write},
    ops::{Index, IndexMut},
    slice::Chunks,
};

use smallvec::SmallVec;

use crate::domains::rational::{DivisionByZero, Rational};

/// A dense matrix of exact rationals, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) data: SmallVec<[Rational; 25]>,
}

impl Matrix {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32) -> Matrix {
        Matrix {
            nrows,
            ncols,
            data: (0..nrows as usize * ncols as usize)
                .map(|_| Rational::zero())
                .collect(),
        }
    }

    /// Create a matrix from a list of rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<Rational>>) -> Option<Matrix> {
        let nrows = rows.len() as u32;
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        if rows.iter().any(|r| r.len() as u32 != ncols) {
            return None;
        }

        Some(Matrix {
            nrows,
            ncols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn row_iter(&self) -> Chunks<'_, Rational> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Swap rows `r1` and `r2`.
    pub fn swap_rows(&mut self, r1: u32, r2: u32) {
        if r1 == r2 {
            return;
        }

        for c in 0..self.ncols {
            self.data
                .swap((r1 * self.ncols + c) as usize, (r2 * self.ncols + c) as usize);
        }
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = Rational;

    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    fn index_mut(&mut self, index: (u32, u32)) -> &mut Rational {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (ri, r) in self.row_iter().enumerate() {
            f.write_char('{')?;
            for (ci, c) in r.iter().enumerate() {
                write!(f, "{}", c)?;
                if ci + 1 < self.ncols as usize {
                    f.write_char(',')?;
                }
            }
            f.write_char('}')?;
            if ri + 1 < self.nrows as usize {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

/// Error from the linear solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// No row at or below the diagonal has a non-zero entry in `column`.
    Singular { column: u32 },
    ShapeMismatch,
    DivideByZero,
}

impl From<DivisionByZero> for MatrixError {
    fn from(_: DivisionByZero) -> Self {
        MatrixError::DivideByZero
    }
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::Singular { column } => {
                write!(f, "The matrix is singular: no pivot in column {}", column)
            }
            MatrixError::ShapeMismatch => write!(f, "The shape of the matrix is not compatible"),
            MatrixError::DivideByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for MatrixError {}

impl Matrix {
    /// Bring the first `max_col` columns into row echelon form with unit
    /// pivots. The remaining columns are augmented.
    ///
    /// The pivot for column `c` is the topmost row at or below `c` with a non-zero
    /// entry, so repeated calls on the same matrix pick the same pivots.
    pub fn row_reduce_unit(&mut self, max_col: u32) -> Result<(), MatrixError> {
        if max_col > self.nrows || max_col > self.ncols {
            return Err(MatrixError::ShapeMismatch);
        }

        for c in 0..max_col {
            let pivot = (c..self.nrows)
                .find(|&r| !self[(r, c)].is_zero())
                .ok_or(MatrixError::Singular { column: c })?;
            self.swap_rows(c, pivot);

            let pv = self[(c, c)].clone();
            if pv != Rational::one() {
                for j in c..self.ncols {
                    self[(c, j)] = self[(c, j)].checked_div(&pv)?;
                }
            }

            for r in c + 1..self.nrows {
                if self[(r, c)].is_zero() {
                    continue;
                }

                let factor = self[(r, c)].clone();
                for j in c..self.ncols {
                    let e = &self[(r, j)] - &(&factor * &self[(c, j)]);
                    self[(r, j)] = e;
                }
            }
        }

        Ok(())
    }

    /// Solve the square system whose augmented matrix is `self`, i.e. the last
    /// column holds the right-hand side.
    pub fn solve_augmented(mut self) -> Result<Vec<Rational>, MatrixError> {
        if self.ncols != self.nrows + 1 {
            return Err(MatrixError::ShapeMismatch);
        }

        let n = self.nrows;
        self.row_reduce_unit(n)?;

        // back substitution, the pivots are 1
        let mut sol = vec![Rational::zero(); n as usize];
        for i in (0..n).rev() {
            let mut acc = self[(i, n)].clone();
            for j in i + 1..n {
                if !self[(i, j)].is_zero() {
                    acc = &acc - &(&self[(i, j)] * &sol[j as usize]);
                }
            }
            sol[i as usize] = acc;
        }

        Ok(sol)
    }
}
