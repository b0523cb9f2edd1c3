//! Univariate polynomials with exact rational coefficients.

use std::fmt::{Display, Formatter};

use rug::Integer;

use crate::domains::rational::Rational;

/// A polynomial stored as its coefficient vector, constant term first.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Polynomial {
    coefficients: Vec<Rational>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<Rational>) -> Polynomial {
        Polynomial { coefficients }
    }

    /// The coefficients in ascending powers of `x`.
    pub fn coefficients(&self) -> &[Rational] {
        &self.coefficients
    }

    /// Returns `true` if every coefficient has denominator 1.
    pub fn is_integral(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_integer())
    }

    /// Evaluate the polynomial at `x` using Horner's scheme.
    pub fn evaluate(&self, x: &Integer) -> Rational {
        let x = Rational::from(x);
        let mut res = Rational::zero();
        for c in self.coefficients.iter().rev() {
            res = &(&res * &x) + c;
        }
        res
    }
}

/// Prints the coefficients separated by a single space.
impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, c) in self.coefficients.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use super::Polynomial;
    use crate::domains::rational::Rational;

    #[test]
    fn evaluate() {
        // 1 + x + x^2
        let p = Polynomial::new(vec![Rational::one(); 3]);
        assert_eq!(p.evaluate(&Integer::from(3)), Rational::from(13));
        assert_eq!(p.evaluate(&Integer::from(-2)), Rational::from(3));
        assert!(p.is_integral());
        assert_eq!(p.to_string(), "1 1 1");
    }

    #[test]
    fn rational_coefficients() {
        let p = Polynomial::new(vec![Rational::new(1, 2).unwrap(), Rational::from(-3)]);
        assert!(!p.is_integral());
        assert_eq!(p.to_string(), "1/2 -3");
        assert_eq!(
            p.evaluate(&Integer::from(1)),
            Rational::new(-5, 2).unwrap()
        );
    }
}
