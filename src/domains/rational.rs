use std::{
    borrow::Cow,
    fmt::{Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
};

use rug::{Integer, Rational as ArbitraryPrecisionRational};

/// A division by a zero-valued fraction, or a fraction with a zero denominator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DivisionByZero;

impl Display for DivisionByZero {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("division by zero")
    }
}

impl std::error::Error for DivisionByZero {}

/// An exact fraction in lowest terms with a positive denominator.
///
/// A value whose numerator and denominator both fit in an `i64` is always
/// stored as `Natural`, so that structurally equal values are numerically equal
/// and vice versa. Zero is `Natural(0, 1)`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Rational {
    Natural(i64, i64),
    Large(ArbitraryPrecisionRational),
}

fn gcd_signed_i128(mut a: i128, mut b: i128) -> u128 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i128::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

impl Rational {
    /// Create the fraction `num/den` in lowest terms.
    pub fn new(
        num: impl Into<Integer>,
        den: impl Into<Integer>,
    ) -> Result<Rational, DivisionByZero> {
        let den = den.into();
        if den == 0 {
            return Err(DivisionByZero);
        }

        Ok(Rational::from_large(ArbitraryPrecisionRational::from((
            num.into(),
            den,
        ))))
    }

    pub fn zero() -> Rational {
        Rational::Natural(0, 1)
    }

    pub fn one() -> Rational {
        Rational::Natural(1, 1)
    }

    /// Normalize `num/den`. Both arguments are products or sums of at most two
    /// `i64` products, so negation cannot overflow.
    fn from_i128(num: i128, den: i128) -> Rational {
        debug_assert!(den != 0);

        let (mut num, mut den) = if den < 0 { (-num, -den) } else { (num, den) };
        if num == 0 {
            return Rational::Natural(0, 1);
        }

        let g = gcd_signed_i128(num, den) as i128;
        if g != 1 {
            num /= g;
            den /= g;
        }

        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(n), Ok(d)) => Rational::Natural(n, d),
            _ => Rational::Large(ArbitraryPrecisionRational::from((
                Integer::from(num),
                Integer::from(den),
            ))),
        }
    }

    /// Downcast to `Natural` whenever possible.
    fn from_large(r: ArbitraryPrecisionRational) -> Rational {
        match (r.numer().to_i64(), r.denom().to_i64()) {
            (Some(n), Some(d)) => Rational::Natural(n, d),
            _ => Rational::Large(r),
        }
    }

    fn to_large(&self) -> Cow<'_, ArbitraryPrecisionRational> {
        match self {
            Rational::Natural(n, d) => Cow::Owned(ArbitraryPrecisionRational::from((*n, *d))),
            Rational::Large(r) => Cow::Borrowed(r),
        }
    }

    pub fn numerator(&self) -> Integer {
        match self {
            Rational::Natural(n, _) => Integer::from(*n),
            Rational::Large(r) => r.numer().clone(),
        }
    }

    pub fn denominator(&self) -> Integer {
        match self {
            Rational::Natural(_, d) => Integer::from(*d),
            Rational::Large(r) => r.denom().clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Rational::Natural(n, _) => *n == 0,
            Rational::Large(r) => *r.numer() == 0,
        }
    }

    /// Returns `true` if the denominator is 1.
    pub fn is_integer(&self) -> bool {
        match self {
            Rational::Natural(_, d) => *d == 1,
            Rational::Large(r) => *r.denom() == 1,
        }
    }

    /// Compute `self / rhs`.
    pub fn checked_div(&self, rhs: &Rational) -> Result<Rational, DivisionByZero> {
        if rhs.is_zero() {
            return Err(DivisionByZero);
        }

        Ok(match (self, rhs) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                Rational::from_i128(*n1 as i128 * *d2 as i128, *d1 as i128 * *n2 as i128)
            }
            _ => Rational::from_large(ArbitraryPrecisionRational::from(
                &*self.to_large() / &*rhs.to_large(),
            )),
        })
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::Natural(n, 1)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Rational::Natural(n as i64, 1)
    }
}

impl From<&Integer> for Rational {
    fn from(n: &Integer) -> Self {
        match n.to_i64() {
            Some(n) => Rational::Natural(n, 1),
            None => Rational::Large(ArbitraryPrecisionRational::from(n)),
        }
    }
}

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        match n.to_i64() {
            Some(n) => Rational::Natural(n, 1),
            None => Rational::Large(ArbitraryPrecisionRational::from(n)),
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rational::Natural(n, d) => {
                if *d == 1 {
                    write!(f, "{}", n)
                } else {
                    write!(f, "{}/{}", n, d)
                }
            }
            Rational::Large(r) => Display::fmt(r, f),
        }
    }
}

impl<'a, 'b> Add<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'b Rational) -> Rational {
        match (self, rhs) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                if d1 == d2 {
                    Rational::from_i128(*n1 as i128 + *n2 as i128, *d1 as i128)
                } else {
                    Rational::from_i128(
                        *n1 as i128 * *d2 as i128 + *n2 as i128 * *d1 as i128,
                        *d1 as i128 * *d2 as i128,
                    )
                }
            }
            _ => Rational::from_large(ArbitraryPrecisionRational::from(
                &*self.to_large() + &*rhs.to_large(),
            )),
        }
    }
}

impl<'a, 'b> Sub<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'b Rational) -> Rational {
        match (self, rhs) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                if d1 == d2 {
                    Rational::from_i128(*n1 as i128 - *n2 as i128, *d1 as i128)
                } else {
                    Rational::from_i128(
                        *n1 as i128 * *d2 as i128 - *n2 as i128 * *d1 as i128,
                        *d1 as i128 * *d2 as i128,
                    )
                }
            }
            _ => Rational::from_large(ArbitraryPrecisionRational::from(
                &*self.to_large() - &*rhs.to_large(),
            )),
        }
    }
}

impl<'a, 'b> Mul<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'b Rational) -> Rational {
        match (self, rhs) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                Rational::from_i128(*n1 as i128 * *n2 as i128, *d1 as i128 * *d2 as i128)
            }
            _ => Rational::from_large(ArbitraryPrecisionRational::from(
                &*self.to_large() * &*rhs.to_large(),
            )),
        }
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        &self + &rhs
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        &self - &rhs
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        &self * &rhs
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        match self {
            Rational::Natural(n, d) => match n.checked_neg() {
                Some(neg) => Rational::Natural(neg, *d),
                None => Rational::from_large(-ArbitraryPrecisionRational::from((*n, *d))),
            },
            Rational::Large(r) => Rational::from_large(ArbitraryPrecisionRational::from(-r)),
        }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}
