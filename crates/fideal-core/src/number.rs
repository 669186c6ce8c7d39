//! Wrapper type around `rug::Rational` with a guaranteed `Hash` implementation.
//!
//! This newtype ensures the hash-consing invariant holds: `a == b` implies
//! `hash(a) == hash(b)`.

use rug::integer::Order;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arbitrary-precision rational: the exact field ℚ.
///
/// `rug::Rational` always reduces to lowest terms on construction, so
/// structural equality of the wrapped value coincides with mathematical
/// equality, and hashing the canonical numerator/denominator bytes is safe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Q(pub rug::Rational);

impl Hash for Q {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let numer = self.0.numer();
        let denom = self.0.denom();
        numer.to_digits::<u8>(Order::Msf).hash(state);
        numer.cmp0().hash(state);
        denom.to_digits::<u8>(Order::Msf).hash(state);
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Q {
    fn from(val: i64) -> Self {
        Q(rug::Rational::from(val))
    }
}

impl From<(i64, i64)> for Q {
    fn from((num, den): (i64, i64)) -> Self {
        Q(rug::Rational::from((
            rug::Integer::from(num),
            rug::Integer::from(den),
        )))
    }
}

impl From<rug::Rational> for Q {
    fn from(val: rug::Rational) -> Self {
        Q(val)
    }
}

impl From<rug::Integer> for Q {
    fn from(val: rug::Integer) -> Self {
        Q(rug::Rational::from(val))
    }
}

impl Add for Q {
    type Output = Q;
    fn add(self, rhs: Q) -> Q {
        Q(rug::Rational::from(&self.0 + &rhs.0))
    }
}

impl<'a> Add<&'a Q> for &'a Q {
    type Output = Q;
    fn add(self, rhs: &'a Q) -> Q {
        Q(rug::Rational::from(&self.0 + &rhs.0))
    }
}

impl Sub for Q {
    type Output = Q;
    fn sub(self, rhs: Q) -> Q {
        Q(rug::Rational::from(&self.0 - &rhs.0))
    }
}

impl<'a> Sub<&'a Q> for &'a Q {
    type Output = Q;
    fn sub(self, rhs: &'a Q) -> Q {
        Q(rug::Rational::from(&self.0 - &rhs.0))
    }
}

impl Mul for Q {
    type Output = Q;
    fn mul(self, rhs: Q) -> Q {
        Q(rug::Rational::from(&self.0 * &rhs.0))
    }
}

impl<'a> Mul<&'a Q> for &'a Q {
    type Output = Q;
    fn mul(self, rhs: &'a Q) -> Q {
        Q(rug::Rational::from(&self.0 * &rhs.0))
    }
}

impl Div for Q {
    type Output = Q;
    /// Panics if the divisor is zero -- a zero leading coefficient is an
    /// arena-contract violation, never a value callers should pass here.
    fn div(self, rhs: Q) -> Q {
        assert!(rhs.0.cmp0() != Ordering::Equal, "Q division by zero");
        Q(rug::Rational::from(&self.0 / &rhs.0))
    }
}

impl<'a> Div<&'a Q> for &'a Q {
    type Output = Q;
    fn div(self, rhs: &'a Q) -> Q {
        assert!(rhs.0.cmp0() != Ordering::Equal, "Q division by zero");
        Q(rug::Rational::from(&self.0 / &rhs.0))
    }
}

impl Neg for Q {
    type Output = Q;
    fn neg(self) -> Q {
        Q(rug::Rational::from(-&self.0))
    }
}

impl Q {
    pub fn zero() -> Self {
        Q(rug::Rational::from(0))
    }

    pub fn one() -> Self {
        Q(rug::Rational::from(1))
    }

    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    pub fn is_one(&self) -> bool {
        self.0 == rug::Rational::from(1)
    }

    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }

    pub fn recip(&self) -> Q {
        assert!(!self.is_zero(), "Q reciprocal of zero");
        Q(rug::Rational::from(self.0.recip_ref()))
    }

    pub fn numer(&self) -> &rug::Integer {
        self.0.numer()
    }

    pub fn denom(&self) -> &rug::Integer {
        self.0.denom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(val: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        val.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn hash_invariant_under_reduction() {
        let a = Q::from((6i64, 4i64));
        let b = Q::from((3i64, 2i64));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn arithmetic() {
        let half = Q::from((1i64, 2i64));
        let third = Q::from((1i64, 3i64));
        assert_eq!(half.clone() + third.clone(), Q::from((5i64, 6i64)));
        assert_eq!(half.clone() - third.clone(), Q::from((1i64, 6i64)));
        assert_eq!(half.clone() * third.clone(), Q::from((1i64, 6i64)));
        assert_eq!(half.recip(), Q::from(2i64));
    }

    #[test]
    fn zero_and_one() {
        assert!(Q::zero().is_zero());
        assert!(Q::one().is_one());
        assert!(!Q::from(-3i64).is_zero());
        assert!(Q::from(-3i64).is_negative());
    }
}
