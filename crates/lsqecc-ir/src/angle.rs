//! Exact rotation angles in units of π.

use std::fmt;
use std::ops::Neg;

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A rotation amount, stored as an exact rational multiple of π.
///
/// A rotation block with angle `a` over Pauli product `P` denotes the unitary
/// `exp(-i·aπ·P)`. The basic rotation set is `±1/2`, `±1/4` and `±1/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(Ratio<i64>);

impl Angle {
    /// Create the angle `numer/denom · π`.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero. Use [`Angle::try_new`] for untrusted input.
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(Ratio::new(numer, denom))
    }

    /// Create an angle, rejecting a zero denominator.
    pub fn try_new(numer: i64, denom: i64) -> IrResult<Self> {
        if denom == 0 {
            return Err(IrError::ZeroDenominator);
        }
        Ok(Self::new(numer, denom))
    }

    /// The angle `π/denom`.
    pub fn pi_over(denom: i64) -> Self {
        Self::new(1, denom)
    }

    /// The zero angle.
    pub fn zero() -> Self {
        Self(Ratio::from_integer(0))
    }

    /// The underlying ratio.
    pub fn ratio(&self) -> Ratio<i64> {
        self.0
    }

    /// Numerator in lowest terms.
    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    /// Denominator in lowest terms, always positive.
    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    /// Check if the angle is zero.
    pub fn is_zero(&self) -> bool {
        self.numer() == 0
    }

    /// Check if the angle is negative.
    pub fn is_negative(&self) -> bool {
        self.numer() < 0
    }

    /// The absolute value of the angle.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(if self.is_negative() { -self.0 } else { self.0 })
    }

    /// Check if the angle is `±1/4`, a Clifford π/4 rotation.
    pub fn is_quarter(&self) -> bool {
        self.abs() == Self::pi_over(4)
    }

    /// Check if the angle is `±1/2`, a Pauli rotation.
    pub fn is_half(&self) -> bool {
        self.abs() == Self::pi_over(2)
    }

    /// Check if the angle is `±1/8`, a magic-state rotation.
    pub fn is_eighth(&self) -> bool {
        self.abs() == Self::pi_over(8)
    }

    /// Check if the angle belongs to the basic rotation set.
    pub fn is_basic(&self) -> bool {
        self.is_half() || self.is_quarter() || self.is_eighth()
    }

    /// Reduce modulo 2, into `[0, 2)`.
    ///
    /// When the denominator exceeds `2^62` the `[0, 2)` numerator may not fit
    /// in `i64`; such angles are reduced into `(-2, 0)` instead, which is still
    /// a unique representative per residue class.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let (numer, denom) = (self.numer(), self.denom());
        if let Some(period) = denom.checked_mul(2) {
            return Self::new(numer.rem_euclid(period), denom);
        }
        let period = 2 * i128::from(denom);
        let reduced = i128::from(numer).rem_euclid(period);
        let numer = i64::try_from(reduced)
            .or_else(|_| i64::try_from(reduced - period))
            .unwrap_or(numer);
        Self::new(numer, denom)
    }

    /// The exponent `d` if the denominator is `2^d`.
    pub fn dyadic_exponent(&self) -> Option<u32> {
        let denom = self.denom();
        (denom > 0 && denom & (denom - 1) == 0).then(|| denom.trailing_zeros())
    }

    /// Split a dyadic angle into a sum of positive terms `1/2^k`.
    ///
    /// The angle is first reduced modulo 2. The term `1` (a rotation by π, a
    /// global phase on a Pauli product) and the zero angle are dropped. Terms
    /// are returned largest first. Returns `None` for non-dyadic angles.
    pub fn dyadic_terms(&self) -> Option<Vec<Angle>> {
        let exponent = self.dyadic_exponent()?;
        let reduced = self.normalized();
        let numer = reduced.numer();
        let denom = reduced.denom();
        let terms = (0..=exponent)
            .rev()
            .filter(|bit| numer & (1 << bit) != 0)
            .map(|bit| Angle::new(1 << bit, denom))
            .filter(|term| *term != Angle::new(1, 1))
            .collect();
        Some(terms)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl From<Ratio<i64>> for Angle {
    fn from(ratio: Ratio<i64>) -> Self {
        Self(ratio)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Angle::new(-1, 4).is_quarter());
        assert!(Angle::new(2, 4).is_half());
        assert!(Angle::pi_over(8).is_eighth());
        assert!(!Angle::pi_over(16).is_basic());
        assert!(Angle::new(-3, 6).is_half());
    }

    #[test]
    fn test_normalized() {
        assert_eq!(Angle::new(-1, 4).normalized(), Angle::new(7, 4));
        assert_eq!(Angle::new(9, 4).normalized(), Angle::new(1, 4));
        assert_eq!(Angle::new(2, 1).normalized(), Angle::zero());
    }

    #[test]
    fn test_normalized_large_denominator() {
        let finest = 1_i64 << 62;
        assert_eq!(
            Angle::new(-1, finest).normalized(),
            Angle::new(i64::MAX, finest)
        );
        assert_eq!(
            Angle::new(1, i64::MAX).normalized(),
            Angle::new(1, i64::MAX)
        );
        // 2·d - 1 does not fit, the negative representative is kept
        assert_eq!(
            Angle::new(-1, i64::MAX).normalized(),
            Angle::new(-1, i64::MAX)
        );
        assert_eq!(
            Angle::new(-1, finest).dyadic_terms().map(|terms| terms.len()),
            Some(62)
        );
    }

    #[test]
    fn test_dyadic_exponent() {
        assert_eq!(Angle::new(3, 8).dyadic_exponent(), Some(3));
        assert_eq!(Angle::new(2, 1).dyadic_exponent(), Some(0));
        assert_eq!(Angle::new(1, 3).dyadic_exponent(), None);
        assert_eq!(Angle::new(1, 12).dyadic_exponent(), None);
    }

    #[test]
    fn test_dyadic_terms() {
        assert_eq!(
            Angle::new(3, 8).dyadic_terms(),
            Some(vec![Angle::new(1, 4), Angle::new(1, 8)])
        );
        // 7/4 = 1 + 1/2 + 1/4, the π term is a global phase.
        assert_eq!(
            Angle::new(-1, 4).dyadic_terms(),
            Some(vec![Angle::new(1, 2), Angle::new(1, 4)])
        );
        assert_eq!(Angle::new(1, 1).dyadic_terms(), Some(vec![]));
        assert_eq!(Angle::zero().dyadic_terms(), Some(vec![]));
        assert_eq!(Angle::new(1, 5).dyadic_terms(), None);
    }

    #[test]
    fn test_try_new() {
        assert!(Angle::try_new(1, 0).is_err());
        assert_eq!(Angle::try_new(2, 8).ok(), Some(Angle::pi_over(4)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Angle::new(-1, 8).to_string(), "-1/8");
        assert_eq!(Angle::new(2, 2).to_string(), "1");
    }
}
