//! Extended non-negative reals `[0, ∞]`, the codomain of measures.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// A value in `[0, ∞]`.
///
/// Never negative and never NaN. Addition saturates at `∞` and multiplication
/// follows the measure-theoretic convention `0 · ∞ = 0`.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ENNReal(f64);

impl ENNReal {
    /// `0`.
    pub const ZERO: Self = Self(0.0);
    /// `1`.
    pub const ONE: Self = Self(1.0);
    /// `∞`.
    pub const INFINITY: Self = Self(f64::INFINITY);

    /// Create a value, rejecting negative numbers and NaN.
    pub fn new(value: f64) -> Result<Self, MeasureError> {
        if value.is_nan() || value < 0.0 {
            return Err(MeasureError::InvalidWeight { weight: value });
        }
        // Normalize -0.0.
        Ok(Self(value.max(0.0)))
    }

    /// Create a finite value, rejecting infinities as well.
    pub fn finite(value: f64) -> Result<Self, MeasureError> {
        if !value.is_finite() {
            return Err(MeasureError::InvalidWeight { weight: value });
        }
        Self::new(value)
    }

    /// Returns `true` unless this is `∞`.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Returns `true` for `∞`.
    #[inline]
    pub fn is_infinite(self) -> bool {
        !self.is_finite()
    }

    /// Returns `true` for `0`.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// The real value, with `∞` sent to `0`.
    #[inline]
    pub fn to_real(self) -> f64 {
        if self.is_finite() {
            self.0
        } else {
            0.0
        }
    }

    /// The raw value, `f64::INFINITY` for `∞`.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Product with `0 · ∞ = 0`.
    pub fn mul(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            Self::ZERO
        } else {
            Self(self.0 * other.0)
        }
    }

    /// Product with a non-negative real factor. A NaN factor counts as `∞`.
    pub fn mul_real(self, factor: f64) -> Self {
        debug_assert!(!(factor < 0.0), "negative factor {factor}");
        if factor.is_nan() {
            return self.mul(Self::INFINITY);
        }
        self.mul(Self(factor.max(0.0)))
    }

    /// Truncated subtraction, `max(self - other, 0)`; `∞ - ∞ = 0`.
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.is_infinite() {
            Self::ZERO
        } else {
            Self((self.0 - other.0).max(0.0))
        }
    }
}

impl Default for ENNReal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::ops::Add for ENNReal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for ENNReal {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for ENNReal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl PartialOrd for ENNReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl fmt::Debug for ENNReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "∞")
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

impl fmt::Display for ENNReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "∞")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl TryFrom<f64> for ENNReal {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ENNReal> for f64 {
    fn from(value: ENNReal) -> f64 {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(ENNReal::new(-1.0).is_err());
        assert!(ENNReal::new(f64::NAN).is_err());
        assert!(ENNReal::new(f64::INFINITY).is_ok());
        assert!(ENNReal::finite(f64::INFINITY).is_err());
    }

    #[test]
    fn test_to_real_sends_infinity_to_zero() {
        assert_eq!(ENNReal::INFINITY.to_real(), 0.0);
        assert_eq!(ENNReal::new(2.5).unwrap().to_real(), 2.5);
    }

    #[test]
    fn test_zero_times_infinity() {
        assert_eq!(ENNReal::ZERO.mul(ENNReal::INFINITY), ENNReal::ZERO);
        assert_eq!(ENNReal::INFINITY.mul_real(0.0), ENNReal::ZERO);
        assert!(ENNReal::ONE.mul(ENNReal::INFINITY).is_infinite());
    }

    #[test]
    fn test_sum_saturates() {
        let total: ENNReal = [ENNReal::ONE, ENNReal::INFINITY, ENNReal::ONE]
            .into_iter()
            .sum();
        assert!(total.is_infinite());
        assert_eq!(ENNReal::INFINITY.saturating_sub(ENNReal::INFINITY), ENNReal::ZERO);
    }

    #[test]
    fn test_ordering() {
        assert!(ENNReal::ONE < ENNReal::INFINITY);
        assert!(ENNReal::ZERO <= ENNReal::ONE);
    }
}
