//! Extended-range floating point for perturbation arithmetic.
//!
//! FloatExp = f64 mantissa + i64 exponent, providing unlimited range with
//! 53-bit precision. Perturbation deltas at extreme zoom depths span far
//! more orders of magnitude than an f64 exponent can hold; FloatExp keeps
//! them representable while staying much cheaper than fixed-point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Exponent gap beyond which the smaller operand of an addition is below
/// the last significant bit of the larger and cannot affect the result.
const NEGLIGIBLE_EXP_GAP: i64 = 54;

/// Extended-range floating point: f64 mantissa + i64 exponent.
/// Value = mantissa × 2^exp (or 0 if mantissa == 0).
/// Mantissa magnitude normalized to [1, 2) for non-zero values;
/// the canonical zero has exponent 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatExp {
    mantissa: f64,
    exp: i64,
}

impl FloatExp {
    /// Zero value.
    pub fn zero() -> Self {
        Self {
            mantissa: 0.0,
            exp: 0,
        }
    }

    /// Create from mantissa and binary exponent (normalizes automatically).
    pub fn new(mantissa: f64, exp: i64) -> Self {
        Self { mantissa, exp }.normalized()
    }

    /// Create from f64 (exponent 0, then normalized).
    pub fn from_f64(val: f64) -> Self {
        Self::new(val, 0)
    }

    /// Normalized mantissa, magnitude in [1, 2) for non-zero values.
    pub fn mantissa(&self) -> f64 {
        self.mantissa
    }

    /// Binary exponent.
    pub fn exp(&self) -> i64 {
        self.exp
    }

    /// Check if zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    /// Fold the mantissa's binary order of magnitude into the exponent.
    fn normalized(mut self) -> Self {
        if self.mantissa == 0.0 {
            self.exp = 0;
            return self;
        }
        // frexp yields a mantissa in [0.5, 1); double it so ours sits in [1, 2).
        let (m, e) = libm::frexp(self.mantissa);
        self.mantissa = 2.0 * m;
        self.exp += e as i64 - 1;
        self
    }

    /// Convert to f64 (overflows to ±inf / underflows to 0 for extreme exponents).
    pub fn to_f64(&self) -> f64 {
        if self.mantissa == 0.0 {
            return 0.0;
        }
        if self.exp > 1023 {
            return if self.mantissa > 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        if self.exp < -1074 {
            return 0.0;
        }
        libm::ldexp(self.mantissa, self.exp as i32)
    }
}

impl Mul for FloatExp {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.mantissa * rhs.mantissa, self.exp + rhs.exp)
    }
}

impl Div for FloatExp {
    type Output = Self;

    /// Division by a zero mantissa propagates IEEE inf/NaN.
    fn div(self, rhs: Self) -> Self {
        Self::new(self.mantissa / rhs.mantissa, self.exp - rhs.exp)
    }
}

impl Add for FloatExp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        // The exponent of a canonical zero carries no magnitude information;
        // it must not win the gap comparison below.
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }

        let gap = self.exp - rhs.exp;

        // The smaller operand is provably negligible at 53-bit precision.
        if gap > NEGLIGIBLE_EXP_GAP {
            return self;
        }
        if gap < -NEGLIGIBLE_EXP_GAP {
            return rhs;
        }

        // Align the smaller operand's mantissa under the larger exponent.
        if gap >= 0 {
            Self::new(
                self.mantissa + libm::ldexp(rhs.mantissa, -gap as i32),
                self.exp,
            )
        } else {
            Self::new(
                rhs.mantissa + libm::ldexp(self.mantissa, gap as i32),
                rhs.exp,
            )
        }
    }
}

impl Neg for FloatExp {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            mantissa: -self.mantissa,
            exp: self.exp,
        }
    }
}

impl Sub for FloatExp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl fmt::Display for FloatExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} * 2^{}", self.mantissa, self.exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        let x = FloatExp::new(4.0, 2);
        assert_eq!(x.mantissa(), 1.0);
        assert_eq!(x.exp(), 4);
    }

    #[test]
    fn normalization_is_idempotent() {
        let values = [
            FloatExp::new(4.0, 2),
            FloatExp::new(-0.375, 10),
            FloatExp::from_f64(std::f64::consts::PI),
            FloatExp::zero(),
        ];
        for v in values {
            let renormalized = v.normalized();
            assert_eq!(v, renormalized, "normalizing twice changed {}", v);
            if !v.is_zero() {
                assert!(
                    (1.0..2.0).contains(&v.mantissa().abs()),
                    "mantissa {} out of [1, 2)",
                    v.mantissa()
                );
            }
        }
    }

    #[test]
    fn zero_is_canonical() {
        let z = FloatExp::new(0.0, 17);
        assert!(z.is_zero());
        assert_eq!(z.exp(), 0);
        assert_eq!(z.to_f64(), 0.0);
    }

    #[test]
    fn multiplication() {
        let a = FloatExp::new(2.0, 0);
        let b = FloatExp::new(3.0, 1);
        let result = a * b;
        assert_eq!(result.mantissa(), 1.5);
        assert_eq!(result.exp(), 3);
    }

    #[test]
    fn division() {
        let a = FloatExp::new(1.0, 4);
        let b = FloatExp::new(1.0, 3);
        let result = a / b;
        assert_eq!(result.mantissa(), 1.0);
        assert_eq!(result.exp(), 1);
    }

    #[test]
    fn addition() {
        let a = FloatExp::new(1.0, 4);
        let b = FloatExp::new(1.0, 2);
        let result = a + b;
        assert_eq!(result.mantissa(), 1.25);
        assert_eq!(result.exp(), 4);
    }

    #[test]
    fn negation() {
        let a = FloatExp::new(1.0, 2);
        let result = -a;
        assert_eq!(result.mantissa(), -1.0);
        assert_eq!(result.exp(), 2);
    }

    #[test]
    fn subtraction() {
        let a = FloatExp::new(1.0, 4);
        let b = FloatExp::new(1.0, 2);
        let result = a - b;
        assert_eq!(result.mantissa(), 1.5);
        assert_eq!(result.exp(), 3);
    }

    #[test]
    fn string_conversion() {
        let x = FloatExp::new(4.0, 2);
        assert_eq!(x.to_string(), "1.00 * 2^4");
    }

    #[test]
    fn addition_short_circuits_on_huge_exponent_gap() {
        let big = FloatExp::new(1.0, 100);
        let small = FloatExp::new(1.5, 0);
        assert_eq!(big + small, big);
        assert_eq!(small + big, big);
    }

    #[test]
    fn addition_with_zero_keeps_tiny_operand() {
        // A canonical zero has exponent 0; it must not shadow an operand
        // whose exponent is far below zero.
        let tiny = FloatExp::new(1.0, -500);
        assert_eq!(tiny + FloatExp::zero(), tiny);
        assert_eq!(FloatExp::zero() + tiny, tiny);
    }

    #[test]
    fn arithmetic_round_trips_through_f64() {
        let pairs = [(1.5, 2.25), (-3.0, 0.125), (1e10, -2.5e9)];
        for (a, b) in pairs {
            let sum = (FloatExp::from_f64(a) + FloatExp::from_f64(b)).to_f64();
            assert!(
                (sum - (a + b)).abs() <= 1e-12 * (a + b).abs().max(1.0),
                "{} + {} gave {}",
                a,
                b,
                sum
            );
        }
    }

    #[test]
    fn to_f64_saturates_outside_native_range() {
        assert_eq!(FloatExp::new(1.0, 2000).to_f64(), f64::INFINITY);
        assert_eq!(FloatExp::new(-1.0, 2000).to_f64(), f64::NEG_INFINITY);
        assert_eq!(FloatExp::new(1.0, -2000).to_f64(), 0.0);
    }

    #[test]
    fn products_survive_beyond_f64_underflow() {
        // (1×2^-600)² = 1×2^-1200, representable here but not in f64.
        let tiny = FloatExp::new(1.0, -600);
        let sq = tiny * tiny;
        assert_eq!(sq.mantissa(), 1.0);
        assert_eq!(sq.exp(), -1200);
    }
}
