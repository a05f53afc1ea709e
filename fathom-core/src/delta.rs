//! Delta abstraction for perturbation arithmetic.
//!
//! One trait over the two delta representations (native f64 complex and
//! extended-exponent complex) lets a single generic perturbation loop
//! serve both deep render modes with zero runtime overhead.

use crate::{Complex, FloatExpComplex};

/// Complex number type usable as a perturbation delta.
pub trait ComplexDelta: Copy + Send + Sync {
    /// Additive identity.
    fn zero() -> Self;

    /// Construct from f64 real/imaginary components.
    fn from_f64_pair(re: f64, im: f64) -> Self;

    /// Extract as an f64 pair (lossy for extended-range values).
    fn to_f64_pair(&self) -> (f64, f64);

    /// Complex addition.
    fn add(&self, other: &Self) -> Self;

    /// Complex multiplication.
    fn mul(&self, other: &Self) -> Self;

    /// Complex square.
    fn square(&self) -> Self;

    /// Magnitude squared as f64, for escape and rebase checks. The values
    /// compared there include a reference-orbit point of ordinary size, so
    /// f64 range suffices even when the delta itself underflows.
    fn norm_sq(&self) -> f64;
}

impl ComplexDelta for Complex {
    #[inline]
    fn zero() -> Self {
        Complex::ZERO
    }

    #[inline]
    fn from_f64_pair(re: f64, im: f64) -> Self {
        Complex::new(re, im)
    }

    #[inline]
    fn to_f64_pair(&self) -> (f64, f64) {
        (self.re, self.im)
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        *self * *other
    }

    #[inline]
    fn square(&self) -> Self {
        Complex::square(self)
    }

    #[inline]
    fn norm_sq(&self) -> f64 {
        Complex::norm_sq(self)
    }
}

impl ComplexDelta for FloatExpComplex {
    #[inline]
    fn zero() -> Self {
        FloatExpComplex::zero()
    }

    #[inline]
    fn from_f64_pair(re: f64, im: f64) -> Self {
        FloatExpComplex::from_f64_pair(re, im)
    }

    #[inline]
    fn to_f64_pair(&self) -> (f64, f64) {
        (self.re.to_f64(), self.im.to_f64())
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        *self * *other
    }

    #[inline]
    fn square(&self) -> Self {
        FloatExpComplex::square(self)
    }

    #[inline]
    fn norm_sq(&self) -> f64 {
        FloatExpComplex::norm_sq(self).to_f64()
    }
}
