//! Complex number over [`FixedDecimal`] components.
//!
//! Used only where full precision is unavoidable: reference-orbit
//! computation and pixel-delta mapping at extreme zoom. Conversions to the
//! cheaper layers are explicit; this type never mixes silently with them.

use crate::{Complex, FixedDecimal, FloatExpComplex, NumericError};

#[derive(Clone, Debug, PartialEq)]
pub struct FixedComplex {
    pub re: FixedDecimal,
    pub im: FixedDecimal,
}

impl FixedComplex {
    pub fn new(re: FixedDecimal, im: FixedDecimal) -> Self {
        Self { re, im }
    }

    pub fn zero() -> Self {
        Self {
            re: FixedDecimal::zero(),
            im: FixedDecimal::zero(),
        }
    }

    /// Parse both components from decimal literals.
    pub fn parse(re: &str, im: &str) -> Result<Self, NumericError> {
        Ok(Self {
            re: FixedDecimal::parse(re)?,
            im: FixedDecimal::parse(im)?,
        })
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    /// z² = (a² − b²) + 2abi
    pub fn square(&self) -> Self {
        let re_sq = self.re.mul(&self.re);
        let im_sq = self.im.mul(&self.im);
        let cross = self.re.mul(&self.im);
        Self {
            re: re_sq.sub(&im_sq),
            im: cross.add(&cross),
        }
    }

    /// |z|²
    pub fn norm_sq(&self) -> FixedDecimal {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }

    /// Lossy downcast to native precision. Only valid for values within
    /// native float range; anything finer than ~16 digits is dropped.
    pub fn to_complex(&self) -> Complex {
        Complex::new(self.re.to_f64(), self.im.to_f64())
    }

    /// Exact-exponent downcast for extreme-zoom deltas whose magnitude
    /// underflows f64.
    pub fn to_floatexp_complex(&self) -> FloatExpComplex {
        FloatExpComplex::new(self.re.to_floatexp(), self.im.to_floatexp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square() {
        // (1 + 2i)² = -3 + 4i
        let z = FixedComplex::parse("1", "2").unwrap();
        let sq = z.square();
        assert_eq!(sq.re, FixedDecimal::parse("-3").unwrap());
        assert_eq!(sq.im, FixedDecimal::parse("4").unwrap());
    }

    #[test]
    fn norm_sq() {
        let z = FixedComplex::parse("3", "4").unwrap();
        assert_eq!(z.norm_sq(), FixedDecimal::parse("25").unwrap());
    }

    #[test]
    fn downcast_to_native() {
        let z = FixedComplex::parse("-0.75", "0.1").unwrap();
        let native = z.to_complex();
        assert_eq!(native.re, -0.75);
        assert_eq!(native.im, 0.1);
    }

    #[test]
    fn downcast_to_floatexp_keeps_tiny_components() {
        let z = FixedComplex::parse("1e-320", "0").unwrap();
        let fe = z.to_floatexp_complex();
        assert!(!fe.re.is_zero());
        assert!(fe.im.is_zero());
    }
}
