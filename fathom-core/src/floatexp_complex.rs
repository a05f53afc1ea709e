//! Complex number over [`FloatExp`] components, for perturbation deltas
//! whose magnitude underflows native floats.

use crate::FloatExp;
use std::fmt;
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatExpComplex {
    pub re: FloatExp,
    pub im: FloatExp,
}

impl FloatExpComplex {
    pub fn new(re: FloatExp, im: FloatExp) -> Self {
        Self { re, im }
    }

    pub fn zero() -> Self {
        Self {
            re: FloatExp::zero(),
            im: FloatExp::zero(),
        }
    }

    pub fn from_f64_pair(re: f64, im: f64) -> Self {
        Self {
            re: FloatExp::from_f64(re),
            im: FloatExp::from_f64(im),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// z² = (a² − b²) + 2abi
    pub fn square(&self) -> Self {
        let re_sq = self.re * self.re;
        let im_sq = self.im * self.im;
        let cross = self.re * self.im;
        Self {
            re: re_sq - im_sq,
            im: cross + cross,
        }
    }

    /// |z|² in extended range.
    pub fn norm_sq(&self) -> FloatExp {
        self.re * self.re + self.im * self.im
    }
}

impl Add for FloatExpComplex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for FloatExpComplex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for FloatExpComplex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl fmt::Display for FloatExpComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} + {}i)", self.re, self.im)
    }
}
