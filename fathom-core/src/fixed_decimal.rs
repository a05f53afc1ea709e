//! Arbitrary-precision fixed-point decimal.
//!
//! Every value is a signed big integer scaled by 10^[`PRECISION`], so all
//! values share one scale constant and arithmetic never needs to align
//! scales. Multiplication and division rescale through integer division,
//! truncating toward zero; the precision constant is chosen far larger
//! than any coordinate needs, so accumulated truncation stays harmless.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use dashu::base::{BitTest, Sign};
use dashu::integer::IBig;

use crate::{FloatExp, NumericError};

/// Decimal digits of fraction carried by every value.
pub const PRECISION: usize = 350;

/// The shared scale constant 10^PRECISION.
fn scale() -> &'static IBig {
    static SCALE: OnceLock<IBig> = OnceLock::new();
    SCALE.get_or_init(|| IBig::from(10u8).pow(PRECISION))
}

/// The scale constant as a FloatExp, for exact-exponent downcasts.
fn scale_floatexp() -> FloatExp {
    static SCALE_FE: OnceLock<FloatExp> = OnceLock::new();
    *SCALE_FE.get_or_init(|| floatexp_from_ibig(scale()))
}

/// Signed fixed-point decimal with [`PRECISION`] fraction digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FixedDecimal {
    // Comparison derives directly on the scaled integer.
    raw: IBig,
}

impl FixedDecimal {
    pub fn zero() -> Self {
        Self { raw: IBig::ZERO }
    }

    pub fn one() -> Self {
        Self {
            raw: scale().clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.raw == IBig::ZERO
    }

    /// Parse a decimal literal, optionally signed, optionally in
    /// `mantissa e exponent` scientific form (either exponent sign).
    ///
    /// Fraction digits beyond [`PRECISION`] are truncated, not rounded.
    pub fn parse(input: &str) -> Result<Self, NumericError> {
        let malformed = || NumericError::Parse(input.to_string());

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<i32>().map_err(|_| malformed())?),
            None => (unsigned, 0),
        };
        // An exponent this size could only describe a value the fixed scale
        // cannot distinguish from zero or overflow into absurd digit counts.
        if exponent.unsigned_abs() > 1_000_000 {
            return Err(malformed());
        }

        let (int_digits, frac_digits) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(malformed());
        }
        if !int_digits.chars().all(|c| c.is_ascii_digit())
            || !frac_digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(malformed());
        }

        // Shift the decimal point by the exponent over the raw digit string,
        // then split back into integer and fractional parts.
        let mut digits = format!("{int_digits}{frac_digits}");
        let mut point = int_digits.len() as i64 + exponent as i64;
        if point < 0 {
            digits.insert_str(0, &"0".repeat(-point as usize));
            point = 0;
        }
        if point as usize > digits.len() {
            digits.push_str(&"0".repeat(point as usize - digits.len()));
        }
        let (int_part, frac_part) = digits.split_at(point as usize);
        let frac_part = &frac_part[..frac_part.len().min(PRECISION)];

        let int_value = if int_part.is_empty() {
            IBig::ZERO
        } else {
            IBig::from_str(int_part).map_err(|_| malformed())?
        };
        let frac_value = if frac_part.is_empty() {
            IBig::ZERO
        } else {
            let parsed = IBig::from_str(frac_part).map_err(|_| malformed())?;
            parsed * IBig::from(10u8).pow(PRECISION - frac_part.len())
        };

        let mut raw = int_value * scale() + frac_value;
        if negative {
            raw = -raw;
        }
        Ok(Self { raw })
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            raw: &self.raw + &other.raw,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            raw: &self.raw - &other.raw,
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            raw: &self.raw * &other.raw / scale(),
        }
    }

    pub fn div(&self, other: &Self) -> Result<Self, NumericError> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self {
            raw: &self.raw * scale() / &other.raw,
        })
    }

    pub fn gt(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    pub fn lt(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Less
    }

    /// Convert from f64 by formatting and reparsing.
    ///
    /// Non-finite input maps to zero; finite input is exact up to the
    /// fixed truncation precision.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::zero();
        }
        // 340 fraction digits cover the smallest subnormal; the parser
        // truncates anything beyond PRECISION.
        let formatted = format!("{value:.340}");
        Self::parse(&formatted).expect("formatted f64 is a valid decimal literal")
    }

    /// Convert to f64 by stringifying and reparsing.
    ///
    /// Intentionally lossy; only valid for values within native range.
    pub fn to_f64(&self) -> f64 {
        self.to_string()
            .parse::<f64>()
            .expect("fixed-point decimal renders as a valid float literal")
    }

    /// Exact-exponent downcast to [`FloatExp`], keeping magnitudes that
    /// underflow f64. The top 53 bits of the scaled integer become the
    /// mantissa; the remainder becomes a binary shift.
    pub fn to_floatexp(&self) -> FloatExp {
        if self.is_zero() {
            return FloatExp::zero();
        }
        floatexp_from_ibig(&self.raw) / scale_floatexp()
    }
}

fn floatexp_from_ibig(value: &IBig) -> FloatExp {
    let (sign, magnitude) = value.clone().into_parts();
    let bits = magnitude.bit_len();
    if bits == 0 {
        return FloatExp::zero();
    }
    let (top, shift) = if bits <= 53 {
        (magnitude, 0usize)
    } else {
        (magnitude >> (bits - 53), bits - 53)
    };
    let top = u64::try_from(top).expect("top 53 bits fit in u64");
    let mantissa = match sign {
        Sign::Positive => top as f64,
        Sign::Negative => -(top as f64),
    };
    FloatExp::new(mantissa, shift as i64)
}

impl FromStr for FixedDecimal {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FixedDecimal {
    /// Renders sign, integer part, and exactly [`PRECISION`] fraction digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.raw < IBig::ZERO;
        let magnitude = if negative {
            -self.raw.clone()
        } else {
            self.raw.clone()
        };
        let int_part = &magnitude / scale();
        let frac_part = &magnitude % scale();
        let frac_digits = frac_part.to_string();
        write!(
            f,
            "{}{}.{:0>width$}",
            if negative { "-" } else { "" },
            int_part,
            frac_digits,
            width = PRECISION
        )
    }
}

impl serde::Serialize for FixedDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for FixedDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let text = "-0.00000000329004213";
        let value = FixedDecimal::parse(text).unwrap();
        let rendered = value.to_string();
        assert!(
            rendered.starts_with("-0.00000000329004213"),
            "got {rendered}"
        );
        assert_eq!(FixedDecimal::parse(&rendered).unwrap(), value);
    }

    #[test]
    fn scientific_notation_equals_plain_notation() {
        let sci = FixedDecimal::parse("1e20").unwrap();
        let plain = FixedDecimal::parse("100000000000000000000").unwrap();
        assert_eq!(sci, plain);
    }

    #[test]
    fn scientific_notation_with_fractional_mantissa() {
        assert_eq!(
            FixedDecimal::parse("1.5e3").unwrap(),
            FixedDecimal::parse("1500").unwrap()
        );
        // Exponent smaller than the mantissa's fraction length.
        assert_eq!(
            FixedDecimal::parse("1.234567e2").unwrap(),
            FixedDecimal::parse("123.4567").unwrap()
        );
    }

    #[test]
    fn scientific_notation_with_negative_exponent() {
        assert_eq!(
            FixedDecimal::parse("25e-3").unwrap(),
            FixedDecimal::parse("0.025").unwrap()
        );
        assert_eq!(
            FixedDecimal::parse("-1.5e-2").unwrap(),
            FixedDecimal::parse("-0.015").unwrap()
        );
    }

    #[test]
    fn fraction_digits_beyond_precision_are_truncated() {
        // A digit at position PRECISION + 1 must disappear, not round.
        let long = format!("0.{}9", "0".repeat(PRECISION));
        assert_eq!(FixedDecimal::parse(&long).unwrap(), FixedDecimal::zero());
    }

    #[test]
    fn malformed_literals_are_rejected() {
        for bad in ["", "-", "1.2.3", "abc", "1e", "0x10", "1e9999999999"] {
            assert!(
                matches!(FixedDecimal::parse(bad), Err(NumericError::Parse(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn arithmetic() {
        let half = FixedDecimal::parse("0.5").unwrap();
        let quarter = FixedDecimal::parse("0.25").unwrap();
        assert_eq!(half.add(&quarter), FixedDecimal::parse("0.75").unwrap());
        assert_eq!(half.sub(&quarter), quarter);
        assert_eq!(half.mul(&quarter), FixedDecimal::parse("0.125").unwrap());
        assert_eq!(
            half.div(&quarter).unwrap(),
            FixedDecimal::parse("2").unwrap()
        );
    }

    #[test]
    fn division_truncates_toward_zero() {
        let one = FixedDecimal::one();
        let three = FixedDecimal::parse("3").unwrap();
        let third = one.div(&three).unwrap();
        let rendered = third.to_string();
        assert!(rendered.starts_with("0.3333"), "got {rendered}");
        // Truncated, so 3 × (1/3) falls just short of 1.
        assert!(three.mul(&third).lt(&one));
    }

    #[test]
    fn division_by_zero_fails() {
        let one = FixedDecimal::one();
        assert_eq!(
            one.div(&FixedDecimal::zero()),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn comparison() {
        let a = FixedDecimal::parse("-1.5").unwrap();
        let b = FixedDecimal::parse("2.25").unwrap();
        assert!(a.lt(&b));
        assert!(b.gt(&a));
        assert!(!a.gt(&a));
    }

    #[test]
    fn f64_round_trip() {
        for v in [0.0, 1.5, -0.25, 100.0, -1e20, 3.0e-5] {
            let fixed = FixedDecimal::from_f64(v);
            assert_eq!(fixed.to_f64(), v, "round trip of {v}");
        }
    }

    #[test]
    fn from_f64_non_finite_is_zero() {
        assert_eq!(FixedDecimal::from_f64(f64::NAN), FixedDecimal::zero());
        assert_eq!(FixedDecimal::from_f64(f64::INFINITY), FixedDecimal::zero());
    }

    #[test]
    fn to_floatexp_matches_f64_in_native_range() {
        for v in [1.0, -2.5, 0.001, 12345.678] {
            let fe = FixedDecimal::from_f64(v).to_floatexp();
            assert!(
                (fe.to_f64() - v).abs() <= 1e-12 * v.abs(),
                "{} became {}",
                v,
                fe
            );
        }
        assert!(FixedDecimal::zero().to_floatexp().is_zero());
    }

    #[test]
    fn to_floatexp_survives_f64_underflow() {
        // 10^-320 binary exponent is about -320 × log2(10) ≈ -1063; a
        // further square would underflow f64, but not FloatExp.
        let tiny = FixedDecimal::parse("1e-320").unwrap();
        let fe = tiny.to_floatexp();
        assert!(!fe.is_zero());
        let expected_exp = (-320.0 * std::f64::consts::LOG2_10).floor() as i64;
        assert!(
            (fe.exp() - expected_exp).abs() <= 1,
            "exponent {} far from {}",
            fe.exp(),
            expected_exp
        );
    }
}
