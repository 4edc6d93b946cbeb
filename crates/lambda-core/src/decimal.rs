// SPDX-License-Identifier: Apache-2.0

//! Arbitrary-precision decimal arithmetic.
//!
//! An `int` that overflows 32 bits is promoted to a boxed `DECIMAL` rather
//! than wrapping or panicking (spec §4.1). `Decimal` is a scaled big integer
//! (`mantissa * 10^-scale`), and [`DecimalContext`] controls the rounding
//! scale used when two decimals of different scale are combined.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// An arbitrary-precision decimal: `mantissa * 10^-scale`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    /// Construct a decimal from a mantissa and scale directly.
    #[must_use]
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Promote a plain integer to a zero-scale decimal.
    ///
    /// This is the path a 32-bit `int` overflow takes (spec §4.1, §8
    /// boundary behavior: `INT32_MAX + 1` yields a `DECIMAL` equal in value).
    #[must_use]
    pub fn from_i64(v: i64) -> Self {
        Self { mantissa: BigInt::from(v), scale: 0 }
    }

    /// Parse a decimal literal such as `"12.340"`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        let scale = frac_part.len() as u32;
        let joined = format!("{int_part}{frac_part}");
        let mantissa: BigInt = joined.parse().ok()?;
        Some(Self { mantissa, scale })
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub const fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Rescale to (at least) `target_scale`, padding with trailing zeros.
    #[must_use]
    fn rescaled(&self, target_scale: u32) -> BigInt {
        if target_scale <= self.scale {
            self.mantissa.clone()
        } else {
            let factor = BigInt::from(10u32).pow(target_scale - self.scale);
            &self.mantissa * factor
        }
    }

    fn align(a: &Self, b: &Self) -> (BigInt, BigInt, u32) {
        let scale = a.scale.max(b.scale);
        (a.rescaled(scale), b.rescaled(scale), scale)
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (a, b, scale) = Self::align(self, other);
        Self { mantissa: a + b, scale }
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let (a, b, scale) = Self::align(self, other);
        Self { mantissa: a - b, scale }
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self { mantissa: &self.mantissa * &other.mantissa, scale: self.scale + other.scale }
    }

    /// Divide using the context's configured result scale.
    #[must_use]
    pub fn div(&self, other: &Self, ctx: &DecimalContext) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let target_scale = ctx.division_scale;
        // Scale the dividend up so the integer division keeps `target_scale`
        // fractional digits of precision: (a * 10^(target+b.scale-a.scale)) / b.mantissa
        let shift = i64::from(target_scale) + i64::from(other.scale) - i64::from(self.scale);
        let numerator = if shift >= 0 {
            &self.mantissa * BigInt::from(10u32).pow(shift as u32)
        } else {
            self.mantissa.clone() / BigInt::from(10u32).pow((-shift) as u32)
        };
        Some(Self { mantissa: numerator / &other.mantissa, scale: target_scale })
    }

    #[must_use]
    pub fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        let (a, b, _) = Self::align(self, other);
        a.cmp(&b)
    }

    /// Best-effort conversion to `f64`, for interop with the `FLOAT` tag.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        let mantissa = self.mantissa.to_f64()?;
        Some(mantissa / 10f64.powi(self.scale as i32))
    }
}

impl core::fmt::Display for Decimal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
        } else {
            digits
        };
        let split_at = padded.len() - scale;
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        write!(f, "{sign}{}.{}", &padded[..split_at], &padded[split_at..])
    }
}

/// Rounding/precision policy shared by every `decimal` operation in a run.
#[derive(Clone, Copy, Debug)]
pub struct DecimalContext {
    /// Fractional digits kept by [`Decimal::div`].
    pub division_scale: u32,
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self { division_scale: 20 }
    }
}

#[cfg(test)]
mod decimal_test {
    use super::{Decimal, DecimalContext};

    #[test]
    fn int32_overflow_promotes_to_equal_value_decimal() {
        let a = Decimal::from_i64(2_000_000_000);
        let b = Decimal::from_i64(2_000_000_000);
        let sum = a.add(&b);
        assert_eq!(sum.to_string(), "4000000000");
    }

    #[test]
    fn parse_and_display_round_trip() {
        let d = Decimal::parse("12.340").unwrap();
        assert_eq!(d.scale(), 3);
        assert_eq!(d.to_string(), "12.340");
    }

    #[test]
    fn add_aligns_scales() {
        let a = Decimal::parse("1.5").unwrap();
        let b = Decimal::parse("0.25").unwrap();
        assert_eq!(a.add(&b).to_string(), "1.75");
    }

    #[test]
    fn div_by_zero_is_none() {
        let a = Decimal::from_i64(1);
        let z = Decimal::from_i64(0);
        assert!(a.div(&z, &DecimalContext::default()).is_none());
    }

    #[test]
    fn div_produces_configured_scale() {
        let a = Decimal::from_i64(10);
        let b = Decimal::from_i64(3);
        let ctx = DecimalContext { division_scale: 4 };
        let q = a.div(&b, &ctx).unwrap();
        assert_eq!(q.to_string(), "3.3333");
    }

    #[test]
    fn negative_display() {
        let d = Decimal::parse("-0.5").unwrap();
        assert_eq!(d.to_string(), "-0.5");
    }
}
