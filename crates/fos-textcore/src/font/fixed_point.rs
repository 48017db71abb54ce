//! Fixed-Point Arithmetic
//!
//! Advance widths and the kerning scale are stored with 4 fractional bits.

use std::cmp::Ordering;
use std::ops::{Add, Mul};

/// 12.4 fixed-point number held in an `i32`
///
/// - upper bits: integer part
/// - 4 bits: fractional part, precision of 1/16
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Fixed4(i32);

impl Fixed4 {
    pub const FRAC_BITS: u32 = 4;
    pub const SCALE: i32 = 1 << Self::FRAC_BITS;

    pub const ZERO: Fixed4 = Fixed4(0);
    pub const ONE: Fixed4 = Fixed4(Self::SCALE);
    pub const HALF: Fixed4 = Fixed4(Self::SCALE / 2);

    /// Create from raw bits
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Get raw bits
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Create from integer
    #[inline]
    pub const fn from_i32(value: i32) -> Self {
        Self(value << Self::FRAC_BITS)
    }

    /// Convert to integer (floor)
    #[inline]
    pub const fn to_i32(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Convert to integer, halves rounding up
    #[inline]
    pub const fn round(self) -> i32 {
        (self.0 + Self::HALF.0) >> Self::FRAC_BITS
    }
}

impl Add for Fixed4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul for Fixed4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let result = (self.0 as i64 * rhs.0 as i64) >> Self::FRAC_BITS;
        Self(result as i32)
    }
}

impl PartialOrd for Fixed4 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fixed4 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
