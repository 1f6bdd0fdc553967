//! Overflow-Checked Integer Arithmetic
//!
//! Every value in the simulation is an [`Int`]: a 64-bit signed integer that
//! can only be combined through explicit checked operations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Int(i64)                                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  a.plus(b)?   a.minus(b)?   a.times(b)?   a.div_by(b)?      │
//! │  a.modulo(b)? a.sqrt()?     a.inc()?      a.dec()?          │
//! │  a.lt(b)      a.leq(b)      a.gt(b)       a.geq(b)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Int` implements neither the arithmetic operators nor `PartialOrd`, so
//! every arithmetic site goes through a check. Overflow, division by zero
//! and negative square roots come back as a [`NumericError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arithmetic failures. Each variant carries the operands involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumericError {
    /// `a + b` outside the i64 range.
    #[error("addition overflow: {0} {1}")]
    AdditionOverflow(i64, i64),

    /// `a - b` outside the i64 range.
    #[error("subtraction overflow: {0} {1}")]
    SubtractionOverflow(i64, i64),

    /// `a * b` outside the i64 range.
    #[error("multiplication overflow: {0} {1}")]
    MultiplicationOverflow(i64, i64),

    /// Division or modulo by zero.
    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),

    /// `i64::MIN / -1`.
    #[error("division overflow: {0} / {1}")]
    DivisionOverflow(i64, i64),

    /// Square root of a negative number.
    #[error("square root of negative number: {0}")]
    NegativeSqrt(i64),

    /// Negation or absolute value of `i64::MIN`.
    #[error("negation overflow: {0}")]
    NegationOverflow(i64),

    /// Increment past `i64::MAX`.
    #[error("increment overflow: {0}")]
    IncrementOverflow(i64),

    /// Decrement past `i64::MIN`.
    #[error("decrement overflow: {0}")]
    DecrementOverflow(i64),

    /// Value does not fit the requested target type.
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// Offending value.
        value: i64,
        /// Name of the target type.
        target: &'static str,
    },
}

/// Result alias for checked arithmetic.
pub type NumericResult<T> = Result<T, NumericError>;

/// Overflow-checked 64-bit signed integer.
///
/// Serializes as a plain little-endian `i64` (8 bytes under bincode).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Int(i64);

impl Int {
    /// 0
    pub const ZERO: Self = Self(0);
    /// 1
    pub const ONE: Self = Self(1);
    /// 2
    pub const TWO: Self = Self(2);
    /// Largest representable value.
    pub const MAX: Self = Self(i64::MAX);
    /// Smallest representable value.
    pub const MIN: Self = Self(i64::MIN);

    /// Wrap a raw value.
    #[inline]
    pub const fn new(val: i64) -> Self {
        Self(val)
    }

    /// Raw value.
    #[inline]
    pub const fn to_i64(self) -> i64 {
        self.0
    }

    /// Convert to a container index. Fails for negative values.
    #[inline]
    pub fn to_index(self) -> NumericResult<usize> {
        usize::try_from(self.0).map_err(|_| NumericError::OutOfRange {
            value: self.0,
            target: "usize",
        })
    }

    /// Convert from a container index.
    #[inline]
    pub fn from_index(index: usize) -> NumericResult<Self> {
        i64::try_from(index)
            .map(Self)
            .map_err(|_| NumericError::OutOfRange {
                value: i64::MAX,
                target: "i64",
            })
    }

    // =========================================================================
    // COMPARISONS
    // =========================================================================

    /// `self < other`
    #[inline]
    pub const fn lt(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// `self <= other`
    #[inline]
    pub const fn leq(self, other: Self) -> bool {
        self.0 <= other.0
    }

    /// `self > other`
    #[inline]
    pub const fn gt(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// `self >= other`
    #[inline]
    pub const fn geq(self, other: Self) -> bool {
        self.0 >= other.0
    }

    /// `self == other`
    #[inline]
    pub const fn eq(self, other: Self) -> bool {
        self.0 == other.0
    }

    /// `self != other`
    #[inline]
    pub const fn neq(self, other: Self) -> bool {
        self.0 != other.0
    }

    /// True if zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True if strictly above zero.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True if strictly below zero.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True if zero or above.
    #[inline]
    pub const fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    /// True if zero or below.
    #[inline]
    pub const fn is_non_positive(self) -> bool {
        self.0 <= 0
    }

    /// True if `self` lies in the closed interval spanned by the two bounds,
    /// which may be given in any order.
    pub fn between(self, bound1: Self, bound2: Self) -> bool {
        let (lo, hi) = min_max(bound1, bound2);
        self.geq(lo) && self.leq(hi)
    }

    /// Smaller of the two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.lt(other) {
            self
        } else {
            other
        }
    }

    /// Larger of the two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.lt(other) {
            other
        } else {
            self
        }
    }

    // =========================================================================
    // ARITHMETIC
    // =========================================================================

    /// `self + b`.
    ///
    /// Overflow is detected on the wrapped result: the sum moved up iff `b`
    /// is positive.
    #[inline]
    pub fn plus(self, b: Self) -> NumericResult<Self> {
        let c = self.0.wrapping_add(b.0);
        if (c > self.0) == (b.0 > 0) {
            Ok(Self(c))
        } else {
            Err(NumericError::AdditionOverflow(self.0, b.0))
        }
    }

    /// `self - b`.
    #[inline]
    pub fn minus(self, b: Self) -> NumericResult<Self> {
        let c = self.0.wrapping_sub(b.0);
        if (c < self.0) == (b.0 > 0) {
            Ok(Self(c))
        } else {
            Err(NumericError::SubtractionOverflow(self.0, b.0))
        }
    }

    /// `self * b`.
    ///
    /// The wrapped product is accepted only if its sign is consistent with
    /// the operands and dividing it by `b` gives back `self`.
    #[inline]
    pub fn times(self, b: Self) -> NumericResult<Self> {
        if self.0 == 0 || b.0 == 0 {
            return Ok(Self::ZERO);
        }

        let c = self.0.wrapping_mul(b.0);
        let sign_ok = (c < 0) == ((self.0 < 0) != (b.0 < 0));
        if sign_ok && c.wrapping_div(b.0) == self.0 {
            Ok(Self(c))
        } else {
            Err(NumericError::MultiplicationOverflow(self.0, b.0))
        }
    }

    /// `self / b`, truncating toward zero.
    #[inline]
    pub fn div_by(self, b: Self) -> NumericResult<Self> {
        if b.0 == 0 {
            return Err(NumericError::DivisionByZero(self.0));
        }
        if self.0 == i64::MIN && b.0 == -1 {
            return Err(NumericError::DivisionOverflow(self.0, b.0));
        }
        Ok(Self(self.0 / b.0))
    }

    /// `self % b`; the result takes the sign of `self`.
    #[inline]
    pub fn modulo(self, b: Self) -> NumericResult<Self> {
        if b.0 == 0 {
            return Err(NumericError::DivisionByZero(self.0));
        }
        // i64::MIN % -1 is mathematically 0 but traps in hardware.
        Ok(Self(self.0.wrapping_rem(b.0)))
    }

    /// `self * self`.
    #[inline]
    pub fn sqr(self) -> NumericResult<Self> {
        self.times(self)
    }

    /// Floor of the square root, computed with integers only.
    ///
    /// `sqrt(8) == 2`, `sqrt(9) == 3`.
    pub fn sqrt(self) -> NumericResult<Self> {
        if self.0 < 0 {
            return Err(NumericError::NegativeSqrt(self.0));
        }
        Ok(Self(isqrt(self.0 as u64) as i64))
    }

    /// `-self`.
    #[inline]
    pub fn negative(self) -> NumericResult<Self> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or(NumericError::NegationOverflow(self.0))
    }

    /// `|self|`.
    #[inline]
    pub fn abs(self) -> NumericResult<Self> {
        if self.0 < 0 {
            self.negative()
        } else {
            Ok(self)
        }
    }

    /// One step further from zero (`0` counts as positive).
    pub fn enlarged_by_one(self) -> NumericResult<Self> {
        let mut v = self;
        v.enlarge_by_one()?;
        Ok(v)
    }

    // =========================================================================
    // IN-PLACE FORMS
    // =========================================================================

    /// `self += b`.
    #[inline]
    pub fn add(&mut self, b: Self) -> NumericResult<()> {
        *self = self.plus(b)?;
        Ok(())
    }

    /// `self -= b`.
    #[inline]
    pub fn subtract(&mut self, b: Self) -> NumericResult<()> {
        *self = self.minus(b)?;
        Ok(())
    }

    /// `self += 1`, failing at `i64::MAX`.
    #[inline]
    pub fn inc(&mut self) -> NumericResult<()> {
        if self.0 == i64::MAX {
            return Err(NumericError::IncrementOverflow(self.0));
        }
        self.0 += 1;
        Ok(())
    }

    /// `self -= 1`, failing at `i64::MIN`.
    #[inline]
    pub fn dec(&mut self) -> NumericResult<()> {
        if self.0 == i64::MIN {
            return Err(NumericError::DecrementOverflow(self.0));
        }
        self.0 -= 1;
        Ok(())
    }

    /// `inc()` for non-negative values, `dec()` for negative ones.
    pub fn enlarge_by_one(&mut self) -> NumericResult<()> {
        if self.0 >= 0 {
            self.inc()
        } else {
            self.dec()
        }
    }
}

/// Returns `(min, max)` of the two values.
#[inline]
pub fn min_max(a: Int, b: Int) -> (Int, Int) {
    if a.lt(b) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Bit-pair integer square root, floor of the real root.
///
/// `one` starts at the highest power of four not above the input and walks
/// down two bits at a time; the result fits in 32 bits for any `u64` input.
fn isqrt(a: u64) -> u32 {
    let mut op = a;
    let mut res: u64 = 0;
    let mut one: u64 = 1 << 62;

    while one > op {
        one >>= 2;
    }

    while one != 0 {
        if op >= res + one {
            op -= res + one;
            res += 2 * one;
        }
        res >>= 1;
        one >>= 2;
    }
    res as u32
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int({})", self.0)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
