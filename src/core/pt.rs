//! Checked 2D Vector
//!
//! Points and vectors share one type. Derived results come back as new
//! values (`plus`, `reflected`, `with_len`, ...); accumulation happens in
//! place (`add`, `reflect`, `set_len`, ...). Both forms have identical
//! semantics and every operation propagates [`NumericError`].
//!
//! ## Rescaling precision
//!
//! Length changes multiply by the target length before dividing by the
//! current one. The result is still truncated:
//! - coordinates ~10..100: under 8% relative error
//! - coordinates ~1 000..10 000: under 0.1% relative error

use std::fmt;
use serde::{Serialize, Deserialize};

use super::int::{Int, NumericError, NumericResult};

/// 2D point/vector with checked integer components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pt {
    /// X component
    pub x: Int,
    /// Y component
    pub y: Int,
}

impl Pt {
    /// Zero vector
    pub const ZERO: Self = Self { x: Int::ZERO, y: Int::ZERO };

    /// Create a new point from components.
    #[inline]
    pub const fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }

    /// Create a point from raw integers.
    #[inline]
    pub const fn from_ints(x: i64, y: i64) -> Self {
        Self {
            x: Int::new(x),
            y: Int::new(y),
        }
    }

    /// Add another vector.
    #[inline]
    pub fn plus(self, other: Self) -> NumericResult<Self> {
        Ok(Self {
            x: self.x.plus(other.x)?,
            y: self.y.plus(other.y)?,
        })
    }

    /// Subtract another vector.
    #[inline]
    pub fn minus(self, other: Self) -> NumericResult<Self> {
        Ok(Self {
            x: self.x.minus(other.x)?,
            y: self.y.minus(other.y)?,
        })
    }

    /// Multiply both components by a scalar.
    #[inline]
    pub fn times(self, multiply: Int) -> NumericResult<Self> {
        Ok(Self {
            x: self.x.times(multiply)?,
            y: self.y.times(multiply)?,
        })
    }

    /// Divide both components by a scalar.
    #[inline]
    pub fn div_by(self, divide: Int) -> NumericResult<Self> {
        Ok(Self {
            x: self.x.div_by(divide)?,
            y: self.y.div_by(divide)?,
        })
    }

    /// `x * multiply / divide` per component.
    #[inline]
    pub fn scaled(self, multiply: Int, divide: Int) -> NumericResult<Self> {
        Ok(Self {
            x: self.x.times(multiply)?.div_by(divide)?,
            y: self.y.times(multiply)?.div_by(divide)?,
        })
    }

    /// Vector from `self` to `other`.
    #[inline]
    pub fn to(self, other: Self) -> NumericResult<Self> {
        other.minus(self)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> NumericResult<Int> {
        self.x.times(other.x)?.plus(self.y.times(other.y)?)
    }

    /// Squared length.
    #[inline]
    pub fn squared_len(self) -> NumericResult<Int> {
        self.x.sqr()?.plus(self.y.sqr()?)
    }

    /// Length, truncated.
    #[inline]
    pub fn len(self) -> NumericResult<Int> {
        self.squared_len()?.sqrt()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn squared_dist_to(self, other: Self) -> NumericResult<Int> {
        self.to(other)?.squared_len()
    }

    /// Distance to another point, truncated.
    #[inline]
    pub fn dist_to(self, other: Self) -> NumericResult<Int> {
        self.to(other)?.len()
    }

    /// `self` reflected around `axis`. `axis` need not be normalized.
    ///
    /// `r = p - 2(p.â)â`. The dot product is multiplied out before dividing
    /// by the axis length, and so is the final projection, so the axis is
    /// never normalized on its own.
    pub fn reflected(self, axis: Self) -> NumericResult<Self> {
        let l = axis.len()?;
        let scaled_x = self.x.times(axis.x)?;
        if l.is_zero() {
            return Err(NumericError::DivisionByZero(scaled_x.to_i64()));
        }
        let dot_x = scaled_x.div_by(l)?;
        let dot_y = self.y.times(axis.y)?.div_by(l)?;
        let dot = dot_x.plus(dot_y)?;
        let projection = axis.times(dot.times(Int::TWO)?)?.div_by(l)?;
        self.minus(projection)
    }

    /// `self` rescaled to length `new_len`. A zero vector stays zero.
    pub fn with_len(self, new_len: Int) -> NumericResult<Self> {
        let old_len = self.len()?;
        if old_len.is_zero() {
            return Ok(self);
        }
        self.scaled(new_len, old_len)
    }

    /// `self` rescaled to `len + extra_len`.
    ///
    /// When the new length would be zero or negative the vector is returned
    /// unchanged, not zeroed.
    pub fn with_added_len(self, extra_len: Int) -> NumericResult<Self> {
        let old_len = self.len()?;
        let new_len = old_len.plus(extra_len)?;
        if new_len.is_non_positive() {
            return Ok(self);
        }
        self.scaled(new_len, old_len)
    }

    // =========================================================================
    // IN-PLACE FORMS
    // =========================================================================

    /// `self += other`.
    #[inline]
    pub fn add(&mut self, other: Self) -> NumericResult<()> {
        *self = self.plus(other)?;
        Ok(())
    }

    /// `self -= other`.
    #[inline]
    pub fn subtract(&mut self, other: Self) -> NumericResult<()> {
        *self = self.minus(other)?;
        Ok(())
    }

    /// In-place [`Pt::scaled`].
    #[inline]
    pub fn scale(&mut self, multiply: Int, divide: Int) -> NumericResult<()> {
        *self = self.scaled(multiply, divide)?;
        Ok(())
    }

    /// In-place [`Pt::reflected`].
    pub fn reflect(&mut self, axis: Self) -> NumericResult<()> {
        *self = self.reflected(axis)?;
        Ok(())
    }

    /// In-place [`Pt::with_len`].
    pub fn set_len(&mut self, new_len: Int) -> NumericResult<()> {
        *self = self.with_len(new_len)?;
        Ok(())
    }

    /// In-place [`Pt::with_added_len`].
    pub fn add_len(&mut self, extra_len: Int) -> NumericResult<()> {
        *self = self.with_added_len(extra_len)?;
        Ok(())
    }
}

impl fmt::Debug for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Pt {
        Pt::from_ints(x, y)
    }

    /// Relative error in percent between the requested and obtained length.
    fn len_error_percent(v: Pt, wanted: i64) -> f64 {
        let got = v.len().unwrap().to_i64() as f64;
        ((got - wanted as f64).abs() / wanted as f64) * 100.0
    }

    #[test]
    fn test_pt_add() {
        let mut a = p(1, 2);
        a.add(p(3, 4)).unwrap();
        assert_eq!(a, p(4, 6));

        let mut b = p(1, 2);
        b.add(p(-3, -4)).unwrap();
        assert_eq!(b, p(-2, -2));
    }

    #[test]
    fn test_pt_arithmetic() {
        assert_eq!(p(5, 7).minus(p(2, 3)), Ok(p(3, 4)));
        assert_eq!(p(2, 3).times(Int::new(3)), Ok(p(6, 9)));
        assert_eq!(p(7, -7).div_by(Int::TWO), Ok(p(3, -3)));
        assert_eq!(p(1, 1).to(p(4, 5)), Ok(p(3, 4)));
        assert_eq!(p(2, 3).dot(p(4, 5)), Ok(Int::new(23)));
        assert!(p(i64::MAX, 0).plus(p(1, 0)).is_err());
    }

    #[test]
    fn test_pt_length() {
        assert_eq!(p(3, 4).squared_len(), Ok(Int::new(25)));
        assert_eq!(p(3, 4).len(), Ok(Int::new(5)));
        assert_eq!(p(0, 0).dist_to(p(3, 4)), Ok(Int::new(5)));
        assert_eq!(p(1, 1).squared_dist_to(p(4, 5)), Ok(Int::new(25)));
        assert!(p(i64::MAX, 0).squared_len().is_err());
    }

    #[test]
    fn test_pt_add_len_simple() {
        let mut v = p(1, 1);
        v.add_len(Int::ONE).unwrap();
        assert_eq!(v, p(2, 2));

        let mut v = p(100, 0);
        v.add_len(Int::new(20)).unwrap();
        assert_eq!(v, p(120, 0));

        let mut v = p(0, 13);
        v.add_len(Int::new(20)).unwrap();
        assert_eq!(v, p(0, 33));

        let mut v = p(800, 130);
        let old_len = v.len().unwrap();
        v.add_len(Int::new(54)).unwrap();
        assert_eq!(v.len(), old_len.plus(Int::new(54)));
    }

    #[test]
    fn test_pt_add_len_too_small_to_have_effect() {
        // |(800, 130)| = 810.49; no integer vector with this direction has
        // a truncated length of 811.
        let mut v = p(800, 130);
        let old_len = v.len().unwrap();
        v.add_len(Int::ONE).unwrap();
        assert_eq!(v.len(), Ok(old_len));
    }

    #[test]
    fn test_pt_add_len_non_positive_leaves_vector_unchanged() {
        let mut v = p(30, 40);
        v.add_len(Int::new(-50)).unwrap();
        assert_eq!(v, p(30, 40));

        let mut v = p(30, 40);
        v.add_len(Int::new(-80)).unwrap();
        assert_eq!(v, p(30, 40));

        // A small positive length is still applied.
        assert_eq!(p(30, 40).with_added_len(Int::new(-45)), Ok(p(3, 4)));
    }

    #[test]
    fn test_pt_set_len() {
        let mut v = p(3, 4);
        v.set_len(Int::new(10)).unwrap();
        assert_eq!(v, p(6, 8));

        let mut zero = Pt::ZERO;
        zero.set_len(Int::new(10)).unwrap();
        assert_eq!(zero, Pt::ZERO);

        assert_eq!(p(0, -7).with_len(Int::new(3)), Ok(p(0, -3)));
    }

    #[test]
    fn test_pt_set_len_error_tolerance() {
        let target = 100;
        let mut worst_small = 0.0f64;
        for x in 10..100 {
            for y in 10..100 {
                let v = p(x, y).with_len(Int::new(target)).unwrap();
                worst_small = worst_small.max(len_error_percent(v, target));
            }
        }
        assert!(worst_small < 8.0, "small vectors: {}%", worst_small);

        let target = 5000;
        let mut worst_large = 0.0f64;
        for x in (1000..10000).step_by(97) {
            for y in (1000..10000).step_by(89) {
                let v = p(x, y).with_len(Int::new(target)).unwrap();
                worst_large = worst_large.max(len_error_percent(v, target));
            }
        }
        assert!(worst_large < 0.1, "large vectors: {}%", worst_large);
    }

    #[test]
    fn test_pt_add_len_error_tolerance() {
        let extra = 100;
        let mut worst = 0.0f64;
        for x in 10..100 {
            for y in 10..100 {
                let v = p(x, y);
                let wanted = v.len().unwrap().to_i64() + extra;
                let grown = v.with_added_len(Int::new(extra)).unwrap();
                worst = worst.max(len_error_percent(grown, wanted));
            }
        }
        assert!(worst < 8.0, "small vectors: {}%", worst);
    }

    #[test]
    fn test_pt_reflect() {
        // Reflecting across the x axis flips the component along the axis.
        let mut v = p(10, 5);
        v.reflect(p(100, 0)).unwrap();
        assert_eq!(v, p(-10, 5));

        assert_eq!(p(10, 5).reflected(p(0, 3)), Ok(p(10, -5)));

        // Perpendicular to the axis: unchanged.
        assert_eq!(p(0, 7).reflected(p(5, 0)), Ok(p(0, 7)));

        // Diagonal axis, not normalized.
        let r = p(1000, 0).reflected(p(100, 100)).unwrap();
        assert!(r.x.to_i64().abs() <= 10, "{:?}", r);
        assert!((r.y.to_i64() + 1000).abs() <= 10, "{:?}", r);
    }

    #[test]
    fn test_pt_reflect_zero_axis_fails() {
        // The first division is `x * axis.x / |axis|`, whose dividend is 0.
        assert_eq!(p(7, 1).reflected(Pt::ZERO), Err(NumericError::DivisionByZero(0)));
        let mut v = p(7, 1);
        assert!(v.reflect(Pt::ZERO).is_err());
        assert_eq!(v, p(7, 1));
    }

    #[test]
    fn test_pt_pure_and_in_place_agree() {
        let base = p(321, -123);
        let axis = p(7, 3);

        let mut a = base;
        a.reflect(axis).unwrap();
        assert_eq!(Ok(a), base.reflected(axis));

        let mut b = base;
        b.set_len(Int::new(77)).unwrap();
        assert_eq!(Ok(b), base.with_len(Int::new(77)));

        let mut c = base;
        c.add_len(Int::new(-12)).unwrap();
        assert_eq!(Ok(c), base.with_added_len(Int::new(-12)));

        let mut d = base;
        d.scale(Int::new(3), Int::new(2)).unwrap();
        assert_eq!(Ok(d), base.scaled(Int::new(3), Int::new(2)));
    }
}
