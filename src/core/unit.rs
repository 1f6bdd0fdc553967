//! World Unit Scaling
//!
//! All distances in the simulation are integers, so the smallest possible
//! step is 1. To still move "less than one unit" per frame, distances are
//! expressed in subunits: one world unit is [`UNIT`] subunits.
//!
//! ## Choosing UNIT
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Three chained multiplications must stay below i64::MAX:   │
//! │      (range * UNIT)^3 <= 10^18   =>   range * UNIT <= 10^6  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UNIT = 100   =>  world coordinates in [-10 000, 10 000]    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::int::{Int, NumericResult};
use super::pt::Pt;

/// Subunits per world unit.
pub const UNIT: i64 = 100;

/// Subunits per world unit, as an [`Int`].
pub const UNIT_INT: Int = Int::new(UNIT);

const MILLI: Int = Int::new(1000);
const CENTI: Int = Int::new(100);

/// `n` world units in subunits.
#[inline]
pub fn units(n: Int) -> NumericResult<Int> {
    n.times(UNIT_INT)
}

/// `n` thousandths of a world unit in subunits.
///
/// Multiplies before dividing so precision is only lost once.
#[inline]
pub fn milliunits(n: Int) -> NumericResult<Int> {
    n.times(UNIT_INT)?.div_by(MILLI)
}

/// `n` hundredths of a world unit in subunits.
#[inline]
pub fn centiunits(n: Int) -> NumericResult<Int> {
    n.times(UNIT_INT)?.div_by(CENTI)
}

/// Shorthand for [`units`] on a raw integer.
#[inline]
pub fn u(n: i64) -> NumericResult<Int> {
    units(Int::new(n))
}

/// A point given in world units.
#[inline]
pub fn upt(x: i64, y: i64) -> NumericResult<Pt> {
    Ok(Pt::new(u(x)?, u(y)?))
}
