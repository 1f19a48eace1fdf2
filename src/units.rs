//! Physical units used throughout the crate.
//!
//! Layout happens in inches ([`In`]) with the origin at the top-left of the page;
//! font sizes and stroke widths are expressed in points ([`Pt`]). Millimetres
//! ([`Mm`]) only show up in fold-mark styling.

use derive_more::{Add, AddAssign, Display, Div, From, Into, Mul, MulAssign, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f32 = 72.0;
pub const MM_PER_INCH: f32 = 25.4;

/// A length in PDF points (1/72 of an inch)
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, Mul,
    MulAssign, Div, Neg, Sum, From, Into, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pt(pub f32);

/// A length in inches
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, Mul,
    MulAssign, Div, Neg, Sum, From, Into, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct In(pub f32);

/// A length in millimetres
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, Mul,
    MulAssign, Div, Neg, Sum, From, Into, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * POINTS_PER_INCH)
    }
}

impl From<Pt> for In {
    fn from(value: Pt) -> Self {
        In(value.0 / POINTS_PER_INCH)
    }
}

impl From<Mm> for In {
    fn from(value: Mm) -> Self {
        In(value.0 / MM_PER_INCH)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

impl In {
    /// The larger of two lengths
    pub fn max(self, other: In) -> In {
        In(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: In) -> In {
        In(self.0.min(other.0))
    }
}

impl Pt {
    /// Convert to inches
    pub fn to_in(self) -> In {
        self.into()
    }
}
