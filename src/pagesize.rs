//! The physical paper the letter is printed on.
//!
//! Letters are always laid out on US Letter paper in portrait orientation, folded
//! in thirds for a #10 envelope. Sizes are `(width, height)` in inches.

use crate::units::*;

/// Page dimensions as (width, height) in inches.
pub type PageSize = (In, In);

pub const LETTER: PageSize = (In(8.5), In(11.0));

/// Page dimensions converted to points, as expected by PDF media boxes
pub fn in_points(size: PageSize) -> (Pt, Pt) {
    (size.0.into(), size.1.into())
}
