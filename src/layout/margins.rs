use crate::units::In;
use serde::Deserialize;

/// Page margins in inches. The body column sits between the left and right
/// margins; the address windows ignore margins entirely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: In,
    pub right: In,
    pub bottom: In,
    pub left: In,
}

impl Default for Margins {
    fn default() -> Self {
        Margins::all(In(1.25))
    }
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: In, right: In, bottom: In, left: In) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<In>>(value: D) -> Margins {
        let value: In = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: In, horizontal: In) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Width left for the body column on a page of the given width
    pub fn column_width(&self, page_width: In) -> In {
        page_width - self.left - self.right
    }
}
