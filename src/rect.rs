use crate::units::*;

/// A point on the page, measured in inches from the top-left corner with y
/// increasing downward.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: In,
    pub y: In,
}

impl Point {
    pub fn new(x: In, y: In) -> Point {
        Point { x, y }
    }
}

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x1: In,
    /// The y-coordinate of the top-left corner.
    pub y1: In,
    /// The x-coordinate of the bottom-right corner.
    pub x2: In,
    /// The y-coordinate of the bottom-right corner.
    pub y2: In,
}

impl Rect {
    /// Create a rectangle from its top-left corner and its size
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x1: In(x),
            y1: In(y),
            x2: In(x + width),
            y2: In(y + height),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn width(&self) -> In {
        self.x2 - self.x1
    }

    pub fn height(&self) -> In {
        self.y2 - self.y1
    }
}
