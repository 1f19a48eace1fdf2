//! Physical geometry of the sheet and the #10 double-window envelope.
//!
//! All coordinates are in inches from the top-left corner of an 8.5in × 11in
//! sheet, with y growing downward. The window rectangles are where the two
//! address panels of a #10 double-window envelope land once the sheet is folded
//! in thirds, so they are constants and never move with margins or fonts.

use crate::formatting::{DateAlignment, FormattingSpec};
use crate::pagesize::{PageSize, LETTER};
use crate::rect::{Point, Rect};
use crate::units::*;

/// The sheet every letter is printed on
pub const PAGE: PageSize = LETTER;

/// Outer size of a #10 envelope, (width, height)
pub const ENVELOPE: (In, In) = (In(9.5), In(4.125));

/// Where the return address shows through: (0.5, 0.625), 3.5in × 1.0in
pub const RETURN_WINDOW: Rect = Rect {
    x1: In(0.5),
    y1: In(0.625),
    x2: In(4.0),
    y2: In(1.625),
};

/// Where the recipient address shows through: (0.75, 2.0625), 4.0in × 1.125in
pub const RECIPIENT_WINDOW: Rect = Rect {
    x1: In(0.75),
    y1: In(2.0625),
    x2: In(4.75),
    y2: In(3.1875),
};

/// Top of the page 1 header band. Its baseline lands about half an inch down.
pub const FIRST_PAGE_HEADER_TOP: In = In(0.375);

/// Tri-fold positions, measured from the top of the sheet
pub const DEFAULT_FOLD_OFFSETS: [In; 2] = [In(3.67), In(7.33)];

/// Single-spaced leading used for address blocks and other fixed text
pub const FIXED_LINE_SPACING: f32 = 1.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Something the resolver knows how to place
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Placement {
    /// Top-left of the return address block
    ReturnWindow,
    /// Top-left of the recipient address block
    RecipientWindow,
    /// Top-left of the date line; `width` is the measured width of the date
    Date { width: In },
    /// Top-left of the body column, below `reserved` inches of fixed blocks
    /// (subject and salutation on page 1, the header band afterwards)
    Body { reserved: In },
    /// Top-left of the header band
    Header,
    /// Top-left of the optional page 1 header, above the return window
    FirstPageHeader,
    /// Top-left of the footer band, which is `height` tall
    Footer { height: In },
    /// Start of a fold mark of the given length, `inset` from the page edge
    FoldMark {
        offset: In,
        side: Side,
        length: In,
        inset: In,
    },
}

/// Map a placement request to absolute page coordinates
pub fn resolve(placement: Placement, page: usize, formatting: &FormattingSpec) -> Point {
    let margins = &formatting.margins;
    let (page_width, page_height) = PAGE;

    match placement {
        Placement::ReturnWindow => RETURN_WINDOW.origin(),
        Placement::RecipientWindow => RECIPIENT_WINDOW.origin(),
        Placement::Date { width } => {
            let position = &formatting.date_position;
            let x = match position.alignment {
                DateAlignment::Left => position.x,
                DateAlignment::Center => (page_width - width) / 2.0,
                DateAlignment::Right => RECIPIENT_WINDOW.x2 - width,
            };
            Point::new(x, position.y)
        }
        Placement::Body { reserved } => Point::new(margins.left, body_top(page, formatting) + reserved),
        Placement::Header => Point::new(margins.left, margins.top),
        Placement::FirstPageHeader => Point::new(margins.left, FIRST_PAGE_HEADER_TOP),
        Placement::Footer { height } => Point::new(margins.left, page_height - margins.bottom - height),
        Placement::FoldMark {
            offset,
            side,
            length,
            inset,
        } => match side {
            Side::Left => Point::new(inset, offset),
            Side::Right => Point::new(page_width - inset - length, offset),
        },
    }
}

/// Where flowing content may start on a page before anything is reserved.
/// Page 1 starts no higher than the configured body start, below the windows.
pub fn body_top(page: usize, formatting: &FormattingSpec) -> In {
    let top = formatting.margins.top;
    if page == 1 {
        formatting.body_start.max(top)
    } else {
        top
    }
}

/// Height between the top and bottom margins
pub fn content_height(formatting: &FormattingSpec) -> In {
    PAGE.1 - formatting.margins.top - formatting.margins.bottom
}

/// Largest font size, no bigger than `size`, at which `lines` lines fit inside
/// `window`, given the `leading` of one line at `size`. Leading is assumed to
/// scale with the font size; only the height is considered. Returns the size
/// and the leading at that size.
pub fn fit_font_size(lines: usize, window: &Rect, size: Pt, leading: Pt) -> (Pt, Pt) {
    if lines == 0 || leading.0 <= 0.0 {
        return (size, leading);
    }
    let needed: In = Pt(leading.0 * lines as f32).into();
    if needed.0 <= window.height().0 + 1e-4 {
        (size, leading)
    } else {
        let available: Pt = window.height().into();
        let scale = available.0 / (leading.0 * lines as f32);
        (size * scale, leading * scale)
    }
}
