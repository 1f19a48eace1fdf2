//! Fonts and text measurement.
//!
//! Letters are set in one of the PDF standard faces, so nothing is embedded: the
//! rendering sink only refers to the base font by name. Layout asks a
//! [`TextMetrics`] implementation how wide a string is. [`StandardFonts`] carries
//! the advance widths of the standard faces; [`FixedAdvance`] gives every
//! character the same advance and is handy for predictable tests.

use crate::units::Pt;
use serde::Deserialize;

/// The typefaces a letter can be set in
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "Times-Roman", alias = "Times")]
    TimesRoman,
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Courier")]
    Courier,
}

/// Weight of a run of text
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
}

impl FontStyle {
    pub fn from_bold(bold: bool) -> FontStyle {
        if bold {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        }
    }
}

impl FontFamily {
    /// The PDF base font name for this family in the given style
    pub fn base_font(&self, style: FontStyle) -> &'static str {
        match (self, style) {
            (FontFamily::TimesRoman, FontStyle::Regular) => "Times-Roman",
            (FontFamily::TimesRoman, FontStyle::Bold) => "Times-Bold",
            (FontFamily::Helvetica, FontStyle::Regular) => "Helvetica",
            (FontFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
            (FontFamily::Courier, FontStyle::Regular) => "Courier",
            (FontFamily::Courier, FontStyle::Bold) => "Courier-Bold",
        }
    }
}

/// Everything needed to draw or measure a run of text
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: Pt,
}

impl SpanFont {
    pub fn regular(family: FontFamily, size: Pt) -> SpanFont {
        SpanFont {
            family,
            style: FontStyle::Regular,
            size,
        }
    }

    pub fn bold(family: FontFamily, size: Pt) -> SpanFont {
        SpanFont {
            family,
            style: FontStyle::Bold,
            size,
        }
    }
}

/// Measures text. Implementations must be pure: the same question always gets
/// the same answer, which is what makes pagination reproducible.
pub trait TextMetrics {
    /// The advance width of `text` when set in `font`
    fn text_width(&self, text: &str, font: &SpanFont) -> Pt;

    /// Single-spaced line height for `font`
    fn line_height(&self, font: &SpanFont) -> Pt {
        font.size * 1.2
    }

    /// Distance from the top of a line box to the baseline
    fn ascent(&self, font: &SpanFont) -> Pt {
        font.size * 0.8
    }
}

/// Metrics of the PDF standard Times, Helvetica and Courier faces, taken from
/// their AFM files. Characters outside printable ASCII are measured as an `n`.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardFonts;

impl StandardFonts {
    fn widths(font: &SpanFont) -> Option<&'static [u16; 95]> {
        match (font.family, font.style) {
            (FontFamily::TimesRoman, FontStyle::Regular) => Some(&TIMES_ROMAN),
            (FontFamily::TimesRoman, FontStyle::Bold) => Some(&TIMES_BOLD),
            (FontFamily::Helvetica, FontStyle::Regular) => Some(&HELVETICA),
            (FontFamily::Helvetica, FontStyle::Bold) => Some(&HELVETICA_BOLD),
            (FontFamily::Courier, _) => None,
        }
    }

    /// Advance of a single character in 1/1000 em
    fn advance(font: &SpanFont, ch: char) -> u16 {
        let Some(widths) = Self::widths(font) else {
            return COURIER_ADVANCE;
        };
        let code = ch as usize;
        if (0x20..=0x7e).contains(&code) {
            widths[code - 0x20]
        } else {
            widths['n' as usize - 0x20]
        }
    }
}

impl TextMetrics for StandardFonts {
    fn text_width(&self, text: &str, font: &SpanFont) -> Pt {
        let units: u32 = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| Self::advance(font, ch) as u32)
            .sum();
        Pt(font.size.0 * units as f32 / 1000.0)
    }

    fn ascent(&self, font: &SpanFont) -> Pt {
        let ascender = match font.family {
            FontFamily::TimesRoman => 683.0,
            FontFamily::Helvetica => 718.0,
            FontFamily::Courier => 629.0,
        };
        Pt(font.size.0 * ascender / 1000.0)
    }
}

/// Gives every character the same advance, in em. Bold text can be made wider
/// to check that runs are measured in their own style.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedAdvance {
    pub regular: f32,
    pub bold: f32,
}

impl FixedAdvance {
    pub fn new(advance: f32) -> FixedAdvance {
        FixedAdvance {
            regular: advance,
            bold: advance,
        }
    }
}

impl TextMetrics for FixedAdvance {
    fn text_width(&self, text: &str, font: &SpanFont) -> Pt {
        let advance = match font.style {
            FontStyle::Regular => self.regular,
            FontStyle::Bold => self.bold,
        };
        Pt(font.size.0 * text.chars().count() as f32 * advance)
    }
}

const COURIER_ADVANCE: u16 = 600;

// advance widths for 0x20 ..= 0x7e, WinAnsi encoding
#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
