//! Typesetting configuration: body font and spacing, fold marks, and the running
//! header and footer bands.

use crate::colour::{colours, Colour};
use crate::font::FontFamily;
use crate::layout::Margins;
use crate::page::LineStyle;
use crate::units::*;
use serde::Deserialize;

/// How the body of the letter is set
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormattingSpec {
    pub font_family: FontFamily,
    pub font_size: Pt,
    /// Multiplier applied to the font size to get a body line's height
    pub line_spacing: f32,
    /// Extra space before every paragraph but the first
    pub paragraph_spacing: Pt,
    pub indent_paragraphs: bool,
    pub indent_size: In,
    pub margins: Margins,
    pub date_position: DatePosition,
    /// Distance from the top of page 1 to where the subject / salutation begin.
    /// Sits just under the recipient window by default.
    pub body_start: In,
}

impl Default for FormattingSpec {
    fn default() -> Self {
        FormattingSpec {
            font_family: FontFamily::TimesRoman,
            font_size: Pt(12.0),
            line_spacing: 1.5,
            paragraph_spacing: Pt(12.0),
            indent_paragraphs: true,
            indent_size: In(0.5),
            margins: Margins::default(),
            date_position: DatePosition::default(),
            body_start: In(3.5),
        }
    }
}

impl FormattingSpec {
    /// Height of one body line
    pub fn body_line_height(&self) -> In {
        Pt(self.font_size.0 * self.line_spacing).into()
    }

    /// Indent of a paragraph's first line
    pub fn first_line_indent(&self) -> In {
        if self.indent_paragraphs {
            self.indent_size
        } else {
            In(0.0)
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAlignment {
    #[default]
    Left,
    Center,
    /// Flush with the right edge of the recipient window
    Right,
}

/// Where the date sits on page 1, between the two windows
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatePosition {
    pub x: In,
    pub y: In,
    pub alignment: DateAlignment,
}

impl Default for DatePosition {
    fn default() -> Self {
        DatePosition {
            x: In(0.5),
            y: In(1.75),
            alignment: DateAlignment::Left,
        }
    }
}

/// Short guide marks in both margins showing where to fold the sheet
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "FoldLineFile")]
pub struct FoldLineSpec {
    pub enabled: bool,
    /// Distances from the top of the page
    pub offsets: Vec<In>,
    pub mark_length: Mm,
    /// Gap between the page edge and the start of the mark
    pub edge_offset: Mm,
    pub colour: Colour,
    pub line_width: Pt,
    pub line_style: LineStyle,
}

impl Default for FoldLineSpec {
    fn default() -> Self {
        FoldLineSpec {
            enabled: true,
            offsets: crate::geometry::DEFAULT_FOLD_OFFSETS.to_vec(),
            mark_length: Mm(4.0),
            edge_offset: Mm(3.0),
            colour: colours::RULE_GREY,
            line_width: Pt(0.5),
            line_style: LineStyle::Solid,
        }
    }
}

// the stroke settings may sit next to `enabled` or be nested under `style`
#[derive(Default, Deserialize)]
#[serde(default)]
struct FoldLineFile {
    enabled: Option<bool>,
    #[serde(alias = "positions")]
    offsets: Option<Vec<In>>,
    #[serde(flatten)]
    stroke: FoldStroke,
    style: Option<FoldStroke>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct FoldStroke {
    #[serde(alias = "line_length_mm")]
    mark_length: Option<Mm>,
    #[serde(alias = "margin_offset_mm")]
    edge_offset: Option<Mm>,
    #[serde(alias = "color")]
    colour: Option<Colour>,
    line_width: Option<Pt>,
    line_style: Option<LineStyle>,
}

impl From<FoldLineFile> for FoldLineSpec {
    fn from(file: FoldLineFile) -> Self {
        let defaults = FoldLineSpec::default();
        let nested = file.style.unwrap_or_default();
        let flat = file.stroke;
        FoldLineSpec {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            offsets: file.offsets.unwrap_or(defaults.offsets),
            mark_length: nested.mark_length.or(flat.mark_length).unwrap_or(defaults.mark_length),
            edge_offset: nested.edge_offset.or(flat.edge_offset).unwrap_or(defaults.edge_offset),
            colour: nested.colour.or(flat.colour).unwrap_or(defaults.colour),
            line_width: nested.line_width.or(flat.line_width).unwrap_or(defaults.line_width),
            line_style: nested.line_style.or(flat.line_style).unwrap_or(defaults.line_style),
        }
    }
}

/// One running band (header or footer). `left`, `center` and `right` are
/// templates; see [`BandSpec::render`] for the placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSpec {
    pub enabled: bool,
    pub left: String,
    pub center: String,
    pub right: String,
    pub font_size: Pt,
    pub colour: Colour,
    /// Draw a thin rule between the band and the body
    pub rule: bool,
}

impl BandSpec {
    /// The default running header: recipient, page number and date
    pub fn header() -> BandSpec {
        BandSpec {
            enabled: true,
            left: "{recipient_name}".into(),
            center: "Page {page}".into(),
            right: "{date}".into(),
            font_size: Pt(10.0),
            colour: colours::HEADER_GREY,
            rule: true,
        }
    }

    /// The page 1 header, off unless a letter turns it on
    pub fn first_page_header() -> BandSpec {
        BandSpec {
            enabled: false,
            left: String::new(),
            center: String::new(),
            right: String::new(),
            ..BandSpec::header()
        }
    }

    /// The default footer: "Page X of Y", centred
    pub fn footer() -> BandSpec {
        BandSpec {
            enabled: true,
            left: String::new(),
            center: "Page {page} of {total}".into(),
            right: String::new(),
            font_size: Pt(10.0),
            colour: colours::FOOTER_GREY,
            rule: true,
        }
    }

    /// Substitute placeholders in all three slots. Supported placeholders are
    /// `{recipient_name}`, `{return_name}`, `{date}`, `{reference}`, `{page}` and
    /// `{total}`; `total` is `None` while the page count is still unknown.
    pub fn render(&self, values: &BandValues<'_>, page: usize, total: Option<usize>) -> BandText {
        BandText {
            left: values.fill(&self.left, page, total),
            center: values.fill(&self.center, page, total),
            right: values.fill(&self.right, page, total),
        }
    }
}

/// A band as written in a letter file. Whatever is left out keeps the value of
/// the band it is applied to, so a footer that only sets `center` is still a
/// footer and not a header.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BandOverrides {
    pub enabled: Option<bool>,
    pub left: Option<String>,
    pub center: Option<String>,
    pub right: Option<String>,
    pub font_size: Option<Pt>,
    #[serde(alias = "color")]
    pub colour: Option<Colour>,
    #[serde(alias = "line_below", alias = "line_above")]
    pub rule: Option<bool>,
}

impl BandOverrides {
    /// Fill whatever `self` leaves out from `fallback`
    pub fn or(self, fallback: BandOverrides) -> BandOverrides {
        BandOverrides {
            enabled: self.enabled.or(fallback.enabled),
            left: self.left.or(fallback.left),
            center: self.center.or(fallback.center),
            right: self.right.or(fallback.right),
            font_size: self.font_size.or(fallback.font_size),
            colour: self.colour.or(fallback.colour),
            rule: self.rule.or(fallback.rule),
        }
    }

    /// Just the font size, colour and rule
    fn styling(&self) -> BandOverrides {
        BandOverrides {
            font_size: self.font_size,
            colour: self.colour,
            rule: self.rule,
            ..BandOverrides::default()
        }
    }

    pub fn apply(self, base: BandSpec) -> BandSpec {
        BandSpec {
            enabled: self.enabled.unwrap_or(base.enabled),
            left: self.left.unwrap_or(base.left),
            center: self.center.unwrap_or(base.center),
            right: self.right.unwrap_or(base.right),
            font_size: self.font_size.unwrap_or(base.font_size),
            colour: self.colour.unwrap_or(base.colour),
            rule: self.rule.unwrap_or(base.rule),
        }
    }
}

/// A header as written in a letter file. The fields of a single band describe
/// the continuation header. Letters can instead give `page_1` and `subsequent`
/// slot sets, which share the font size, colour and rule set beside them.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderOverrides {
    #[serde(flatten)]
    pub shared: BandOverrides,
    pub page_1: Option<BandOverrides>,
    pub subsequent: Option<BandOverrides>,
}

impl HeaderOverrides {
    /// The page 1 header and the continuation header
    pub fn resolve(self) -> (BandSpec, BandSpec) {
        let first = self
            .page_1
            .unwrap_or_default()
            .or(self.shared.styling())
            .apply(BandSpec::first_page_header());
        let continuation = self.subsequent.unwrap_or_default().or(self.shared).apply(BandSpec::header());
        (first, continuation)
    }
}

/// Values available to band templates
#[derive(Debug, Clone, Copy)]
pub struct BandValues<'a> {
    pub recipient_name: &'a str,
    pub return_name: &'a str,
    pub date: &'a str,
    pub reference: &'a str,
}

impl BandValues<'_> {
    fn fill(&self, template: &str, page: usize, total: Option<usize>) -> String {
        let total = total.map(|t| t.to_string()).unwrap_or_else(|| "?".into());
        template
            .replace("{recipient_name}", self.recipient_name)
            .replace("{return_name}", self.return_name)
            .replace("{date}", self.date)
            .replace("{formatted_date}", self.date)
            .replace("{reference}", self.reference)
            .replace("{page}", &page.to_string())
            .replace("{total}", &total)
    }
}

/// The rendered text of a band
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BandText {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl BandText {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.center.is_empty() && self.right.is_empty()
    }

    /// Lines needed by the tallest slot
    pub fn line_count(&self) -> usize {
        [&self.left, &self.center, &self.right]
            .iter()
            .map(|s| s.lines().count())
            .max()
            .unwrap_or(0)
    }
}

/// Running header on continuation pages and the "Page X of Y" footer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HeaderFooterOverrides")]
pub struct HeaderFooterSpec {
    pub header: BandSpec,
    pub footer: BandSpec,
    /// Drawn above the return window on page 1 when enabled
    pub first_page_header: BandSpec,
}

impl Default for HeaderFooterSpec {
    fn default() -> Self {
        HeaderFooterSpec {
            header: BandSpec::header(),
            footer: BandSpec::footer(),
            first_page_header: BandSpec::first_page_header(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct HeaderFooterOverrides {
    header: HeaderOverrides,
    footer: BandOverrides,
}

impl From<HeaderFooterOverrides> for HeaderFooterSpec {
    fn from(overrides: HeaderFooterOverrides) -> Self {
        let (first_page_header, header) = overrides.header.resolve();
        HeaderFooterSpec {
            header,
            footer: overrides.footer.apply(BandSpec::footer()),
            first_page_header,
        }
    }
}
