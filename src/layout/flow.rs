//! Greedy line breaking of body paragraphs.

use crate::document::Paragraph;
use crate::font::{FontFamily, FontStyle, SpanFont, TextMetrics};
use crate::formatting::FormattingSpec;
use crate::units::*;

/// A piece of a wrapped line in one weight, with its measured width
#[derive(Debug, Clone, PartialEq)]
pub struct LineRun {
    pub text: String,
    pub bold: bool,
    pub width: In,
}

/// A single wrapped line of body text
#[derive(Debug, Clone, PartialEq)]
pub struct FlowedLine {
    pub runs: Vec<LineRun>,
    /// Sum of the run widths
    pub width: In,
    pub height: In,
    /// Horizontal offset from the left edge of the column
    pub indent: In,
    /// Gap above the line, dropped when the line opens a page
    pub space_before: In,
    /// Index of the source paragraph within the body
    pub paragraph: usize,
    /// First line of its paragraph
    pub first: bool,
    /// Last line of its paragraph
    pub last: bool,
    /// Holds a single word wider than the space it was given
    pub overflow: bool,
    /// Belongs to a heading, which is kept with the paragraph after it
    pub heading: bool,
}

impl FlowedLine {
    /// The line's text with run boundaries removed
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Vertical space the line consumes, depending on whether it opens a page
    pub fn advance(&self, opens_page: bool) -> In {
        if opens_page {
            self.height
        } else {
            self.height + self.space_before
        }
    }
}

/// Parameters for flowing one paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    pub column_width: In,
    pub family: FontFamily,
    pub size: Pt,
    pub line_spacing: f32,
    pub first_line_indent: In,
    pub space_before: In,
    pub paragraph: usize,
    pub heading: bool,
}

impl FlowParams {
    /// Body text settings for the paragraph at `paragraph` in the letter
    pub fn body(formatting: &FormattingSpec, column_width: In, paragraph: usize) -> FlowParams {
        FlowParams {
            column_width,
            family: formatting.font_family,
            size: formatting.font_size,
            line_spacing: formatting.line_spacing,
            first_line_indent: formatting.first_line_indent(),
            space_before: if paragraph == 0 {
                In(0.0)
            } else {
                formatting.paragraph_spacing.into()
            },
            paragraph,
            heading: false,
        }
    }

    /// Settings for a heading: like [`FlowParams::body`], without the indent
    pub fn heading(formatting: &FormattingSpec, column_width: In, paragraph: usize) -> FlowParams {
        FlowParams {
            first_line_indent: In(0.0),
            heading: true,
            ..FlowParams::body(formatting, column_width, paragraph)
        }
    }

    fn font(&self, bold: bool) -> SpanFont {
        SpanFont {
            family: self.family,
            style: FontStyle::from_bold(bold),
            size: self.size,
        }
    }
}

// a word is every non-whitespace character between two gaps, possibly spanning
// several runs of different weight
struct Word {
    pieces: Vec<(String, bool, Pt)>,
    width: Pt,
}

impl Word {
    fn trailing_bold(&self) -> bool {
        self.pieces.last().map(|&(_, bold, _)| bold).unwrap_or(false)
    }
}

fn split_words(paragraph: &Paragraph) -> Vec<Vec<(String, bool)>> {
    let mut words: Vec<Vec<(String, bool)>> = Vec::new();
    let mut current: Vec<(String, bool)> = Vec::new();

    for run in paragraph.runs.iter() {
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some((text, bold)) if *bold == run.bold => text.push(ch),
                _ => current.push((ch.to_string(), run.bold)),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

// widths are accumulated in points so that whole-point advances add up exactly
#[derive(Default)]
struct LineBuilder {
    runs: Vec<(String, bool, Pt)>,
    width: Pt,
    words: usize,
}

impl LineBuilder {
    fn push(&mut self, text: &str, bold: bool, width: Pt) {
        match self.runs.last_mut() {
            Some((run, run_bold, run_width)) if *run_bold == bold => {
                run.push_str(text);
                *run_width += width;
            }
            _ => self.runs.push((text.to_string(), bold, width)),
        }
        self.width += width;
    }
}

/// Wrap a paragraph into lines no wider than the column. Words are added while
/// the line still fits; a word that doesn't fit even on an empty line is placed
/// alone and the line is flagged as `overflow`.
pub fn flow<M: TextMetrics + ?Sized>(
    paragraph: &Paragraph,
    params: &FlowParams,
    metrics: &M,
) -> Vec<FlowedLine> {
    let measure = |text: &str, bold: bool| metrics.text_width(text, &params.font(bold));

    let words: Vec<Word> = split_words(paragraph)
        .into_iter()
        .map(|pieces| {
            let pieces: Vec<(String, bool, Pt)> = pieces
                .into_iter()
                .map(|(text, bold)| {
                    let width = measure(&text, bold);
                    (text, bold, width)
                })
                .collect();
            let width = pieces.iter().map(|&(_, _, w)| w).sum();
            Word { pieces, width }
        })
        .collect();
    let space_regular = measure(" ", false);
    let space_bold = measure(" ", true);
    let height: In = Pt(params.size.0 * params.line_spacing).into();
    let first_limit: Pt = (params.column_width - params.first_line_indent).into();
    let limit: Pt = params.column_width.into();

    let mut lines: Vec<FlowedLine> = Vec::new();
    let finish = |line: LineBuilder, overflow: bool, lines: &mut Vec<FlowedLine>| {
        let first = lines.is_empty();
        lines.push(FlowedLine {
            runs: line
                .runs
                .into_iter()
                .map(|(text, bold, width)| LineRun {
                    text,
                    bold,
                    width: width.into(),
                })
                .collect(),
            width: line.width.into(),
            height,
            indent: if first {
                params.first_line_indent
            } else {
                In(0.0)
            },
            space_before: if first { params.space_before } else { In(0.0) },
            paragraph: params.paragraph,
            first,
            last: false,
            overflow,
            heading: params.heading,
        });
    };

    let mut line = LineBuilder::default();
    let mut overflow = false;
    let mut previous_bold = false;
    for word in words.iter() {
        if line.words > 0 {
            let available = if lines.is_empty() { first_limit } else { limit };
            let space = if previous_bold { space_bold } else { space_regular };
            if line.width + space + word.width <= available {
                line.push(" ", previous_bold, space);
            } else {
                finish(std::mem::take(&mut line), overflow, &mut lines);
                overflow = false;
            }
        }

        if line.words == 0 {
            let available = if lines.is_empty() { first_limit } else { limit };
            overflow = word.width > available;
        }
        for (text, bold, width) in word.pieces.iter() {
            line.push(text, *bold, *width);
        }
        line.words += 1;
        previous_bold = word.trailing_bold();
    }
    if line.words > 0 {
        finish(line, overflow, &mut lines);
    }

    if let Some(last) = lines.last_mut() {
        last.last = true;
    }
    lines
}

/// Flow every paragraph of the body, in order. Paragraphs that read as
/// headings (see [`Paragraph::is_heading`]) are set without an indent.
pub fn flow_body<M: TextMetrics + ?Sized>(
    paragraphs: &[Paragraph],
    formatting: &FormattingSpec,
    column_width: In,
    metrics: &M,
) -> Vec<FlowedLine> {
    paragraphs
        .iter()
        .enumerate()
        .flat_map(|(i, paragraph)| {
            let params = if paragraph.is_heading() {
                FlowParams::heading(formatting, column_width, i)
            } else {
                FlowParams::body(formatting, column_width, i)
            };
            flow(paragraph, &params, metrics)
        })
        .collect()
}
