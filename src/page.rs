use crate::colour::Colour;
use crate::error::OverflowWarning;
use crate::font::SpanFont;
use crate::pagesize::PageSize;
use crate::rect::Point;
use crate::units::*;
use serde::Deserialize;
use std::path::PathBuf;

/// A run of text in a single font. `origin` is the top-left corner of the line
/// box the text sits in; sinks work out the baseline from the font's ascent.
#[derive(Clone, PartialEq, Debug)]
pub struct TextElement {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub origin: Point,
}

/// How a stroke is drawn along its length
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    /// Dash and gap lengths, empty for a solid stroke
    pub fn dash_pattern(self) -> &'static [Pt] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[Pt(3.0), Pt(2.0)],
        }
    }
}

/// A straight stroke between two points
#[derive(Clone, PartialEq, Debug)]
pub struct LineElement {
    pub from: Point,
    pub to: Point,
    pub width: Pt,
    pub colour: Colour,
    pub style: LineStyle,
}

impl LineElement {
    pub fn length(&self) -> In {
        let dx = (self.to.x - self.from.x).0;
        let dy = (self.to.y - self.from.y).0;
        In((dx * dx + dy * dy).sqrt())
    }
}

/// A fixed-size image box. The file is only read by the rendering sink.
#[derive(Clone, PartialEq, Debug)]
pub struct ImageElement {
    pub path: PathBuf,
    pub origin: Point,
    pub width: In,
    pub height: In,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PlacedElement {
    Text(TextElement),
    Line(LineElement),
    Image(ImageElement),
}

impl PlacedElement {
    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            PlacedElement::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineElement> {
        match self {
            PlacedElement::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            PlacedElement::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// One finished page: every element with absolute coordinates, in drawing order
#[derive(Clone, PartialEq, Debug)]
pub struct PageLayout {
    /// 1-based page number
    pub index: usize,
    pub size: PageSize,
    pub elements: Vec<PlacedElement>,
    /// Non-fatal problems found while laying out this page
    pub warnings: Vec<OverflowWarning>,
}

impl PageLayout {
    pub fn new(index: usize, size: PageSize) -> PageLayout {
        PageLayout {
            index,
            size,
            elements: Vec::default(),
            warnings: Vec::default(),
        }
    }

    pub fn add_text(&mut self, text: TextElement) {
        self.elements.push(PlacedElement::Text(text));
    }

    pub fn add_line(&mut self, line: LineElement) {
        self.elements.push(PlacedElement::Line(line));
    }

    pub fn add_image(&mut self, image: ImageElement) {
        self.elements.push(PlacedElement::Image(image));
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(PlacedElement::as_text)
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineElement> {
        self.elements.iter().filter_map(PlacedElement::as_line)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageElement> {
        self.elements.iter().filter_map(PlacedElement::as_image)
    }

    /// First text element whose content is exactly `text`
    pub fn find_text(&self, text: &str) -> Option<&TextElement> {
        self.texts().find(|t| t.text == text)
    }
}
