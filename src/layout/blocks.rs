//! Indivisible blocks set after the body: closing and signature, postscript,
//! enclosures and carbon copies.

use super::flow::{flow, FlowParams, FlowedLine};
use crate::document::{LetterDocument, Paragraph, Signature};
use crate::font::TextMetrics;
use crate::units::*;
use std::path::PathBuf;

/// Blank space left for a pen signature
pub const TYPED_SIGNATURE_SPACE: In = In(0.75);

/// Indent of the items listed under "Enclosures:" and "cc:"
pub const LIST_INDENT: In = In(0.25);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// The closing line together with the signature
    Closing,
    Postscript,
    Enclosures,
    Cc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockPart {
    /// A single line set as is
    Text {
        text: String,
        indent: In,
        height: In,
    },
    Image {
        path: PathBuf,
        width: In,
        height: In,
    },
    /// A wrapped line of flowed text, which may carry an overflowing word
    Line(FlowedLine),
    Gap(In),
}

impl BlockPart {
    pub fn height(&self) -> In {
        match self {
            BlockPart::Text { height, .. } | BlockPart::Image { height, .. } => *height,
            BlockPart::Line(line) => line.height,
            BlockPart::Gap(height) => *height,
        }
    }
}

/// A block the planner never splits across pages
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBlock {
    pub kind: BlockKind,
    /// Gap above the block, dropped when the block opens a page
    pub space_before: In,
    pub parts: Vec<BlockPart>,
}

impl FixedBlock {
    pub fn height(&self) -> In {
        self.parts.iter().map(BlockPart::height).sum()
    }

    pub fn advance(&self, opens_page: bool) -> In {
        if opens_page {
            self.height()
        } else {
            self.height() + self.space_before
        }
    }
}

/// Build the trailing blocks of a letter in print order
pub fn build_blocks<M: TextMetrics + ?Sized>(
    document: &LetterDocument,
    column_width: In,
    metrics: &M,
) -> Vec<FixedBlock> {
    let formatting = &document.formatting;
    let content = &document.content;
    let line_height = formatting.body_line_height();
    let space_before: In = formatting.paragraph_spacing.into();
    let text = |text: String, indent: In| BlockPart::Text {
        text,
        indent,
        height: line_height,
    };

    let mut blocks = Vec::new();

    let mut closing = vec![text(format!("{},", content.closing.trim()), In(0.0))];
    if let Some(signature) = &document.signature {
        match signature {
            Signature::Image {
                path,
                width,
                height,
                ..
            } => closing.push(BlockPart::Image {
                path: path.clone(),
                width: *width,
                height: *height,
            }),
            Signature::Typed { .. } => closing.push(BlockPart::Gap(TYPED_SIGNATURE_SPACE)),
        }
        closing.push(text(signature.typed_name().to_string(), In(0.0)));
        if let Some(title) = signature.title() {
            closing.push(text(title.to_string(), In(0.0)));
        }
    }
    blocks.push(FixedBlock {
        kind: BlockKind::Closing,
        space_before,
        parts: closing,
    });

    if let Some(postscript) = content.postscript.as_deref().filter(|ps| !ps.trim().is_empty()) {
        let params = FlowParams {
            first_line_indent: In(0.0),
            space_before: In(0.0),
            // numbered after the body paragraphs, for warnings
            ..FlowParams::body(formatting, column_width, content.paragraphs.len())
        };
        let lines = flow(&Paragraph::plain(format!("P.S. {}", postscript.trim())), &params, metrics);
        blocks.push(FixedBlock {
            kind: BlockKind::Postscript,
            space_before,
            parts: lines.into_iter().map(BlockPart::Line).collect(),
        });
    }

    if !content.enclosures.is_empty() {
        let mut parts = vec![text("Enclosures:".into(), In(0.0))];
        parts.extend(content.enclosures.iter().map(|item| text(format!("- {item}"), LIST_INDENT)));
        blocks.push(FixedBlock {
            kind: BlockKind::Enclosures,
            space_before,
            parts,
        });
    }

    if !content.cc.is_empty() {
        let mut parts = vec![text("cc:".into(), In(0.0))];
        parts.extend(content.cc.iter().map(|item| text(item.clone(), LIST_INDENT)));
        blocks.push(FixedBlock {
            kind: BlockKind::Cc,
            space_before,
            parts,
        });
    }

    blocks
}
