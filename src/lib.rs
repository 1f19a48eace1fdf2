//! Layout and pagination of letters printed for #10 double-window envelopes.
//!
//! A [`LetterDocument`] goes in; a [`Letter`] made of [`PageLayout`]s comes out,
//! with every address block lined up with the envelope windows, fold marks in
//! the margins and the body flowed across as many pages as it needs. Any
//! [`RenderSink`] can then draw the pages; [`PdfSink`] writes a PDF.

mod colour;
pub use colour::*;

mod content;

mod document;
pub use document::*;

mod engine;
pub use engine::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod formatting;
pub use formatting::*;

/// Envelope and window geometry, and placement of everything on the page
pub mod geometry;

mod image;

mod info;
pub use info::*;

/// Line breaking, pagination and composition of pages
pub mod layout;

mod page;
pub use page::*;

/// Page sizes
pub mod pagesize;

mod pdf;
pub use pdf::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod sink;
pub use sink::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
