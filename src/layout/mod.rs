//! Turning a letter into positioned page elements.
//!
//! Layout happens in four steps, each in its own module:
//!
//! - [`flow`](crate::layout::flow) wraps body paragraphs into lines that fit the column
//! - [`blocks`](crate::layout::blocks) builds the closing, signature, postscript,
//!   enclosure and cc blocks that follow the body and never split
//! - [`paginate`](crate::layout::paginate) assigns lines and blocks to pages, moving
//!   breaks to avoid widows and orphans where it can
//! - [`compose`](crate::layout::compose) turns each planned page into a
//!   [`PageLayout`](crate::PageLayout)
//!
//! [`LayoutEngine`](crate::LayoutEngine) runs them in order; the individual steps
//! are public so they can be tested and reused on their own.
//!
//! # Example
//!
//! ```
//! use window_letter::layout::{flow, FlowParams};
//! use window_letter::{FontFamily, In, Paragraph, Pt, StandardFonts};
//!
//! let params = FlowParams {
//!     column_width: In(6.0),
//!     family: FontFamily::TimesRoman,
//!     size: Pt(12.0),
//!     line_spacing: 1.5,
//!     first_line_indent: In(0.5),
//!     space_before: In(0.0),
//!     paragraph: 0,
//!     heading: false,
//! };
//! let lines = flow(&Paragraph::plain("Hello, world!"), &params, &StandardFonts);
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].text(), "Hello, world!");
//! ```

pub mod blocks;
pub mod compose;
pub mod flow;
mod margins;
pub mod paginate;

pub use blocks::*;
pub use compose::*;
pub use flow::*;
pub use margins::*;
pub use paginate::*;
