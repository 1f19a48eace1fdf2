use std::fmt;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LetterError {
    #[error("malformed letter document: {0}")]
    /// A required field of the letter is missing or blank. Raised before any
    /// layout work happens.
    Structural(String),

    #[error("impossible geometry: {0}")]
    /// Some element cannot fit on a page even on its own, so no valid layout exists
    Geometry(String),

    #[error("pagination did not settle: tentative pass produced {tentative} pages, final pass {final_count}")]
    /// The final pagination pass disagreed with the tentative one
    UnstablePagination { tentative: usize, final_count: usize },

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [image] failed to parse the signature image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The letter description could not be parsed
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LetterError>;

/// A non-fatal layout problem. Generation carries on, and every warning is
/// returned next to the laid out pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverflowWarning {
    /// A single word was wider than the column and was set on its own line
    WordOverflow {
        page: usize,
        paragraph: usize,
        word: String,
    },
    /// The first line of a paragraph was left alone at the bottom of a page
    Orphan { page: usize, paragraph: usize },
    /// The last line of a paragraph was left alone at the top of a page
    Widow { page: usize, paragraph: usize },
}

impl OverflowWarning {
    /// The (1-based) page the warning is attached to
    pub fn page(&self) -> usize {
        match self {
            OverflowWarning::WordOverflow { page, .. }
            | OverflowWarning::Orphan { page, .. }
            | OverflowWarning::Widow { page, .. } => *page,
        }
    }
}

impl fmt::Display for OverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowWarning::WordOverflow {
                page,
                paragraph,
                word,
            } => write!(
                f,
                "page {page}: word `{word}` in paragraph {paragraph} is wider than the column"
            ),
            OverflowWarning::Orphan { page, paragraph } => write!(
                f,
                "page {page}: first line of paragraph {paragraph} is orphaned at the bottom"
            ),
            OverflowWarning::Widow { page, paragraph } => write!(
                f,
                "page {page}: last line of paragraph {paragraph} is widowed at the top"
            ),
        }
    }
}
