use crate::document::LetterDocument;
use crate::error::{LetterError, OverflowWarning, Result};
use crate::font::{StandardFonts, TextMetrics};
use crate::formatting::{BandSpec, BandValues, HeaderFooterSpec};
use crate::geometry::{self, PAGE};
use crate::layout::{
    band_height, build_blocks, compose, flow_body, opening_height, paginate, ComposeContext, FixedBlock,
    FlowedLine, PageBudget, Pagination, WidowOrphanPolicy,
};
use crate::page::PageLayout;
use crate::units::*;

/// A laid out letter, ready for a [`crate::RenderSink`]
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub pages: Vec<PageLayout>,
    /// Every warning raised while laying out, in page order. Each one is also
    /// attached to the page it concerns.
    pub warnings: Vec<OverflowWarning>,
}

impl Letter {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out [`LetterDocument`]s using a [`TextMetrics`] provider.
///
/// Layout is a pure function of the document and the metrics: the same inputs
/// always produce the same pages.
///
/// ```
/// use window_letter::{LayoutEngine, StandardFonts};
/// # fn example(document: window_letter::LetterDocument) -> window_letter::Result<()> {
/// let engine = LayoutEngine::new(StandardFonts);
/// let letter = engine.layout(&document)?;
/// for warning in letter.warnings.iter() {
///     eprintln!("{warning}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine<M: TextMetrics> {
    metrics: M,
    policy: WidowOrphanPolicy,
}

impl Default for LayoutEngine<StandardFonts> {
    fn default() -> Self {
        LayoutEngine::new(StandardFonts)
    }
}

// heights the bands take away from the body, for a given page count
#[derive(Debug, Copy, Clone, PartialEq)]
struct Bands {
    header: In,
    footer: In,
}

impl<M: TextMetrics> LayoutEngine<M> {
    pub fn new(metrics: M) -> LayoutEngine<M> {
        LayoutEngine {
            metrics,
            policy: WidowOrphanPolicy::default(),
        }
    }

    /// Use a different widow / orphan policy
    pub fn with_policy(mut self, policy: WidowOrphanPolicy) -> LayoutEngine<M> {
        self.policy = policy;
        self
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Lay out a letter.
    ///
    /// Pagination runs twice: once with the page total unknown, to find it, and
    /// again with the header and footer rendered with that total. Both passes
    /// must agree on which content lands on which page, otherwise
    /// [`LetterError::UnstablePagination`] is returned.
    pub fn layout(&self, document: &LetterDocument) -> Result<Letter> {
        document.validate()?;

        let formatting = &document.formatting;
        let column_width = formatting.margins.column_width(PAGE.0);
        if column_width.0 <= 0.0 {
            return Err(LetterError::Geometry(format!(
                "margins leave no room for text (column width {column_width} in)"
            )));
        }

        let body = flow_body(&document.content.paragraphs, formatting, column_width, &self.metrics);
        let blocks = build_blocks(document, column_width, &self.metrics);
        tracing::debug!(lines = body.len(), blocks = blocks.len(), "flowed letter body");

        let date = document.metadata.formatted_date();
        let values = BandValues {
            recipient_name: document.recipient_address.display_name(),
            return_name: document.return_address.display_name(),
            date: &date,
            reference: &document.metadata.reference_id,
        };

        let tentative_bands = bands(document.header_footer.as_ref(), &values, None);
        let tentative = self.plan(document, &body, &blocks, tentative_bands)?;
        tracing::debug!(pages = tentative.total(), "tentative pagination");

        let total = tentative.total();
        let final_bands = bands(document.header_footer.as_ref(), &values, Some(total));
        let plan = self.plan(document, &body, &blocks, final_bands)?;
        if !plan.same_assignment(&tentative) {
            return Err(LetterError::UnstablePagination {
                tentative: total,
                final_count: plan.total(),
            });
        }
        tracing::debug!(pages = plan.total(), "final pagination");

        let ctx = ComposeContext {
            document,
            metrics: &self.metrics,
            body: &body,
            blocks: &blocks,
            values,
            total,
            header_height: final_bands.header,
            footer_height: final_bands.footer,
        };

        let Pagination { pages, warnings } = plan;
        let mut pages: Vec<PageLayout> = pages.iter().map(|page| compose(page, &ctx)).collect();
        for warning in warnings.iter() {
            tracing::warn!(page = warning.page(), "{warning}");
            if let Some(page) = pages.get_mut(warning.page() - 1) {
                page.warnings.push(warning.clone());
            }
        }
        debug_assert!(pages.iter().all(|page| !page.elements.is_empty()));

        Ok(Letter { pages, warnings })
    }

    fn plan(
        &self,
        document: &LetterDocument,
        body: &[FlowedLine],
        blocks: &[FixedBlock],
        bands: Bands,
    ) -> Result<Pagination> {
        let formatting = &document.formatting;
        let content_height = geometry::content_height(formatting);
        let first_page_reservation = geometry::body_top(1, formatting) - formatting.margins.top
            + opening_height(formatting, &document.content);

        let budget = PageBudget {
            first: content_height - first_page_reservation - bands.footer,
            continuation: content_height - bands.header - bands.footer,
        };
        if budget.first.0 < 0.0 {
            return Err(LetterError::Geometry(format!(
                "page 1 opening ends {} in below the bottom of its content area",
                -budget.first.0
            )));
        }
        tracing::debug!(first = %budget.first, continuation = %budget.continuation, "page budget");

        paginate(body, blocks, &budget, &self.policy)
    }
}

// the footer is reserved on every page, page 1 included, so that the room left
// for the body never depends on how many pages there turn out to be
fn bands(header_footer: Option<&HeaderFooterSpec>, values: &BandValues<'_>, total: Option<usize>) -> Bands {
    let Some(header_footer) = header_footer else {
        return Bands {
            header: In(0.0),
            footer: In(0.0),
        };
    };

    let tallest = |spec: &BandSpec, first_page: usize| {
        let last_page = total.unwrap_or(first_page).max(first_page);
        (first_page..=last_page)
            .map(|page| band_height(spec, &spec.render(values, page, total)))
            .fold(In(0.0), In::max)
    };

    Bands {
        header: tallest(&header_footer.header, 2),
        footer: tallest(&header_footer.footer, 1),
    }
}
