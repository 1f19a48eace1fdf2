//! Assigns flowed body lines and trailing blocks to pages.
//!
//! The planner walks the body line by line, accumulating height against the
//! page's budget. When a line doesn't fit the page is closed, after checking
//! whether the break would strand a paragraph's first line at the bottom of the
//! page (an orphan) or its last line at the top of the next one (a widow). When
//! a break can be moved to avoid either, it is; when it can't, the break is
//! kept and an [`OverflowWarning`] records it.
//!
//! Headings are kept with the paragraph after them: a heading that would land
//! in the bottom third of a page, or without room for the first few lines of
//! the next paragraph, starts the next page instead.

use super::blocks::{BlockPart, FixedBlock};
use super::flow::FlowedLine;
use crate::error::{LetterError, OverflowWarning, Result};
use crate::units::*;

// slack for float accumulation when comparing heights
const TOLERANCE: f32 = 1e-4;

/// Usable content height of each page
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageBudget {
    pub first: In,
    pub continuation: In,
}

impl PageBudget {
    fn for_page(&self, page: usize) -> In {
        if page == 1 {
            self.first
        } else {
            self.continuation
        }
    }
}

/// Which break adjustments the planner may make
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WidowOrphanPolicy {
    pub orphans: bool,
    pub widows: bool,
    /// Keep headings with the start of the paragraph that follows
    pub headings: bool,
}

impl Default for WidowOrphanPolicy {
    fn default() -> Self {
        WidowOrphanPolicy {
            orphans: true,
            widows: true,
            headings: true,
        }
    }
}

/// Lines of the following paragraph a heading wants on its page
fn lines_kept_with_heading(next_paragraph_lines: usize) -> usize {
    (next_paragraph_lines / 2).clamp(2, 4).min(next_paragraph_lines)
}

/// An entry on a planned page, indexing into the body lines or the blocks
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlanItem {
    Line(usize),
    Block(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    /// 1-based page number
    pub index: usize,
    pub items: Vec<PlanItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<PlannedPage>,
    pub warnings: Vec<OverflowWarning>,
}

impl Pagination {
    pub fn total(&self) -> usize {
        self.pages.len()
    }

    /// True when both plans put the same items on the same pages
    pub fn same_assignment(&self, other: &Pagination) -> bool {
        self.pages == other.pages
    }
}

struct Planner<'a> {
    body: &'a [FlowedLine],
    budget: &'a PageBudget,
    pages: Vec<Vec<PlanItem>>,
    used: In,
    warnings: Vec<OverflowWarning>,
}

impl<'a> Planner<'a> {
    fn page_number(&self) -> usize {
        self.pages.len()
    }

    fn current(&mut self) -> &mut Vec<PlanItem> {
        // there is always at least page 1
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn opens_page(&self) -> bool {
        self.pages.last().map(Vec::is_empty).unwrap_or(true)
    }

    fn fits(&self, advance: In) -> bool {
        (self.used + advance).0 <= self.budget.for_page(self.page_number()).0 + TOLERANCE
    }

    fn in_bottom_third(&self) -> bool {
        let budget = self.budget.for_page(self.page_number());
        (budget - self.used).0 < budget.0 / 3.0
    }

    // height of the heading starting at `first` plus the lines of the next
    // paragraph it should share a page with, or `None` when nothing follows it
    fn heading_group_height(&self, first: usize, opens_page: bool) -> Option<In> {
        let heading = self.body[first].paragraph;
        let next = first + self.body[first..].iter().take_while(|l| l.paragraph == heading).count();
        let following = self.body.get(next)?.paragraph;
        let available = self.body[next..].iter().take_while(|l| l.paragraph == following).count();
        let kept = lines_kept_with_heading(available);

        let height = self.body[first..next + kept]
            .iter()
            .enumerate()
            .map(|(k, line)| line.advance(k == 0 && opens_page))
            .sum();
        Some(height)
    }

    fn place(&mut self, item: PlanItem, advance: In) {
        self.current().push(item);
        self.used += advance;
    }

    /// Start a new page holding the lines `carried` from the end of the current one
    fn break_page(&mut self, carried: usize) {
        let keep = self.current().len() - carried;
        let moved = self.current().split_off(keep);
        self.pages.push(Vec::new());
        self.used = In(0.0);
        for item in moved {
            let advance = match item {
                PlanItem::Line(i) => self.body[i].advance(self.opens_page()),
                PlanItem::Block(_) => In(0.0),
            };
            self.place(item, advance);
        }
    }

    // how many trailing lines of the current page should follow `next` onto the
    // next page, and whether doing so resolves a widow and/or orphan
    fn lines_to_carry(&self, next: usize, policy: &WidowOrphanPolicy) -> (usize, bool, bool) {
        let line = &self.body[next];
        let same_paragraph = |i: usize| self.body[i].paragraph == line.paragraph;
        let widow = !line.first && line.last;
        let orphan = next > 0 && same_paragraph(next - 1) && self.body[next - 1].first;

        let carry = if widow && policy.widows {
            // pulling the previous line must not strand the first line either
            if next >= 2 && !self.body[next - 1].first && self.body[next - 2].first && same_paragraph(next - 2) {
                2
            } else {
                1
            }
        } else if orphan && policy.orphans {
            1
        } else {
            0
        };
        (carry, widow, orphan)
    }

    fn can_carry(&self, carry: usize, next: usize) -> bool {
        let Some(current) = self.pages.last() else {
            return false;
        };
        let on_page = current.len() >= carry
            && current[current.len() - carry..]
                .iter()
                .enumerate()
                .all(|(k, item)| *item == PlanItem::Line(next - carry + k));
        let keeps_content = current.len() > carry || self.page_number() == 1;
        let height: In = (next - carry..=next)
            .enumerate()
            .map(|(k, i)| self.body[i].advance(k == 0))
            .sum();
        on_page && keeps_content && height.0 <= self.budget.continuation.0 + TOLERANCE
    }

    fn break_before_line(&mut self, next: usize, policy: &WidowOrphanPolicy) {
        let (carry, widow, orphan) = self.lines_to_carry(next, policy);
        let paragraph = self.body[next].paragraph;

        if carry > 0 && self.can_carry(carry, next) {
            tracing::debug!(page = self.page_number(), carry, paragraph, "moved page break");
            self.break_page(carry);
            return;
        }

        if orphan {
            self.warnings.push(OverflowWarning::Orphan {
                page: self.page_number(),
                paragraph,
            });
        }
        if widow {
            self.warnings.push(OverflowWarning::Widow {
                page: self.page_number() + 1,
                paragraph,
            });
        }
        self.break_page(0);
    }
}

/// Lay body lines and then the trailing blocks onto pages. Fails only when
/// something is taller than an entire continuation page, since no layout
/// could hold it.
pub fn paginate(
    body: &[FlowedLine],
    blocks: &[FixedBlock],
    budget: &PageBudget,
    policy: &WidowOrphanPolicy,
) -> Result<Pagination> {
    if budget.continuation.0 <= 0.0 {
        return Err(LetterError::Geometry(format!(
            "continuation pages have no room for content ({} in)",
            budget.continuation
        )));
    }
    if let Some(line) = body.iter().find(|l| l.height.0 > budget.continuation.0 + TOLERANCE) {
        return Err(LetterError::Geometry(format!(
            "a line of paragraph {} is {} in tall but a page only holds {} in",
            line.paragraph, line.height, budget.continuation
        )));
    }
    if let Some(block) = blocks.iter().find(|b| b.height().0 > budget.continuation.0 + TOLERANCE) {
        return Err(LetterError::Geometry(format!(
            "{:?} block is {} in tall but a page only holds {} in",
            block.kind,
            block.height(),
            budget.continuation
        )));
    }

    let mut planner = Planner {
        body,
        budget,
        pages: vec![Vec::new()],
        used: In(0.0),
        warnings: Vec::new(),
    };

    for (i, line) in body.iter().enumerate() {
        // page 1 may move its first heading on: the opening keeps it from being empty
        let movable = !planner.opens_page() || planner.page_number() == 1;
        if policy.headings && line.heading && line.first && movable {
            let here = planner.heading_group_height(i, planner.opens_page());
            let fresh = planner.heading_group_height(i, true);
            if let (Some(here), Some(fresh)) = (here, fresh) {
                let stranded = !planner.fits(here) || planner.in_bottom_third();
                if stranded && fresh.0 <= budget.continuation.0 + TOLERANCE {
                    tracing::debug!(
                        page = planner.page_number(),
                        paragraph = line.paragraph,
                        "moved heading to the next page"
                    );
                    planner.break_page(0);
                }
            }
        }
        if !planner.fits(line.advance(planner.opens_page())) {
            planner.break_before_line(i, policy);
        }
        // the page may have been empty and still too short: page 1 only
        if !planner.fits(line.advance(planner.opens_page())) {
            planner.break_page(0);
        }
        let advance = line.advance(planner.opens_page());
        planner.place(PlanItem::Line(i), advance);
    }

    for (i, block) in blocks.iter().enumerate() {
        if !planner.fits(block.advance(planner.opens_page())) {
            planner.break_page(0);
        }
        let advance = block.advance(planner.opens_page());
        planner.place(PlanItem::Block(i), advance);
    }

    let Planner {
        pages,
        mut warnings,
        ..
    } = planner;
    let pages: Vec<PlannedPage> = pages
        .into_iter()
        .enumerate()
        .map(|(i, items)| PlannedPage { index: i + 1, items })
        .collect();

    for page in pages.iter() {
        for item in page.items.iter() {
            let overflowing: Vec<&FlowedLine> = match item {
                PlanItem::Line(i) => vec![&body[*i]],
                PlanItem::Block(i) => blocks[*i]
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        BlockPart::Line(line) => Some(line),
                        _ => None,
                    })
                    .collect(),
            };
            for line in overflowing.into_iter().filter(|line| line.overflow) {
                warnings.push(OverflowWarning::WordOverflow {
                    page: page.index,
                    paragraph: line.paragraph,
                    word: line.text(),
                });
            }
        }
    }
    warnings.sort_by_key(OverflowWarning::page);

    Ok(Pagination { pages, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::BlockKind;
    use crate::layout::flow::LineRun;

    // builds lines one inch tall, paragraph by paragraph
    fn body(paragraph_lengths: &[usize]) -> Vec<FlowedLine> {
        let mut lines = Vec::new();
        for (p, &len) in paragraph_lengths.iter().enumerate() {
            for k in 0..len {
                lines.push(FlowedLine {
                    runs: vec![LineRun {
                        text: format!("p{p} l{k}"),
                        bold: false,
                        width: In(1.0),
                    }],
                    width: In(1.0),
                    height: In(1.0),
                    indent: In(0.0),
                    space_before: In(0.0),
                    paragraph: p,
                    first: k == 0,
                    last: k + 1 == len,
                    overflow: false,
                    heading: false,
                });
            }
        }
        lines
    }

    fn block(height: f32) -> FixedBlock {
        FixedBlock {
            kind: BlockKind::Closing,
            space_before: In(0.5),
            parts: vec![BlockPart::Gap(In(height))],
        }
    }

    fn budget(first: f32, continuation: f32) -> PageBudget {
        PageBudget {
            first: In(first),
            continuation: In(continuation),
        }
    }

    fn page_lines(plan: &Pagination) -> Vec<Vec<usize>> {
        plan.pages
            .iter()
            .map(|p| {
                p.items
                    .iter()
                    .filter_map(|item| match item {
                        PlanItem::Line(i) => Some(*i),
                        PlanItem::Block(_) => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn everything_fits_on_one_page() {
        let plan = paginate(&body(&[3]), &[block(1.0)], &budget(5.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(plan.total(), 1);
        assert_eq!(plan.pages[0].items.last(), Some(&PlanItem::Block(0)));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn orphan_moves_to_next_page() {
        // page 1 holds 4: paragraph 0 has 3 lines, paragraph 1 would start on line 4
        let plan = paginate(&body(&[3, 4]), &[], &budget(4.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1, 2], vec![3, 4, 5, 6]]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn widow_pulls_previous_line_forward() {
        // 5-line paragraph on a 4-line first page would leave line 4 alone
        let plan = paginate(&body(&[5]), &[], &budget(4.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1, 2], vec![3, 4]]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn widow_pull_takes_first_line_too_rather_than_orphan_it() {
        // paragraph 1 has 3 lines and starts on the last two slots of page 1
        let plan = paginate(&body(&[2, 3]), &[], &budget(4.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1], vec![2, 3, 4]]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn unavoidable_widow_is_warned() {
        // a 3-line paragraph alone on a continuation page that holds 2
        let plan = paginate(&body(&[1, 3]), &[], &budget(1.0, 2.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0], vec![1, 2], vec![3]]);
        assert_eq!(
            plan.warnings,
            vec![OverflowWarning::Widow {
                page: 3,
                paragraph: 1
            }]
        );
    }

    #[test]
    fn disabled_policy_warns_instead_of_moving() {
        let policy = WidowOrphanPolicy {
            orphans: false,
            widows: false,
            headings: false,
        };
        let plan = paginate(&body(&[3, 4]), &[], &budget(4.0, 8.0), &policy).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(
            plan.warnings,
            vec![OverflowWarning::Orphan {
                page: 1,
                paragraph: 1
            }]
        );
    }

    #[test]
    fn blocks_move_whole_and_drop_space_at_page_top() {
        let plan = paginate(&body(&[3]), &[block(2.0)], &budget(4.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(plan.total(), 2);
        assert_eq!(plan.pages[1].items, vec![PlanItem::Block(0)]);
    }

    #[test]
    fn overflowing_words_are_reported_on_their_page() {
        let mut lines = body(&[1, 1]);
        lines[1].overflow = true;
        let plan = paginate(&lines, &[], &budget(1.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(
            plan.warnings,
            vec![OverflowWarning::WordOverflow {
                page: 2,
                paragraph: 1,
                word: "p1 l0".into()
            }]
        );
    }

    #[test]
    fn overflowing_words_in_blocks_are_reported() {
        let mut line = body(&[1]).remove(0);
        line.paragraph = 1;
        line.overflow = true;
        let postscript = FixedBlock {
            kind: BlockKind::Postscript,
            space_before: In(0.0),
            parts: vec![BlockPart::Line(line)],
        };
        let plan = paginate(&body(&[1]), &[postscript], &budget(1.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(plan.pages[1].items, vec![PlanItem::Block(0)]);
        assert_eq!(
            plan.warnings,
            vec![OverflowWarning::WordOverflow {
                page: 2,
                paragraph: 1,
                word: "p0 l0".into()
            }]
        );
    }

    #[test]
    fn heading_moves_to_keep_lines_of_the_next_paragraph() {
        // heading would be line 4 of 5 with only one line of paragraph 2 after it
        let mut lines = body(&[3, 1, 6]);
        lines[3].heading = true;
        let plan = paginate(&lines, &[], &budget(5.0, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1, 2], vec![3, 4, 5, 6, 7, 8, 9]]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn heading_in_the_bottom_third_moves_on() {
        // the heading and both lines after it fit, but it would start 7in down a 10in page
        let mut lines = body(&[7, 1, 2]);
        lines[7].heading = true;
        let plan = paginate(&lines, &[], &budget(10.0, 10.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![0, 1, 2, 3, 4, 5, 6], vec![7, 8, 9]]);

        let policy = WidowOrphanPolicy {
            headings: false,
            ..Default::default()
        };
        let plan = paginate(&lines, &[], &budget(10.0, 10.0), &policy).unwrap();
        assert_eq!(page_lines(&plan), vec![(0..10).collect::<Vec<_>>()]);
    }

    #[test]
    fn heading_with_room_stays_put() {
        let mut lines = body(&[2, 1, 4]);
        lines[2].heading = true;
        let plan = paginate(&lines, &[], &budget(9.0, 9.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(plan.total(), 1);
    }

    #[test]
    fn too_tall_block_is_a_geometry_error() {
        let result = paginate(&body(&[1]), &[block(9.0)], &budget(4.0, 8.0), &WidowOrphanPolicy::default());
        assert!(matches!(result, Err(LetterError::Geometry(_))));
    }

    #[test]
    fn first_page_too_short_for_any_line() {
        let plan = paginate(&body(&[2]), &[], &budget(0.5, 8.0), &WidowOrphanPolicy::default()).unwrap();
        assert_eq!(page_lines(&plan), vec![vec![], vec![0, 1]]);
    }
}
