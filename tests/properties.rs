use chrono::NaiveDate;
use proptest::prelude::*;
use window_letter::geometry::{RECIPIENT_WINDOW, RETURN_WINDOW};
use window_letter::layout::{
    paginate, FlowedLine, LineRun, Margins, PageBudget, PlanItem, WidowOrphanPolicy,
};
use window_letter::*;

fn letter(paragraphs: &[usize]) -> LetterDocument {
    let address = |name: &str| AddressBlock {
        name: Some(name.into()),
        street_1: Some("1 Main St".into()),
        city: Some("Springfield".into()),
        state: Some("IL".into()),
        zip: Some("62701".into()),
        ..Default::default()
    };
    LetterDocument {
        metadata: Metadata::new(NaiveDate::from_ymd_opt(2025, 10, 24).unwrap()),
        return_address: address("John Smith"),
        recipient_address: address("Jane Doe"),
        content: ContentBody {
            salutation: "Dear Jane".into(),
            paragraphs: paragraphs
                .iter()
                .map(|&words| Paragraph::plain(lipsum::lipsum(words)))
                .collect(),
            closing: "Sincerely".into(),
            ..Default::default()
        },
        formatting: FormattingSpec::default(),
        fold_lines: FoldLineSpec::default(),
        header_footer: Some(HeaderFooterSpec::default()),
        signature: None,
    }
}

fn body(paragraphs: &[usize]) -> Vec<FlowedLine> {
    let mut lines = Vec::new();
    for (p, &len) in paragraphs.iter().enumerate() {
        for k in 0..len {
            lines.push(FlowedLine {
                runs: vec![LineRun {
                    text: format!("{p}.{k}"),
                    bold: false,
                    width: In(1.0),
                }],
                width: In(1.0),
                height: In(0.25),
                indent: In(0.0),
                space_before: if k == 0 && p > 0 { In(0.125) } else { In(0.0) },
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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn page_numbers_agree_with_the_page_count(paragraphs in prop::collection::vec(20usize..200, 1..10)) {
        let letter = LayoutEngine::default().layout(&letter(&paragraphs)).unwrap();
        let total = letter.page_count();
        for (i, page) in letter.pages.iter().enumerate() {
            prop_assert_eq!(page.index, i + 1);
            let footer = format!("Page {} of {}", page.index, total);
            prop_assert_eq!(page.find_text(&footer).is_some(), total > 1);
        }
    }

    #[test]
    fn windows_never_move(
        margin in 0.5f32..1.5,
        size in 9.0f32..16.0,
        family in prop_oneof![
            Just(FontFamily::TimesRoman),
            Just(FontFamily::Helvetica),
            Just(FontFamily::Courier)
        ],
    ) {
        let mut doc = letter(&[60]);
        doc.formatting.margins = Margins::all(In(margin));
        doc.formatting.font_size = Pt(size);
        doc.formatting.font_family = family;
        let letter = LayoutEngine::default().layout(&doc).unwrap();
        let page = &letter.pages[0];
        prop_assert_eq!(page.find_text("John Smith").unwrap().origin, RETURN_WINDOW.origin());
        prop_assert_eq!(page.find_text("Jane Doe").unwrap().origin, RECIPIENT_WINDOW.origin());
    }

    #[test]
    fn layout_is_reproducible(paragraphs in prop::collection::vec(5usize..120, 1..6)) {
        let doc = letter(&paragraphs);
        let engine = LayoutEngine::new(FixedAdvance::new(0.5));
        prop_assert_eq!(engine.layout(&doc).unwrap(), engine.layout(&doc).unwrap());
    }

    #[test]
    fn stranded_lines_are_always_reported(
        paragraphs in prop::collection::vec(1usize..9, 1..12),
        first in 0.5f32..6.0,
        continuation in 1.0f32..8.0,
    ) {
        let lines = body(&paragraphs);
        let budget = PageBudget { first: In(first), continuation: In(continuation) };
        let plan = paginate(&lines, &[], &budget, &WidowOrphanPolicy::default()).unwrap();

        let placed: Vec<usize> = plan
            .pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter_map(|item| match item {
                PlanItem::Line(i) => Some(*i),
                PlanItem::Block(_) => None,
            })
            .collect();
        prop_assert_eq!(placed, (0..lines.len()).collect::<Vec<_>>());

        for page in plan.pages.iter() {
            let limit = if page.index == 1 { first } else { continuation };
            let used: f32 = page
                .items
                .iter()
                .enumerate()
                .map(|(k, item)| match item {
                    PlanItem::Line(i) => lines[*i].advance(k == 0).0,
                    PlanItem::Block(_) => 0.0,
                })
                .sum();
            prop_assert!(used <= limit + 1e-3, "page {} uses {} of {}", page.index, used, limit);

            if let Some(PlanItem::Line(i)) = page.items.last() {
                let line = &lines[*i];
                if line.first && !line.last {
                    let orphan = OverflowWarning::Orphan { page: page.index, paragraph: line.paragraph };
                    prop_assert!(plan.warnings.contains(&orphan), "unreported orphan on page {}", page.index);
                }
            }
            if let Some(PlanItem::Line(i)) = page.items.first() {
                let line = &lines[*i];
                if line.last && !line.first {
                    let widow = OverflowWarning::Widow { page: page.index, paragraph: line.paragraph };
                    prop_assert!(plan.warnings.contains(&widow), "unreported widow on page {}", page.index);
                }
            }
        }
    }
}
