use chrono::NaiveDate;
use window_letter::geometry::{RECIPIENT_WINDOW, RETURN_WINDOW};
use window_letter::layout::Margins;
use window_letter::*;

fn address(name: &str, street: &str) -> AddressBlock {
    AddressBlock {
        name: Some(name.into()),
        street_1: Some(street.into()),
        city: Some("Springfield".into()),
        state: Some("IL".into()),
        zip: Some("62701".into()),
        ..Default::default()
    }
}

fn letter(paragraphs: Vec<String>) -> LetterDocument {
    LetterDocument {
        metadata: Metadata::new(NaiveDate::from_ymd_opt(2025, 10, 24).unwrap()),
        return_address: address("John Smith", "123 Main Street"),
        recipient_address: address("Jane Doe", "100 Constitution Ave"),
        content: ContentBody {
            salutation: "Dear Ms. Doe".into(),
            paragraphs: paragraphs.into_iter().map(Paragraph::plain).collect(),
            closing: "Sincerely".into(),
            ..Default::default()
        },
        formatting: FormattingSpec::default(),
        fold_lines: FoldLineSpec::default(),
        header_footer: Some(HeaderFooterSpec::default()),
        signature: None,
    }
}

fn long_letter() -> LetterDocument {
    letter((0..5).map(|_| lipsum::lipsum(150)).collect())
}

fn fold_marks(page: &PageLayout) -> Vec<&LineElement> {
    let length: In = Mm(4.0).into();
    page.lines()
        .filter(|line| (line.length().0 - length.0).abs() < 1e-4 && line.from.y == line.to.y)
        .collect()
}

#[test]
fn short_letter_fits_one_page_with_addresses_in_the_windows() {
    let doc = letter(vec![lipsum::lipsum(20)]);
    let letter = LayoutEngine::default().layout(&doc).unwrap();

    assert_eq!(letter.page_count(), 1);
    assert!(letter.warnings.is_empty());
    let page = &letter.pages[0];
    assert_eq!(page.index, 1);

    let sender = page.find_text("John Smith").expect("return address is drawn");
    assert_eq!(sender.origin, RETURN_WINDOW.origin());
    let recipient = page.find_text("Jane Doe").expect("recipient address is drawn");
    assert_eq!(recipient.origin, RECIPIENT_WINDOW.origin());

    let city = page.find_text("Springfield, IL 62701").unwrap();
    assert!(city.origin.y.0 < RETURN_WINDOW.y2.0);

    assert!(page.find_text("October 24, 2025").is_some());
    assert!(page.find_text("Dear Ms. Doe:").is_some());
    assert!(page.find_text("Sincerely,").is_some());
    assert!(
        page.texts().all(|t| !t.text.starts_with("Page ")),
        "single page letters have no header or footer"
    );
}

#[test]
fn long_letter_gets_headers_and_numbered_footers() {
    let doc = long_letter();
    let letter = LayoutEngine::default().layout(&doc).unwrap();

    let total = letter.page_count();
    assert!(total >= 2, "expected several pages, got {total}");

    for page in letter.pages.iter() {
        let footer = format!("Page {} of {}", page.index, total);
        let footer = page.find_text(&footer).expect("every page has a numbered footer");
        assert!(footer.origin.y.0 > 9.5);
        assert_eq!(footer.colour, colours::FOOTER_GREY);
    }

    let second = &letter.pages[1];
    let name = second.find_text("Jane Doe").expect("header names the recipient");
    assert_eq!(name.origin, Point::new(In(1.25), In(1.25)));
    assert_eq!(name.font.size, Pt(10.0));
    assert!(second.find_text("October 24, 2025").is_some());
    assert!(second.find_text("Page 2").is_some());

    // header text and rules sit above the body
    let body_top = second
        .texts()
        .filter(|t| t.font.size == Pt(12.0))
        .map(|t| t.origin.y.0)
        .fold(f32::INFINITY, f32::min);
    assert!(body_top > name.origin.y.0);

    // continuation pages don't repeat the address area
    assert!(second.find_text("Springfield, IL 62701").is_none());
}

#[test]
fn body_never_runs_into_the_footer() {
    let letter = LayoutEngine::default().layout(&long_letter()).unwrap();
    for page in letter.pages.iter() {
        let footer_top = page
            .texts()
            .filter(|t| t.text.starts_with("Page ") && t.text.contains(" of "))
            .map(|t| t.origin.y.0)
            .next()
            .unwrap();
        for text in page.texts().filter(|t| t.font.size == Pt(12.0)) {
            assert!(text.origin.y.0 + 0.25 <= footer_top, "{:?} overlaps the footer", text.text);
        }
    }
}

#[test]
fn every_page_has_fold_marks_in_both_margins() {
    let letter = LayoutEngine::default().layout(&long_letter()).unwrap();
    let inset: In = Mm(3.0).into();

    for page in letter.pages.iter() {
        let marks = fold_marks(page);
        assert_eq!(marks.len(), 4, "page {}", page.index);
        for offset in [3.67, 7.33] {
            let at_offset: Vec<_> = marks.iter().filter(|m| m.from.y == In(offset)).collect();
            assert_eq!(at_offset.len(), 2);
            assert!(at_offset.iter().any(|m| (m.from.x.0 - inset.0).abs() < 1e-5));
            assert!(at_offset.iter().any(|m| (m.to.x.0 - (8.5 - inset.0)).abs() < 1e-5));
        }
        assert!(marks.iter().all(|m| m.colour == colours::RULE_GREY && m.width == Pt(0.5)));
    }
}

#[test]
fn fold_marks_can_be_turned_off() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    doc.fold_lines.enabled = false;
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    assert!(fold_marks(&letter.pages[0]).is_empty());
}

#[test]
fn overlong_word_in_the_postscript_is_reported() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    let word = "x".repeat(120);
    doc.content.postscript = Some(format!("See {word} soon."));
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    assert!(letter.warnings.iter().any(|w| matches!(
        w,
        OverflowWarning::WordOverflow { paragraph: 1, word: overflowing, .. } if overflowing == &word
    )));
}

#[test]
fn dashed_fold_marks_keep_their_place() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    doc.fold_lines.line_style = LineStyle::Dashed;
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let marks = fold_marks(&letter.pages[0]);
    assert_eq!(marks.len(), 4);
    assert!(marks.iter().all(|m| m.style == LineStyle::Dashed));
    assert!(letter.pages[0]
        .lines()
        .filter(|line| !marks.iter().any(|m| std::ptr::eq(*m, *line)))
        .all(|line| line.style == LineStyle::Solid));
}

#[test]
fn page_1_header_sits_above_the_return_window() {
    let mut doc = long_letter();
    let bands = doc.header_footer.as_mut().unwrap();
    bands.first_page_header.enabled = true;
    bands.first_page_header.right = "Personal and Confidential".into();
    let with_header = LayoutEngine::default().layout(&doc).unwrap();

    let page = &with_header.pages[0];
    let header = page.find_text("Personal and Confidential").expect("page 1 header");
    assert_eq!(header.font.size, Pt(10.0));
    let bottom = header.origin.y.0 + 10.0 * 1.2 / 72.0;
    assert!(bottom < RETURN_WINDOW.y1.0);
    let rule = page
        .lines()
        .find(|line| line.from.y == line.to.y && line.from.y.0 < RETURN_WINDOW.y1.0)
        .expect("rule under the page 1 header");
    assert!(rule.from.y.0 > bottom);
    assert!(with_header.pages[1..]
        .iter()
        .all(|p| p.find_text("Personal and Confidential").is_none()));

    doc.header_footer.as_mut().unwrap().first_page_header.enabled = false;
    let without = LayoutEngine::default().layout(&doc).unwrap();
    assert_eq!(without.page_count(), with_header.page_count());
    assert!(without.pages[0].find_text("Personal and Confidential").is_none());
}

#[test]
fn image_signature_is_drawn_at_its_size_with_names_below() {
    let mut doc = letter(vec![lipsum::lipsum(40)]);
    doc.signature = Some(Signature::Image {
        path: "signature.png".into(),
        width: In(2.0),
        height: In(0.75),
        typed_name: "J. Smith".into(),
        title: Some("Director".into()),
    });
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let page = letter.pages.last().unwrap();

    let images: Vec<_> = page.images().collect();
    assert_eq!(images.len(), 1);
    let image = images[0];
    assert_eq!(image.width, In(2.0));
    assert_eq!(image.height, In(0.75));
    assert_eq!(image.origin.x, In(1.25));

    let name = page.find_text("J. Smith").unwrap();
    let title = page.find_text("Director").unwrap();
    assert_eq!(name.origin.x, image.origin.x);
    assert!((name.origin.y.0 - (image.origin.y.0 + 0.75)).abs() < 1e-5);
    assert!((title.origin.y.0 - (name.origin.y.0 + 0.25)).abs() < 1e-5);

    let closing = page.find_text("Sincerely,").unwrap();
    assert!(closing.origin.y < image.origin.y);
}

#[test]
fn trailing_blocks_follow_the_closing() {
    let mut doc = letter(vec![lipsum::lipsum(40)]);
    doc.signature = Some(Signature::Typed {
        typed_name: "J. Smith".into(),
        title: None,
    });
    doc.content.postscript = Some("See you soon.".into());
    doc.content.enclosures = vec!["Resume".into()];
    doc.content.cc = vec!["Bob Jones".into()];
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let page = letter.pages.last().unwrap();

    let y = |text: &str| page.find_text(text).unwrap().origin.y.0;
    assert!(y("Sincerely,") + 0.75 < y("J. Smith"));
    assert!(y("J. Smith") < y("P.S. See you soon."));
    assert!(y("P.S. See you soon.") < y("Enclosures:"));
    assert!(y("Enclosures:") < y("- Resume"));
    assert!(y("- Resume") < y("cc:"));
    let cc = page.find_text("Bob Jones").unwrap();
    assert_eq!(cc.origin.x, In(1.5));
}

#[test]
fn window_positions_ignore_margins_and_fonts() {
    let mut doc = letter(vec![lipsum::lipsum(60)]);
    doc.formatting.margins = Margins::all(In(0.75));
    doc.formatting.font_size = Pt(14.0);
    doc.formatting.font_family = FontFamily::Helvetica;
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let page = &letter.pages[0];
    assert_eq!(page.find_text("John Smith").unwrap().origin, RETURN_WINDOW.origin());
    assert_eq!(page.find_text("Jane Doe").unwrap().origin, RECIPIENT_WINDOW.origin());
}

#[test]
fn crowded_address_shrinks_to_fit_its_window() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    doc.recipient_address = AddressBlock {
        honorific: Some("The Honorable".into()),
        name: Some("Jane Doe".into()),
        title: Some("United States Senator".into()),
        organization: Some("United States Senate".into()),
        street_1: Some("Hart Senate Office Building".into()),
        street_2: Some("Room 100".into()),
        city: Some("Washington".into()),
        state: Some("DC".into()),
        zip: Some("20510".into()),
    };
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let page = &letter.pages[0];

    let first = page.find_text("The Honorable Jane Doe").unwrap();
    let last = page.find_text("Washington, DC 20510").unwrap();
    assert!(first.font.size < Pt(12.0));
    let bottom = last.origin.y.0 + first.font.size.0 * 1.2 / 72.0;
    assert!(bottom <= RECIPIENT_WINDOW.y2.0 + 1e-4);
}

/// Standard widths with double-spaced line boxes
struct TallLines;

impl TextMetrics for TallLines {
    fn text_width(&self, text: &str, font: &SpanFont) -> Pt {
        StandardFonts.text_width(text, font)
    }

    fn line_height(&self, font: &SpanFont) -> Pt {
        font.size * 2.0
    }
}

#[test]
fn address_leading_from_the_metrics_stays_inside_the_window() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    doc.recipient_address.organization = Some("Doe Holdings".into());
    let letter = LayoutEngine::new(TallLines).layout(&doc).unwrap();
    let page = &letter.pages[0];

    let first = page.find_text("Jane Doe").unwrap();
    let last = page.find_text("Springfield, IL 62701").unwrap();
    assert!(first.font.size < Pt(12.0));
    let leading = first.font.size.0 * 2.0 / 72.0;
    assert!(last.origin.y.0 + leading <= RECIPIENT_WINDOW.y2.0 + 1e-4);
}

#[test]
fn layout_is_deterministic() {
    let doc = long_letter();
    let engine = LayoutEngine::default();
    assert_eq!(engine.layout(&doc).unwrap(), engine.layout(&doc).unwrap());
}

#[test]
fn letters_load_from_json_and_render_to_pdf() {
    let json = include_str!("../demos/letter.json");
    let doc = LetterDocument::from_json(json).unwrap();
    assert_eq!(doc.fold_lines.line_style, LineStyle::Dashed);
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    assert!(letter.page_count() >= 1);
    assert!(fold_marks(&letter.pages[0]).iter().all(|m| m.style == LineStyle::Dashed));

    let mut sink = PdfSink::for_letter(&doc);
    render_letter(&letter, &mut sink).unwrap();
    assert_eq!(sink.page_count(), letter.page_count());
    let bytes = sink.finish().unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn subject_is_bold_and_precedes_the_salutation() {
    let mut doc = letter(vec![lipsum::lipsum(20)]);
    doc.content.subject = Some("Re: H.R. 1234".into());
    let letter = LayoutEngine::default().layout(&doc).unwrap();
    let page = &letter.pages[0];
    let subject = page.find_text("Re: H.R. 1234").unwrap();
    let salutation = page.find_text("Dear Ms. Doe:").unwrap();
    assert_eq!(subject.font.style, FontStyle::Bold);
    assert_eq!(subject.origin.y, In(3.5));
    assert!(salutation.origin.y > subject.origin.y);
}
