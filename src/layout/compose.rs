//! Turns a planned page into positioned elements.

use super::blocks::{BlockPart, FixedBlock};
use super::flow::FlowedLine;
use super::paginate::{PlanItem, PlannedPage};
use crate::colour::colours;
use crate::document::{ContentBody, LetterDocument};
use crate::font::{FontStyle, SpanFont, TextMetrics};
use crate::formatting::{BandSpec, BandText, BandValues, FormattingSpec};
use crate::geometry::{self, Placement, Side, FIXED_LINE_SPACING, PAGE, RECIPIENT_WINDOW, RETURN_WINDOW};
use crate::page::{ImageElement, LineElement, LineStyle, PageLayout, TextElement};
use crate::rect::{Point, Rect};
use crate::units::*;

/// Space between a band's text and the body, the rule sits in the middle of it
pub const BAND_GAP: In = In(0.125);

/// Stroke width of header and footer rules
pub const BAND_RULE_WIDTH: Pt = Pt(0.5);

/// Vertical space a header or footer band takes away from the body
pub fn band_height(spec: &BandSpec, text: &BandText) -> In {
    if !spec.enabled || text.is_empty() {
        return In(0.0);
    }
    let lines = text.line_count() as f32;
    In::from(Pt(spec.font_size.0 * FIXED_LINE_SPACING * lines)) + BAND_GAP
}

/// Height of the subject and salutation lines that open the body on page 1
pub fn opening_height(formatting: &FormattingSpec, content: &ContentBody) -> In {
    let line: In = formatting.body_line_height() + formatting.paragraph_spacing.into();
    let subject = match subject_line(content) {
        Some(_) => line,
        None => In(0.0),
    };
    subject + line
}

fn subject_line(content: &ContentBody) -> Option<&str> {
    content.subject.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn salutation_line(content: &ContentBody) -> String {
    let salutation = content.salutation.trim().trim_end_matches([':', ',']);
    format!("{salutation}:")
}

/// Everything the composer needs besides the plan of the page itself
pub struct ComposeContext<'a, M: TextMetrics + ?Sized> {
    pub document: &'a LetterDocument,
    pub metrics: &'a M,
    pub body: &'a [FlowedLine],
    pub blocks: &'a [FixedBlock],
    pub values: BandValues<'a>,
    /// Number of pages in the letter
    pub total: usize,
    /// Height reserved for the header on continuation pages
    pub header_height: In,
    /// Height reserved for the footer on every page
    pub footer_height: In,
}

impl<'a, M: TextMetrics + ?Sized> ComposeContext<'a, M> {
    fn formatting(&self) -> &FormattingSpec {
        &self.document.formatting
    }

    fn body_font(&self, bold: bool) -> SpanFont {
        let formatting = self.formatting();
        SpanFont {
            family: formatting.font_family,
            style: FontStyle::from_bold(bold),
            size: formatting.font_size,
        }
    }

    fn width_of(&self, text: &str, font: &SpanFont) -> In {
        self.metrics.text_width(text, font).into()
    }
}

/// Lay out one planned page. Elements are emitted in drawing order: fold marks,
/// header, the page 1 address area, body lines and blocks, then the footer.
/// Page 1 only gets a header when the letter asks for one; it sits above the
/// return window and takes no room from the body.
pub fn compose<M: TextMetrics + ?Sized>(page: &PlannedPage, ctx: &ComposeContext<'_, M>) -> PageLayout {
    let mut layout = PageLayout::new(page.index, PAGE);

    fold_marks(&mut layout, ctx);

    if let Some(header_footer) = &ctx.document.header_footer {
        if page.index == 1 {
            let header = &header_footer.first_page_header;
            let text = header.render(&ctx.values, page.index, Some(ctx.total));
            header_band(&mut layout, ctx, header, Placement::FirstPageHeader, band_height(header, &text));
        } else {
            header_band(&mut layout, ctx, &header_footer.header, Placement::Header, ctx.header_height);
        }
    }

    let reserved = if page.index == 1 {
        opening(&mut layout, ctx)
    } else {
        ctx.header_height
    };

    let start = geometry::resolve(Placement::Body { reserved }, page.index, ctx.formatting());
    let mut y = start.y;
    for (k, item) in page.items.iter().enumerate() {
        let opens_page = k == 0;
        match item {
            PlanItem::Line(i) => {
                let line = &ctx.body[*i];
                if !opens_page {
                    y += line.space_before;
                }
                body_line(&mut layout, ctx, line, Point::new(start.x + line.indent, y));
                y += line.height;
            }
            PlanItem::Block(i) => {
                let block = &ctx.blocks[*i];
                if !opens_page {
                    y += block.space_before;
                }
                y = fixed_block(&mut layout, ctx, block, Point::new(start.x, y));
            }
        }
    }

    if ctx.total > 1 {
        if let Some(header_footer) = &ctx.document.header_footer {
            let footer = &header_footer.footer;
            if footer.enabled {
                let text = footer.render(&ctx.values, page.index, Some(ctx.total));
                let origin = geometry::resolve(
                    Placement::Footer {
                        height: ctx.footer_height,
                    },
                    page.index,
                    ctx.formatting(),
                );
                if footer.rule && !text.is_empty() {
                    band_rule(&mut layout, ctx, origin.y + BAND_GAP / 2.0);
                }
                band_text(&mut layout, ctx, footer, &text, origin.y + BAND_GAP);
            }
        }
    }

    layout
}

fn fold_marks<M: TextMetrics + ?Sized>(layout: &mut PageLayout, ctx: &ComposeContext<'_, M>) {
    let fold_lines = &ctx.document.fold_lines;
    if !fold_lines.enabled {
        return;
    }
    let length: In = fold_lines.mark_length.into();
    let inset: In = fold_lines.edge_offset.into();
    for offset in fold_lines.offsets.iter().copied() {
        for side in [Side::Left, Side::Right] {
            let from = geometry::resolve(
                Placement::FoldMark {
                    offset,
                    side,
                    length,
                    inset,
                },
                layout.index,
                ctx.formatting(),
            );
            layout.add_line(LineElement {
                from,
                to: Point::new(from.x + length, from.y),
                width: fold_lines.line_width,
                colour: fold_lines.colour,
                style: fold_lines.line_style,
            });
        }
    }
}

fn address_block<M: TextMetrics + ?Sized>(
    layout: &mut PageLayout,
    ctx: &ComposeContext<'_, M>,
    lines: &[String],
    window: &Rect,
    origin: Point,
) {
    let formatting = ctx.formatting();
    let natural = SpanFont::regular(formatting.font_family, formatting.font_size);
    let (size, leading) = geometry::fit_font_size(
        lines.len(),
        window,
        formatting.font_size,
        ctx.metrics.line_height(&natural),
    );
    let font = SpanFont::regular(formatting.font_family, size);
    let leading: In = leading.into();
    for (k, line) in lines.iter().enumerate() {
        layout.add_text(TextElement {
            text: line.clone(),
            font,
            colour: colours::BLACK,
            origin: Point::new(origin.x, origin.y + leading * k as f32),
        });
    }
}

// page 1 only: address windows, date, subject and salutation. Returns the
// height taken above the body.
fn opening<M: TextMetrics + ?Sized>(layout: &mut PageLayout, ctx: &ComposeContext<'_, M>) -> In {
    let document = ctx.document;
    let formatting = ctx.formatting();

    let return_origin = geometry::resolve(Placement::ReturnWindow, 1, formatting);
    address_block(layout, ctx, &document.return_address.lines(), &RETURN_WINDOW, return_origin);

    let date = document.metadata.formatted_date();
    let font = ctx.body_font(false);
    let width = ctx.width_of(&date, &font);
    layout.add_text(TextElement {
        text: date,
        font,
        colour: colours::BLACK,
        origin: geometry::resolve(Placement::Date { width }, 1, formatting),
    });

    let recipient_origin = geometry::resolve(Placement::RecipientWindow, 1, formatting);
    address_block(
        layout,
        ctx,
        &document.recipient_address.lines(),
        &RECIPIENT_WINDOW,
        recipient_origin,
    );

    let top = geometry::resolve(Placement::Body { reserved: In(0.0) }, 1, formatting);
    let step = formatting.body_line_height() + formatting.paragraph_spacing.into();
    let mut y = top.y;
    if let Some(subject) = subject_line(&document.content) {
        layout.add_text(TextElement {
            text: subject.to_string(),
            font: ctx.body_font(true),
            colour: colours::BLACK,
            origin: Point::new(top.x, y),
        });
        y += step;
    }
    layout.add_text(TextElement {
        text: salutation_line(&document.content),
        font: ctx.body_font(false),
        colour: colours::BLACK,
        origin: Point::new(top.x, y),
    });

    opening_height(formatting, &document.content)
}

fn body_line<M: TextMetrics + ?Sized>(
    layout: &mut PageLayout,
    ctx: &ComposeContext<'_, M>,
    line: &FlowedLine,
    origin: Point,
) {
    let mut x = origin.x;
    for run in line.runs.iter() {
        layout.add_text(TextElement {
            text: run.text.clone(),
            font: ctx.body_font(run.bold),
            colour: colours::BLACK,
            origin: Point::new(x, origin.y),
        });
        x += run.width;
    }
}

// returns the y just below the block
fn fixed_block<M: TextMetrics + ?Sized>(
    layout: &mut PageLayout,
    ctx: &ComposeContext<'_, M>,
    block: &FixedBlock,
    origin: Point,
) -> In {
    let mut y = origin.y;
    for part in block.parts.iter() {
        match part {
            BlockPart::Text { text, indent, .. } => layout.add_text(TextElement {
                text: text.clone(),
                font: ctx.body_font(false),
                colour: colours::BLACK,
                origin: Point::new(origin.x + *indent, y),
            }),
            BlockPart::Image { path, width, height } => layout.add_image(ImageElement {
                path: path.clone(),
                origin: Point::new(origin.x, y),
                width: *width,
                height: *height,
            }),
            BlockPart::Line(line) => body_line(layout, ctx, line, Point::new(origin.x + line.indent, y)),
            BlockPart::Gap(_) => {}
        }
        y += part.height();
    }
    y
}

fn header_band<M: TextMetrics + ?Sized>(
    layout: &mut PageLayout,
    ctx: &ComposeContext<'_, M>,
    header: &BandSpec,
    placement: Placement,
    height: In,
) {
    if !header.enabled {
        return;
    }
    let text = header.render(&ctx.values, layout.index, Some(ctx.total));
    let origin = geometry::resolve(placement, layout.index, ctx.formatting());
    band_text(layout, ctx, header, &text, origin.y);
    if header.rule && !text.is_empty() {
        band_rule(layout, ctx, origin.y + height - BAND_GAP / 2.0);
    }
}

fn band_text<M: TextMetrics + ?Sized>(
    layout: &mut PageLayout,
    ctx: &ComposeContext<'_, M>,
    spec: &BandSpec,
    text: &BandText,
    top: In,
) {
    let formatting = ctx.formatting();
    let left = formatting.margins.left;
    let right = PAGE.0 - formatting.margins.right;
    let font = SpanFont::regular(formatting.font_family, spec.font_size);
    let leading: In = Pt(spec.font_size.0 * FIXED_LINE_SPACING).into();

    let slots: [(&str, fn(In, In, In) -> In); 3] = [
        (text.left.as_str(), |left, _, _| left),
        (text.center.as_str(), |left, right, width| left + (right - left - width) / 2.0),
        (text.right.as_str(), |_, right, width| right - width),
    ];
    for (slot, place) in slots {
        for (k, line) in slot.lines().enumerate().filter(|(_, l)| !l.is_empty()) {
            let width = ctx.width_of(line, &font);
            layout.add_text(TextElement {
                text: line.to_string(),
                font,
                colour: spec.colour,
                origin: Point::new(place(left, right, width), top + leading * k as f32),
            });
        }
    }
}

fn band_rule<M: TextMetrics + ?Sized>(layout: &mut PageLayout, ctx: &ComposeContext<'_, M>, y: In) {
    let margins = &ctx.formatting().margins;
    layout.add_line(LineElement {
        from: Point::new(margins.left, y),
        to: Point::new(PAGE.0 - margins.right, y),
        width: BAND_RULE_WIDTH,
        colour: colours::RULE_GREY,
        style: LineStyle::Solid,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::HeaderFooterSpec;

    #[test]
    fn band_height_counts_lines_and_gap() {
        let spec = HeaderFooterSpec::default().footer;
        let text = BandText {
            center: "Page 1 of 2".into(),
            ..Default::default()
        };
        // 10pt at 1.2 leading is 1/6in
        assert!((band_height(&spec, &text).0 - (1.0 / 6.0 + 0.125)).abs() < 1e-5);
        assert_eq!(band_height(&spec, &BandText::default()), In(0.0));
    }

    #[test]
    fn salutation_gets_a_single_colon() {
        let mut content = ContentBody {
            salutation: "Dear Senator Doe,".into(),
            ..Default::default()
        };
        assert_eq!(salutation_line(&content), "Dear Senator Doe:");
        content.salutation = "To whom it may concern:".into();
        assert_eq!(salutation_line(&content), "To whom it may concern:");
    }

    #[test]
    fn subject_adds_a_line_to_the_opening() {
        let formatting = FormattingSpec::default();
        let mut content = ContentBody::default();
        let without = opening_height(&formatting, &content);
        content.subject = Some("Re: HR 42".into());
        let with = opening_height(&formatting, &content);
        // 0.25in line plus 12pt spacing
        assert!((without.0 - (0.25 + 1.0 / 6.0)).abs() < 1e-5);
        assert!((with.0 - 2.0 * without.0).abs() < 1e-5);
    }
}
