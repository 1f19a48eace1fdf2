//! Content stream rendering for laid out pages.

use crate::colour::Colour;
use crate::font::{FontFamily, FontStyle, StandardFonts, TextMetrics};
use crate::page::{LineElement, PageLayout, PlacedElement, TextElement};
use crate::units::*;
use std::io::Write;

/// Converts a top-left, inch based position to PDF user space, which has its
/// origin at the bottom left and counts in points
pub(crate) struct PageSpace {
    height: Pt,
}

impl PageSpace {
    pub fn new(page: &PageLayout) -> PageSpace {
        PageSpace {
            height: page.size.1.into(),
        }
    }

    pub fn x(&self, x: In) -> f32 {
        Pt::from(x).0
    }

    pub fn y(&self, y: In) -> f32 {
        (self.height - Pt::from(y)).0
    }
}

/// Resource names of the fonts and images a page refers to
pub(crate) trait Resources {
    fn font_index(&mut self, family: FontFamily, style: FontStyle) -> usize;
    /// `None` when the image couldn't be loaded, in which case it is left out
    fn image_index(&mut self, path: &std::path::Path) -> Option<usize>;
}

#[allow(clippy::write_with_newline)]
pub(crate) fn render_page<R: Resources>(page: &PageLayout, resources: &mut R) -> Result<Vec<u8>, std::io::Error> {
    let space = PageSpace::new(page);
    let mut content: Vec<u8> = Vec::default();

    for element in page.elements.iter() {
        match element {
            PlacedElement::Text(text) => render_text(&mut content, &space, text, resources)?,
            PlacedElement::Line(line) => render_line(&mut content, &space, line)?,
            PlacedElement::Image(image) => {
                let Some(index) = resources.image_index(&image.path) else {
                    continue;
                };
                let width = Pt::from(image.width).0;
                let height = Pt::from(image.height).0;
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    width,
                    height,
                    space.x(image.origin.x),
                    space.y(image.origin.y + image.height)
                )?;
                write!(&mut content, "/I{} Do\n", index)?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text<R: Resources>(
    content: &mut Vec<u8>,
    space: &PageSpace,
    text: &TextElement,
    resources: &mut R,
) -> Result<(), std::io::Error> {
    if text.text.is_empty() {
        return Ok(());
    }
    let font = resources.font_index(text.font.family, text.font.style);
    // origins are the top of the line box
    let baseline = space.y(text.origin.y) - StandardFonts.ascent(&text.font).0;

    write!(content, "q\n")?;
    write_colour(content, text.colour, false)?;
    write!(content, "BT\n")?;
    write!(content, "/F{} {} Tf\n", font, text.font.size)?;
    write!(content, "{} {} Td\n", space.x(text.origin.x), baseline)?;
    write!(content, "<")?;
    for byte in encode_win_ansi(&text.text) {
        write!(content, "{:02x}", byte)?;
    }
    write!(content, "> Tj\n")?;
    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_line(content: &mut Vec<u8>, space: &PageSpace, line: &LineElement) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write_colour(content, line.colour, true)?;
    write!(content, "{} w\n", line.width)?;
    let dash = line.style.dash_pattern();
    if !dash.is_empty() {
        let lengths: Vec<String> = dash.iter().map(|pt| pt.to_string()).collect();
        write!(content, "[{}] 0 d\n", lengths.join(" "))?;
    }
    write!(content, "{} {} m\n", space.x(line.from.x), space.y(line.from.y))?;
    write!(content, "{} {} l\n", space.x(line.to.x), space.y(line.to.y))?;
    write!(content, "S\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(content, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(content, "{r} {g} {b} RG\n"),
        (Colour::Grey { g }, false) => write!(content, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(content, "{g} G\n"),
    }
}

/// Encode text for the standard fonts' WinAnsi encoding. Characters it can't
/// represent become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '•' => 0x95,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::font::SpanFont;
    use crate::pagesize::LETTER;
    use crate::page::{ImageElement, LineStyle};
    use crate::rect::Point;

    struct NoImages;

    impl Resources for NoImages {
        fn font_index(&mut self, _family: FontFamily, style: FontStyle) -> usize {
            match style {
                FontStyle::Regular => 0,
                FontStyle::Bold => 1,
            }
        }

        fn image_index(&mut self, _path: &std::path::Path) -> Option<usize> {
            None
        }
    }

    #[test]
    fn flips_y_axis_and_converts_to_points() {
        let mut page = PageLayout::new(1, LETTER);
        page.add_line(LineElement {
            from: Point::new(In(1.0), In(1.0)),
            to: Point::new(In(2.0), In(1.0)),
            width: Pt(0.5),
            colour: colours::RULE_GREY,
            style: LineStyle::Solid,
        });
        let rendered = String::from_utf8(render_page(&page, &mut NoImages).unwrap()).unwrap();
        assert!(rendered.contains("72 720 m\n"));
        assert!(rendered.contains("144 720 l\n"));
        assert!(rendered.contains("0.8 G\n"));
        assert!(!rendered.contains(" d\n"));
    }

    #[test]
    fn dashed_lines_set_a_dash_pattern() {
        let mut page = PageLayout::new(1, LETTER);
        page.add_line(LineElement {
            from: Point::new(In(0.1), In(3.5)),
            to: Point::new(In(0.25), In(3.5)),
            width: Pt(0.5),
            colour: colours::RULE_GREY,
            style: LineStyle::Dashed,
        });
        let rendered = String::from_utf8(render_page(&page, &mut NoImages).unwrap()).unwrap();
        let dash = rendered.find("[3 2] 0 d\n").unwrap();
        assert!(dash < rendered.find(" m\n").unwrap());
    }

    #[test]
    fn text_sits_on_its_baseline() {
        let mut page = PageLayout::new(1, LETTER);
        page.add_text(TextElement {
            text: "Hi".into(),
            font: SpanFont::bold(FontFamily::Courier, Pt(10.0)),
            colour: colours::BLACK,
            origin: Point::new(In(1.0), In(1.0)),
        });
        let rendered = String::from_utf8(render_page(&page, &mut NoImages).unwrap()).unwrap();
        assert!(rendered.contains("/F1 10 Tf\n"));
        let td = rendered.lines().find(|l| l.ends_with(" Td")).unwrap();
        let coords: Vec<f32> = td.split_whitespace().take(2).map(|n| n.parse().unwrap()).collect();
        // Courier ascent is 629/1000 em
        assert_eq!(coords[0], 72.0);
        assert!((coords[1] - (720.0 - 6.29)).abs() < 1e-3);
        assert!(rendered.contains("<4869> Tj\n"));
    }

    #[test]
    fn unloadable_images_are_skipped() {
        let mut page = PageLayout::new(1, LETTER);
        page.add_image(ImageElement {
            path: "missing.png".into(),
            origin: Point::new(In(1.0), In(1.0)),
            width: In(2.0),
            height: In(0.75),
        });
        assert!(render_page(&page, &mut NoImages).unwrap().is_empty());
    }

    #[test]
    fn win_ansi_maps_typographic_quotes() {
        assert_eq!(encode_win_ansi("It’s “ok” — é ✓"), b"It\x92s \x93ok\x94 \x97 \xe9 ?".to_vec());
    }
}
