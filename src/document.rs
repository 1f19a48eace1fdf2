use crate::{
    formatting::{BandOverrides, BandSpec, DatePosition, FoldLineSpec, FormattingSpec, HeaderFooterSpec, HeaderOverrides},
    geometry::{RECIPIENT_WINDOW, RETURN_WINDOW},
    layout::Margins,
    rect::Rect,
    units::In,
    LetterError, Result,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{io::Read, path::PathBuf};

/// A complete letter: who it is from, who it is to, what it says and how it
/// should be set. This is the input of [`crate::LayoutEngine`].
///
/// Build one in code or parse one with [`LetterDocument::from_json`]; either
/// way, [`LetterDocument::validate`] runs before any layout work happens.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterDocument {
    pub metadata: Metadata,
    pub return_address: AddressBlock,
    pub recipient_address: AddressBlock,
    pub content: ContentBody,
    pub formatting: FormattingSpec,
    pub fold_lines: FoldLineSpec,
    pub header_footer: Option<HeaderFooterSpec>,
    pub signature: Option<Signature>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterType {
    Formal,
    #[default]
    Business,
    Congressional,
    Personal,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// October 24, 2025
    #[default]
    Full,
    /// Oct 24, 2025
    Abbreviated,
    /// 2025-10-24
    #[serde(alias = "custom")]
    Iso,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Metadata {
    #[serde(default, rename = "type")]
    pub letter_type: LetterType,
    #[serde(default = "today")]
    pub date: NaiveDate,
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default = "default_reference")]
    pub reference_id: String,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn default_reference() -> String {
    "letter_001".into()
}

impl Metadata {
    pub fn new(date: NaiveDate) -> Metadata {
        Metadata {
            letter_type: LetterType::default(),
            date,
            date_format: DateFormat::default(),
            reference_id: default_reference(),
        }
    }

    /// The letter date as printed on the page
    pub fn formatted_date(&self) -> String {
        match self.date_format {
            DateFormat::Full => self.date.format("%B %-d, %Y").to_string(),
            DateFormat::Abbreviated => self.date.format("%b %-d, %Y").to_string(),
            DateFormat::Iso => self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A postal address. Every field is optional; blank fields are skipped when
/// the block is turned into lines.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressBlock {
    pub honorific: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub street_1: Option<String>,
    pub street_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AddressBlock {
    /// The block as consecutive printed lines, without gaps for missing fields
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(6);

        let name = [present(&self.honorific), present(&self.name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            lines.push(name);
        }

        for field in [&self.title, &self.organization, &self.street_1, &self.street_2] {
            if let Some(line) = present(field) {
                lines.push(line.to_string());
            }
        }

        let state_zip = [present(&self.state), present(&self.zip)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let city_line = match (present(&self.city), state_zip.is_empty()) {
            (Some(city), false) => format!("{city}, {state_zip}"),
            (Some(city), true) => city.to_string(),
            (None, _) => state_zip,
        };
        if !city_line.is_empty() {
            lines.push(city_line);
        }

        lines
    }

    /// The person's name without honorific, as used in running headers
    pub fn display_name(&self) -> &str {
        present(&self.name).unwrap_or_default()
    }
}

/// A piece of paragraph text in a single weight
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

impl TextRun {
    pub fn plain<S: ToString>(text: S) -> TextRun {
        TextRun {
            text: text.to_string(),
            bold: false,
        }
    }

    pub fn bold<S: ToString>(text: S) -> TextRun {
        TextRun {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// A body paragraph. In JSON either a plain string or a list of runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ParagraphRepr")]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParagraphRepr {
    Text(String),
    Runs(Vec<TextRun>),
}

impl From<ParagraphRepr> for Paragraph {
    fn from(repr: ParagraphRepr) -> Self {
        match repr {
            ParagraphRepr::Text(text) => Paragraph::plain(text),
            ParagraphRepr::Runs(runs) => Paragraph { runs },
        }
    }
}

impl Paragraph {
    pub fn plain<S: ToString>(text: S) -> Paragraph {
        Paragraph {
            runs: vec![TextRun::plain(text)],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }

    /// A short all-caps paragraph with no closing punctuation, such as
    /// `BACKGROUND`, is set as a heading
    pub fn is_heading(&self) -> bool {
        let text: String = self.runs.iter().map(|run| run.text.as_str()).collect();
        let text = text.trim_end();
        text.chars().any(char::is_uppercase)
            && !text.chars().any(char::is_lowercase)
            && text.split_whitespace().count() <= 10
            && !text.ends_with(['.', '!', '?', ','])
    }
}

/// Everything printed between the address area and the end of the letter
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContentBody {
    pub subject: Option<String>,
    pub salutation: String,
    pub paragraphs: Vec<Paragraph>,
    pub closing: String,
    pub postscript: Option<String>,
    pub enclosures: Vec<String>,
    pub cc: Vec<String>,
}

/// How the letter is signed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Signature {
    /// A scanned signature drawn at a fixed size
    Image {
        #[serde(alias = "image_path")]
        path: PathBuf,
        #[serde(default = "default_signature_width")]
        width: In,
        #[serde(default = "default_signature_height")]
        height: In,
        typed_name: String,
        #[serde(default)]
        title: Option<String>,
    },
    /// Room left blank for a pen signature
    Typed {
        typed_name: String,
        #[serde(default)]
        title: Option<String>,
    },
}

fn default_signature_width() -> In {
    In(2.0)
}

fn default_signature_height() -> In {
    In(0.75)
}

impl Signature {
    pub fn typed_name(&self) -> &str {
        match self {
            Signature::Image { typed_name, .. } | Signature::Typed { typed_name, .. } => typed_name,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Signature::Image { title, .. } | Signature::Typed { title, .. } => present(title),
        }
    }
}

// the on-disk layout nests the signature inside `content` and keeps header and
// footer at the top level
#[derive(Deserialize)]
struct LetterFile {
    metadata: Metadata,
    return_address: AddressBlock,
    recipient_address: AddressBlock,
    content: ContentFile,
    #[serde(default)]
    positioning: PositioningFile,
    #[serde(default)]
    formatting: FormattingSpec,
    #[serde(default)]
    fold_lines: FoldLineSpec,
    #[serde(default)]
    header: Option<HeaderOverrides>,
    #[serde(default)]
    footer: Option<BandOverrides>,
}

// page 1 placement settings; anything given here wins over `formatting`
#[derive(Default, Deserialize)]
#[serde(default)]
struct PositioningFile {
    margins: Option<Margins>,
    date_position: Option<DatePosition>,
    #[serde(alias = "body_start")]
    body_start_y: Option<In>,
    return_address: Option<WindowPosition>,
    recipient_address: Option<WindowPosition>,
}

#[derive(Deserialize)]
struct WindowPosition {
    x: In,
    y: In,
    width: In,
    #[serde(default)]
    height: Option<In>,
}

impl WindowPosition {
    fn matches(&self, window: &Rect) -> bool {
        let close = |a: In, b: In| (a.0 - b.0).abs() < 1e-3;
        close(self.x, window.x1)
            && close(self.y, window.y1)
            && close(self.width, window.x2 - window.x1)
            && self.height.map_or(true, |height| close(height, window.y2 - window.y1))
    }
}

impl PositioningFile {
    fn apply(self, formatting: &mut FormattingSpec) {
        let windows = [
            ("return", &self.return_address, &RETURN_WINDOW),
            ("recipient", &self.recipient_address, &RECIPIENT_WINDOW),
        ];
        for (name, position, window) in windows {
            if position.as_ref().is_some_and(|p| !p.matches(window)) {
                tracing::warn!(window = name, "address windows are fixed by the envelope, ignoring the given position");
            }
        }
        if let Some(margins) = self.margins {
            formatting.margins = margins;
        }
        if let Some(date_position) = self.date_position {
            formatting.date_position = date_position;
        }
        if let Some(body_start) = self.body_start_y {
            formatting.body_start = body_start;
        }
    }
}

#[derive(Deserialize)]
struct ContentFile {
    #[serde(default)]
    subject: Option<String>,
    salutation: String,
    #[serde(alias = "paragraphs")]
    body: Vec<Paragraph>,
    closing: String,
    #[serde(default)]
    signature: Option<Signature>,
    #[serde(default)]
    postscript: Option<String>,
    #[serde(default)]
    enclosures: Option<Vec<String>>,
    #[serde(default)]
    cc: Option<Vec<String>>,
}

impl From<LetterFile> for LetterDocument {
    fn from(file: LetterFile) -> Self {
        let (first_page_header, header) = file.header.unwrap_or_default().resolve();
        let header_footer = HeaderFooterSpec {
            header,
            footer: file.footer.unwrap_or_default().apply(BandSpec::footer()),
            first_page_header,
        };
        let mut formatting = file.formatting;
        file.positioning.apply(&mut formatting);
        LetterDocument {
            metadata: file.metadata,
            return_address: file.return_address,
            recipient_address: file.recipient_address,
            content: ContentBody {
                subject: file.content.subject,
                salutation: file.content.salutation,
                paragraphs: file.content.body,
                closing: file.content.closing,
                postscript: file.content.postscript,
                enclosures: file.content.enclosures.unwrap_or_default(),
                cc: file.content.cc.unwrap_or_default(),
            },
            formatting,
            fold_lines: file.fold_lines,
            header_footer: Some(header_footer),
            signature: file.content.signature,
        }
    }
}

impl LetterDocument {
    /// Parse and validate a letter described as JSON
    pub fn from_json(json: &str) -> Result<LetterDocument> {
        let file: LetterFile = serde_json::from_str(json)?;
        let document = LetterDocument::from(file);
        document.validate()?;
        Ok(document)
    }

    /// Parse and validate a letter described as JSON from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<LetterDocument> {
        let file: LetterFile = serde_json::from_reader(reader)?;
        let document = LetterDocument::from(file);
        document.validate()?;
        Ok(document)
    }

    /// Check the structural invariants the layout engine relies on
    pub fn validate(&self) -> Result<()> {
        let structural = |msg: &str| Err(LetterError::Structural(msg.to_string()));

        if self.return_address.lines().is_empty() {
            return structural("return address is empty");
        }
        if self.recipient_address.lines().is_empty() {
            return structural("recipient address is empty");
        }
        if self.content.paragraphs.is_empty() {
            return structural("letter body has no paragraphs");
        }
        if let Some(i) = self.content.paragraphs.iter().position(Paragraph::is_blank) {
            return Err(LetterError::Structural(format!("paragraph {i} is blank")));
        }
        if self.content.salutation.trim().is_empty() {
            return structural("salutation is blank");
        }
        if self.content.closing.trim().is_empty() {
            return structural("closing is blank");
        }
        if let Some(signature) = &self.signature {
            if signature.typed_name().trim().is_empty() {
                return structural("signature has no typed name");
            }
        }
        if self.formatting.font_size.0 <= 0.0 || self.formatting.line_spacing <= 0.0 {
            return structural("font size and line spacing must be positive");
        }
        Ok(())
    }
}
