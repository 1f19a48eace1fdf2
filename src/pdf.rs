use crate::{
    content::{self, Resources},
    document::LetterDocument,
    error::{LetterError, Result},
    font::{FontFamily, FontStyle},
    image::Image,
    info::Info,
    page::PageLayout,
    pagesize::in_points,
    refs::{ObjectReferences, RefType},
    sink::RenderSink,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf, Rect as PdfRect, Ref};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
};

// pages rendered so far, waiting for `finish`
struct RenderedPage {
    size: (f32, f32),
    content: Vec<u8>,
}

#[derive(Default)]
struct SinkResources {
    fonts: Vec<(FontFamily, FontStyle)>,
    images: Arena<Image>,
    image_order: Vec<Id<Image>>,
    // `None` remembers images that failed to load so they are only reported once
    image_paths: HashMap<PathBuf, Option<usize>>,
}

impl Resources for SinkResources {
    fn font_index(&mut self, family: FontFamily, style: FontStyle) -> usize {
        match self.fonts.iter().position(|&f| f == (family, style)) {
            Some(index) => index,
            None => {
                self.fonts.push((family, style));
                self.fonts.len() - 1
            }
        }
    }

    fn image_index(&mut self, path: &Path) -> Option<usize> {
        if let Some(index) = self.image_paths.get(path) {
            return *index;
        }
        let index = match Image::new_from_disk(path) {
            Ok(image) => {
                let id = self.images.alloc(image);
                self.image_order.push(id);
                Some(self.image_order.len() - 1)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping signature image: {e}");
                None
            }
        };
        self.image_paths.insert(path.to_owned(), index);
        index
    }
}

/// A [`RenderSink`] that builds a PDF using the standard Type1 fonts.
///
/// Pages are turned into content streams as they arrive; the document itself
/// is only assembled by [`PdfSink::finish`] or [`PdfSink::write`].
#[derive(Default)]
pub struct PdfSink {
    pub info: Option<Info>,
    pages: Vec<RenderedPage>,
    resources: SinkResources,
}

impl PdfSink {
    pub fn new() -> PdfSink {
        PdfSink::default()
    }

    /// A sink whose document info describes `document`
    pub fn for_letter(document: &LetterDocument) -> PdfSink {
        let mut sink = PdfSink::new();
        sink.set_info(Info::for_letter(document));
        sink
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the PDF and return its bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let PdfSink {
            info,
            pages,
            resources,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..pages.len()).map(|i| refs.gen(RefType::Page(i))).collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        let font_refs: Vec<Ref> = resources
            .fonts
            .iter()
            .enumerate()
            .map(|(i, (family, style))| {
                let id = refs.gen(RefType::Font(i));
                writer
                    .type1_font(id)
                    .base_font(Name(family.base_font(*style).as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                id
            })
            .collect();

        let mut image_refs: Vec<Ref> = Vec::with_capacity(resources.image_order.len());
        for (i, id) in resources.image_order.iter().enumerate() {
            let image = &resources.images[*id];
            image.write(&mut refs, i, &mut writer)?;
            image_refs.push(refs.gen(RefType::Image(i)));
        }

        for (i, page) in pages.iter().enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(i));

            let mut pdf_page = writer.page(page_refs[i]);
            pdf_page.media_box(PdfRect::new(0.0, 0.0, page.size.0, page.size.1));
            pdf_page.parent(page_tree_id);
            pdf_page.contents(content_id);

            let mut page_resources = pdf_page.resources();
            let mut resource_fonts = page_resources.fonts();
            for (f, font_ref) in font_refs.iter().enumerate() {
                resource_fonts.pair(Name(format!("F{f}").as_bytes()), *font_ref);
            }
            resource_fonts.finish();
            if !image_refs.is_empty() {
                let mut resource_xobjects = page_resources.x_objects();
                for (m, image_ref) in image_refs.iter().enumerate() {
                    resource_xobjects.pair(Name(format!("I{m}").as_bytes()), *image_ref);
                }
                resource_xobjects.finish();
            }
            page_resources.finish();
            pdf_page.finish();

            writer.stream(content_id, page.content.as_slice());
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        Ok(writer.finish())
    }

    /// Assemble the PDF and write it out
    pub fn write<W: Write>(self, mut w: W) -> Result<()> {
        let bytes = self.finish()?;
        w.write_all(bytes.as_slice()).map_err(Into::into)
    }
}

impl RenderSink for PdfSink {
    type Error = LetterError;

    fn render_page(&mut self, page: &PageLayout) -> Result<()> {
        let content = content::render_page(page, &mut self.resources)?;
        let (width, height) = in_points(page.size);
        self.pages.push(RenderedPage {
            size: (width.0, height.0),
            content,
        });
        Ok(())
    }
}
