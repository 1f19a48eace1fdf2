use crate::engine::Letter;
use crate::page::PageLayout;

/// Something that consumes laid out pages, one at a time and in order
pub trait RenderSink {
    type Error;

    fn render_page(&mut self, page: &PageLayout) -> Result<(), Self::Error>;
}

/// Feed every page of a letter to `sink`
pub fn render_letter<S: RenderSink + ?Sized>(letter: &Letter, sink: &mut S) -> Result<(), S::Error> {
    for page in letter.pages.iter() {
        sink.render_page(page)?;
    }
    Ok(())
}
