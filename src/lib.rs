mod config;
mod error;
mod parser;
mod payload;
mod segment;
mod typst;

pub use config::{CodeConfig, Config, EmphasisConfig, FontConfig, PageConfig, SegmenterConfig};
pub use error::{Error, Result};
pub use parser::{
    DEFAULT_LANGUAGE, Segmenter, parse, segment_blocks, segment_emphasis, to_markup,
};
pub use payload::{Detail, Issue, NO_RESPONSE, Reply};
pub use segment::{Block, ParseResult, Segment, Span};
pub use typst::segments_to_typst;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

/// Convert an assistant reply to Typst markup using default config.
pub fn response_to_typst(text: &str) -> String {
    segments_to_typst(&parse(text), &Config::compiled_default())
}

/// Convert an assistant reply to Typst markup with custom config.
pub fn response_to_typst_with_config(text: &str, config: &Config) -> Result<String> {
    config.validate()?;
    let segments = config.segmenter()?.parse(text);
    Ok(segments_to_typst(&segments, config))
}

/// Convert an assistant reply to PDF bytes using default config.
pub fn response_to_pdf(text: &str) -> Result<Vec<u8>> {
    response_to_pdf_with_config(text, &Config::compiled_default())
}

/// Convert an assistant reply to PDF bytes with custom config.
pub fn response_to_pdf_with_config(text: &str, config: &Config) -> Result<Vec<u8>> {
    let doc = compile_document(text, config)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}

/// Compile a reply to a Typst document.
fn compile_document(text: &str, config: &Config) -> Result<PagedDocument> {
    let typst_content = response_to_typst_with_config(text, config)?;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))?;
    log::debug!("compiled reply into {} page(s)", doc.pages.len());
    Ok(doc)
}
