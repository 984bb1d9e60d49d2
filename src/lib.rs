mod classify;
mod config;
mod document;
mod error;
mod markup;
mod math;
pub mod render;
mod segment;

pub use classify::has_structure;
pub use config::{Config, HtmlConfig, Thresholds, TypstConfig};
pub use document::{Document, InlineRun, MathSegment, Scanned, Section, SectionKind};
pub use error::Error;
pub use markup::parse_markup;
pub use math::extract_math;
pub use render::Renderer;
pub use segment::{segment, segment_with};

use render::html::HtmlRenderer;
use render::typst::TypstRenderer;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse a reply into a document using the default thresholds.
pub fn parse(text: &str) -> Document {
    parse_with_thresholds(text, &Thresholds::default())
}

/// Parse a reply into a document with custom config.
pub fn parse_with_config(text: &str, config: &Config) -> Document {
    parse_with_thresholds(text, &config.segment)
}

fn parse_with_thresholds(text: &str, thresholds: &Thresholds) -> Document {
    if !has_structure(text) {
        tracing::debug!(len = text.len(), "reply has no structure");
        return Document::Unstructured {
            text: text.to_string(),
        };
    }

    let sections = segment_with(text, thresholds);
    if sections.is_empty() {
        // Only header lines; nothing to hang them on.
        tracing::debug!("segmentation produced no sections");
        return Document::Unstructured {
            text: text.to_string(),
        };
    }

    Document::Structured { sections }
}

/// Convert a reply to HTML using default config.
pub fn reply_to_html(text: &str) -> String {
    reply_to_html_with_config(text, &Config::compiled_default())
}

/// Convert a reply to HTML with custom config.
pub fn reply_to_html_with_config(text: &str, config: &Config) -> String {
    let doc = parse_with_config(text, config);
    HtmlRenderer::new(config.html.clone()).render(&doc)
}

/// Convert a reply to Typst markup using default config.
pub fn reply_to_typst(text: &str) -> String {
    reply_to_typst_with_config(text, &Config::compiled_default())
}

/// Convert a reply to Typst markup with custom config.
pub fn reply_to_typst_with_config(text: &str, config: &Config) -> String {
    let doc = parse_with_config(text, config);
    TypstRenderer::new(config.typst.clone()).render(&doc)
}

/// Convert a reply to PDF bytes using default config.
pub fn reply_to_pdf(text: &str) -> Result<Vec<u8>, Error> {
    reply_to_pdf_with_config(text, &Config::compiled_default())
}

/// Convert a reply to PDF bytes with custom config.
pub fn reply_to_pdf_with_config(text: &str, config: &Config) -> Result<Vec<u8>, Error> {
    use typst_library::layout::PagedDocument;

    let typst_content = reply_to_typst_with_config(text, config);

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
        .map_err(|e| Error::Typst(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}
