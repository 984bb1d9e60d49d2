//! Renderer module — trait-based format dispatch.
//!
//! Renderers consume a parsed [`Document`] and run the math extractor and
//! markup parser over each content block themselves.

pub mod html;
pub mod json;
pub mod typst;

use crate::config::Config;
use crate::document::Document;
use crate::error::Error;

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &Document) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, config: &Config) -> Result<Box<dyn Renderer>, Error> {
    match format {
        "html" => Ok(Box::new(html::HtmlRenderer::new(config.html.clone()))),
        "typst" | "typ" => Ok(Box::new(typst::TypstRenderer::new(config.typst.clone()))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}

/// Split section lines into fenced code blocks and the prose around them.
pub(crate) fn split_fences(lines: &[String]) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut code: Option<(&str, Vec<&str>)> = None;

    for line in lines {
        if let Some(info) = line.strip_prefix("```") {
            match code.take() {
                Some((language, body)) => chunks.push(Chunk::Code { language, body }),
                None => {
                    if !prose.is_empty() {
                        chunks.push(Chunk::Prose(std::mem::take(&mut prose)));
                    }
                    code = Some((info.trim(), Vec::new()));
                }
            }
            continue;
        }
        match code.as_mut() {
            Some((_, body)) => body.push(line),
            None => prose.push(line),
        }
    }

    // An unclosed fence still renders as code.
    if let Some((language, body)) = code {
        chunks.push(Chunk::Code { language, body });
    }
    if !prose.is_empty() {
        chunks.push(Chunk::Prose(prose));
    }
    chunks
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Chunk<'a> {
    Prose(Vec<&'a str>),
    Code { language: &'a str, body: Vec<&'a str> },
}
