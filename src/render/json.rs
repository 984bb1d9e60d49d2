//! JSON renderer — the document model as-is, for custom rendering pipelines.

use crate::document::Document;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = serde_json::to_string_pretty(doc).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
