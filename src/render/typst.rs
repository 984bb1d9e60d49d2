use regex::Regex;
use std::sync::LazyLock;

use crate::config::TypstConfig;
use crate::document::{Document, InlineRun, MathSegment, Scanned, Section, SectionKind};
use crate::markup::parse_markup;
use crate::math::extract_math;
use crate::render::{Chunk, Renderer, split_fences};

// Lines Typst already treats as list items.
static RE_LIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]+\.|[-+])\s").unwrap());

pub struct TypstRenderer {
    config: TypstConfig,
}

impl TypstRenderer {
    pub fn new(config: TypstConfig) -> Self {
        Self { config }
    }

    fn preamble(&self, out: &mut String) {
        // Set up paragraph settings to prevent widows/orphans
        out.push_str("#set par(linebreaks: \"optimized\")\n");
        if let Some(ref font) = self.config.font {
            out.push_str(&format!("#set text(font: {})\n", string_literal(font)));
        }
        if self.config.page_numbers {
            out.push_str("#set page(numbering: \"1\")\n");
        }
        out.push('\n');
    }
}

impl Renderer for TypstRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        self.preamble(&mut out);

        match doc {
            Document::Unstructured { text } => {
                let lines: Vec<&str> = text.split('\n').collect();
                emit_blocks(&paragraphs(vec![Chunk::Prose(lines)]), &mut out);
            }
            Document::Structured { sections } => {
                for section in sections {
                    emit_section(section, &mut out);
                }
            }
        }

        out
    }

    fn file_extension(&self) -> &str {
        "typ"
    }
}

fn emit_section(section: &Section, out: &mut String) {
    let chunks = match section.kind {
        SectionKind::Code => split_fences(&section.lines),
        _ => vec![Chunk::Prose(
            section.lines.iter().map(String::as_str).collect(),
        )],
    };
    let blocks = paragraphs(chunks);

    let Some(ref title) = section.title else {
        emit_blocks(&blocks, out);
        return;
    };

    // Keep heading with the first block using a block that prevents breaks
    out.push_str("#block(breakable: false)[\n");
    let marker = match section.kind {
        SectionKind::Major => "=",
        _ => "==",
    };
    out.push_str(marker);
    out.push(' ');
    escape_text(title, out);
    out.push_str("\n\n");

    if let Some((first, rest)) = blocks.split_first() {
        emit_block(first, out);
        out.push_str("]\n\n");
        emit_blocks(rest, out);
    } else {
        out.push_str("]\n\n");
    }
}

/// Break prose chunks into paragraphs on blank lines.
fn paragraphs(chunks: Vec<Chunk<'_>>) -> Vec<Chunk<'_>> {
    let mut blocks = Vec::new();
    for chunk in chunks {
        match chunk {
            Chunk::Prose(lines) => blocks.extend(
                lines
                    .split(|line| line.trim().is_empty())
                    .filter(|paragraph| !paragraph.is_empty())
                    .map(|paragraph| Chunk::Prose(paragraph.to_vec())),
            ),
            code @ Chunk::Code { .. } => blocks.push(code),
        }
    }
    blocks
}

fn emit_blocks(blocks: &[Chunk], out: &mut String) {
    for block in blocks {
        emit_block(block, out);
    }
}

fn emit_block(block: &Chunk, out: &mut String) {
    match block {
        Chunk::Prose(lines) => emit_paragraph(lines, out),
        Chunk::Code { language, body } => {
            let fence = raw_fence(body);
            out.push_str(&fence);
            out.push_str(language.split_whitespace().next().unwrap_or_default());
            out.push('\n');
            for line in body {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n\n");
        }
    }
}

/// Backtick fence one longer than any run inside the body, at least three.
fn raw_fence(body: &[&str]) -> String {
    let longest = body
        .iter()
        .flat_map(|line| line.split(|c| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

/// A paragraph with math is scanned as one flow, since `$$` blocks often
/// span lines. Otherwise each line is its own markup fragment, kept apart
/// with hard breaks except for list items which Typst lays out itself.
fn emit_paragraph(lines: &[&str], out: &mut String) {
    let joined = lines.join("\n");
    if let Scanned::Parts(segments) = extract_math(&joined) {
        for segment in &segments {
            match segment {
                MathSegment::Text(text) => emit_markup(text, out),
                MathSegment::Inline(tex) => {
                    out.push_str(&format!("#raw({});", string_literal(tex)));
                }
                MathSegment::Block(tex) => {
                    out.push_str(&format!(
                        "\n#align(center, raw(block: true, {}))\n",
                        string_literal(tex)
                    ));
                }
            }
        }
        out.push_str("\n\n");
        return;
    }

    for (i, line) in lines.iter().enumerate() {
        emit_markup(line, out);
        let Some(next) = lines.get(i + 1) else {
            break;
        };
        if !RE_LIST_LINE.is_match(line) && !RE_LIST_LINE.is_match(next) {
            out.push_str(" \\");
        }
        out.push('\n');
    }
    out.push_str("\n\n");
}

fn emit_markup(text: &str, out: &mut String) {
    match parse_markup(text) {
        Scanned::Unchanged(text) => escape_text(text, out),
        Scanned::Parts(runs) => {
            for run in &runs {
                emit_run(run, out);
            }
        }
    }
}

fn emit_run(run: &InlineRun, out: &mut String) {
    match (run.bold, run.italic) {
        (false, false) => escape_text(&run.text, out),
        (true, false) => {
            out.push_str("#strong[");
            escape_text(&run.text, out);
            out.push_str("];");
        }
        (false, true) => {
            out.push_str("#emph[");
            escape_text(&run.text, out);
            out.push_str("];");
        }
        (true, true) => {
            out.push_str("#strong[#emph[");
            escape_text(&run.text, out);
            out.push_str("]];");
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    // Escape special Typst characters
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '=' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn string_literal(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}
