//! HTML renderer — sections as `<section>` elements, math left for KaTeX.
//!
//! Math is emitted verbatim inside `katex-inline` / `katex-block` elements;
//! typesetting is up to the page that embeds the output.

use crate::config::HtmlConfig;
use crate::document::{Document, InlineRun, MathSegment, Scanned, Section, SectionKind};
use crate::markup::parse_markup;
use crate::math::extract_math;
use crate::render::{Chunk, Renderer, split_fences};

pub struct HtmlRenderer {
    config: HtmlConfig,
}

impl HtmlRenderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut body = String::new();

        match doc {
            Document::Unstructured { text } => {
                body.push_str("<div class=\"reply\">\n");
                for line in text.split('\n') {
                    push_paragraph(&mut body, line);
                }
                body.push_str("</div>\n");
            }
            Document::Structured { sections } => {
                for section in sections {
                    render_section(&mut body, section);
                }
            }
        }

        if !self.config.standalone {
            return body;
        }

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(&self.config.title)));
        out.push_str("<style>\n");
        out.push_str("body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }\n");
        out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
        out.push_str(".math-enabled { white-space: pre-wrap; }\n");
        out.push_str(".katex-block { text-align: center; margin: 0.75em 0; }\n");
        out.push_str("</style>\n");
        out.push_str("</head>\n<body>\n");
        out.push_str(&body);
        out.push_str("</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!(
        "<section class=\"section {}\">\n",
        section.kind.as_str()
    ));

    if let Some(ref title) = section.title {
        let tag = match section.kind {
            SectionKind::Major => "h1",
            _ => "h2",
        };
        out.push_str(&format!(
            "<{tag} class=\"section-title\">{}</{tag}>\n",
            html_escape(title)
        ));
    }

    match section.kind {
        SectionKind::Code => {
            for chunk in split_fences(&section.lines) {
                match chunk {
                    Chunk::Code { language, body } => push_code(out, language, &body),
                    Chunk::Prose(lines) => push_content(out, &lines),
                }
            }
        }
        SectionKind::Plain
        | SectionKind::Major
        | SectionKind::Sub
        | SectionKind::List
        | SectionKind::Paragraph => {
            let lines: Vec<&str> = section.lines.iter().map(String::as_str).collect();
            push_content(out, &lines);
        }
    }

    out.push_str("</section>\n");
}

/// Content block: one math-aware flow when it contains `$`, otherwise one
/// paragraph per line.
fn push_content(out: &mut String, lines: &[&str]) {
    let joined = lines.join("\n");

    if let Scanned::Parts(segments) = extract_math(&joined) {
        out.push_str("<div class=\"section-content math-enabled\">");
        for segment in &segments {
            match segment {
                MathSegment::Text(text) => push_runs(out, text),
                MathSegment::Inline(tex) => out.push_str(&format!(
                    "<span class=\"katex-inline\">{}</span>",
                    html_escape(tex)
                )),
                MathSegment::Block(tex) => out.push_str(&format!(
                    "<div class=\"katex-block\">{}</div>",
                    html_escape(tex)
                )),
            }
        }
        out.push_str("</div>\n");
        return;
    }

    out.push_str("<div class=\"section-content\">\n");
    for line in lines {
        push_paragraph(out, line);
    }
    out.push_str("</div>\n");
}

fn push_paragraph(out: &mut String, line: &str) {
    out.push_str("<p>");
    push_runs(out, line);
    out.push_str("</p>\n");
}

fn push_runs(out: &mut String, text: &str) {
    match parse_markup(text) {
        Scanned::Unchanged(text) => out.push_str(&html_escape(text)),
        Scanned::Parts(runs) => {
            for run in &runs {
                push_run(out, run);
            }
        }
    }
}

fn push_run(out: &mut String, run: &InlineRun) {
    let text = html_escape(&run.text);
    match (run.bold, run.italic) {
        (true, true) => out.push_str(&format!("<strong><em>{text}</em></strong>")),
        (true, false) => out.push_str(&format!("<strong>{text}</strong>")),
        (false, true) => out.push_str(&format!("<em>{text}</em>")),
        (false, false) => out.push_str(&text),
    }
}

fn push_code(out: &mut String, language: &str, body: &[&str]) {
    if language.is_empty() {
        out.push_str("<pre><code>");
    } else {
        out.push_str(&format!(
            "<pre><code class=\"language-{}\">",
            html_escape(language)
        ));
    }
    out.push_str(&html_escape(&body.join("\n")));
    out.push_str("</code></pre>\n");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn fragment(text: &str) -> String {
        HtmlRenderer::new(HtmlConfig {
            standalone: false,
            ..HtmlConfig::default()
        })
        .render(&parse(text))
    }

    #[test]
    fn unstructured_reply_is_one_paragraph_per_line() {
        assert_eq!(
            fragment("Hello there\nSecond line"),
            "<div class=\"reply\">\n<p>Hello there</p>\n<p>Second line</p>\n</div>\n"
        );
    }

    #[test]
    fn section_with_title_and_emphasis() {
        assert_eq!(
            fragment("# Title\n**bold** and *it*"),
            "<section class=\"section major\">\n\
             <h1 class=\"section-title\">Title</h1>\n\
             <div class=\"section-content\">\n\
             <p><strong>bold</strong> and <em>it</em></p>\n\
             </div>\n\
             </section>\n"
        );
    }

    #[test]
    fn math_content_is_left_for_katex() {
        let html = fragment("## Energy\nWe have $E<mc^2$ and\n$$a$$");
        assert!(html.contains("<div class=\"section-content math-enabled\">"));
        assert!(html.contains("<span class=\"katex-inline\">E&lt;mc^2</span>"));
        assert!(html.contains("<div class=\"katex-block\">a</div>"));
    }

    #[test]
    fn code_section_uses_pre() {
        let html = fragment("## Example\n```rust\nlet a = 1 < 2;\n```");
        assert!(html.contains("<section class=\"section code\">"));
        assert!(html.contains("<pre><code class=\"language-rust\">let a = 1 &lt; 2;</code></pre>"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn escapes_text() {
        assert!(fragment("# <b>\nx & y").contains("<p>x &amp; y</p>"));
    }

    #[test]
    fn standalone_page() {
        let html = HtmlRenderer::new(HtmlConfig::default()).render(&parse("hi"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Reply</title>"));
        assert!(html.ends_with("</html>\n"));
    }
}
