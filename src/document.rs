use serde::Serialize;

/// Result of parsing one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    /// No recognizable structure; the reply is kept as one opaque leaf.
    Unstructured { text: String },
    Structured { sections: Vec<Section> },
}

impl Document {
    pub fn is_structured(&self) -> bool {
        matches!(self, Document::Structured { .. })
    }

    /// Sections of a structured document, empty otherwise.
    pub fn sections(&self) -> &[Section] {
        match self {
            Document::Structured { sections } => sections,
            Document::Unstructured { .. } => &[],
        }
    }
}

/// How a renderer should present a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Plain,
    /// Opened by a `# ` line.
    Major,
    /// Opened by a `## ` line or a `**Label:**` header.
    Sub,
    /// Contains a fenced code block.
    Code,
    /// Numbered list run, titled "Key Points".
    List,
    /// Opened by a topic-shift sentence.
    Paragraph,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Plain => "plain",
            SectionKind::Major => "major",
            SectionKind::Sub => "sub",
            SectionKind::Code => "code",
            SectionKind::List => "list",
            SectionKind::Paragraph => "paragraph",
        }
    }
}

/// One logical block of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Section {
    pub title: Option<String>,
    pub kind: SectionKind,
    /// Raw lines in input order, blank lines included.
    pub lines: Vec<String>,
    pub has_math: bool,
}

impl Section {
    pub fn new(kind: SectionKind, title: Option<String>) -> Self {
        Self {
            title,
            kind,
            lines: Vec::new(),
            has_math: false,
        }
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// Part of a fragment split on `$` / `$$` delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum MathSegment {
    Text(String),
    Inline(String),
    Block(String),
}

impl MathSegment {
    /// Re-wrap the segment in the delimiters it was read from.
    pub fn to_source(&self) -> String {
        match self {
            MathSegment::Text(text) => text.clone(),
            MathSegment::Inline(tex) => format!("${tex}$"),
            MathSegment::Block(tex) => format!("$${tex}$$"),
        }
    }
}

/// Text span with emphasis flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// Output of the fragment scanners.
///
/// A fragment without any trigger character is handed back untouched rather
/// than wrapped in a single plain part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned<'a, T> {
    Unchanged(&'a str),
    Parts(Vec<T>),
}

impl<T> Scanned<'_, T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Scanned::Unchanged(_))
    }

    /// Parts of a scanned fragment, `None` when it was passed through.
    pub fn parts(&self) -> Option<&[T]> {
        match self {
            Scanned::Unchanged(_) => None,
            Scanned::Parts(parts) => Some(parts),
        }
    }
}
