//! Section segmenter — line-by-line state machine.
//!
//! Each line is matched against the rules below in priority order; the first
//! rule that applies consumes the line.
//!
//! 1. `# ` major heading
//! 2. `## ` sub heading
//! 3. `**Label:**` bold-label header
//! 4. ```` ``` ```` fence toggle
//! 5. blank line
//! 6. numbered-list start after a blank line
//! 7. topic-shift sentence after a blank line
//! 8. anything else is content
//!
//! Rules 1-3 and 5-7 are disabled inside a code fence.

use regex::Regex;
use std::mem;
use std::sync::LazyLock;

use crate::config::Thresholds;
use crate::document::{Section, SectionKind};

const LIST_TITLE: &str = "Key Points";

// Sections titled like "Statement" keep their numbered lists inline.
const LIST_GUARD_WORD: &str = "Statement";

static RE_BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?):\*\*").unwrap());

static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+\.\s").unwrap());

/// Split text into sections using the default thresholds.
pub fn segment(text: &str) -> Vec<Section> {
    segment_with(text, &Thresholds::default())
}

/// Split text into sections.
pub fn segment_with(text: &str, thresholds: &Thresholds) -> Vec<Section> {
    let mut state = SegmentState::new(thresholds);

    for (index, line) in text.split('\n').enumerate() {
        process_line(&mut state, index, line);
    }

    state.finish()
}

// -- Segmenter state ----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    CodeFence,
}

struct SegmentState<'t> {
    thresholds: &'t Thresholds,
    sections: Vec<Section>,
    current: Section,
    mode: Mode,
    previous_blank: bool,
}

impl<'t> SegmentState<'t> {
    fn new(thresholds: &'t Thresholds) -> Self {
        Self {
            thresholds,
            sections: Vec::new(),
            current: Section::default(),
            mode: Mode::Normal,
            previous_blank: false,
        }
    }

    fn in_fence(&self) -> bool {
        self.mode == Mode::CodeFence
    }

    /// Replace the current section, keeping the old one only if it has lines.
    fn open(&mut self, next: Section) {
        let done = mem::replace(&mut self.current, next);
        if !done.lines.is_empty() {
            tracing::trace!(
                kind = done.kind.as_str(),
                title = done.title.as_deref().unwrap_or(""),
                lines = done.lines.len(),
                "closed section"
            );
            self.sections.push(done);
        }
    }

    fn push_line(&mut self, line: &str) {
        self.current.lines.push(line.to_string());
    }

    fn current_title_contains(&self, word: &str) -> bool {
        self.current
            .title
            .as_deref()
            .is_some_and(|title| title.contains(word))
    }

    fn finish(mut self) -> Vec<Section> {
        self.open(Section::default());
        let mut sections = self.sections;

        for section in &mut sections {
            section.has_math = section.lines.iter().any(|line| line.contains('$'));
        }

        if let [only] = sections.as_mut_slice() {
            if only.title.is_none() {
                only.title = fallback_title(&only.lines, self.thresholds);
            }
        }

        tracing::debug!(sections = sections.len(), "segmented reply");
        sections
    }
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut SegmentState, index: usize, line: &str) {
    let blank = line.trim().is_empty();

    // 1. Major heading
    if !s.in_fence() {
        if let Some(rest) = line.strip_prefix("# ") {
            s.open(Section::new(SectionKind::Major, non_empty(rest.trim())));
            return;
        }
    }

    // 2. Sub heading
    if !s.in_fence() {
        if let Some(rest) = line.strip_prefix("## ") {
            s.open(Section::new(SectionKind::Sub, non_empty(rest.trim())));
            return;
        }
    }

    // 3. Bold-label header. A line with both markers that does not yield a
    // label is still consumed as plain content.
    if !s.in_fence() && line.contains("**") && line.contains(":**") {
        let label = RE_BOLD_LABEL
            .captures(line)
            .map(|caps| caps[1].to_string())
            .filter(|label| !label.is_empty());

        match label {
            Some(label) => {
                let remainder = RE_BOLD_LABEL.replace(line, "").into_owned();
                let mut section = Section::new(SectionKind::Sub, Some(label));
                section.lines.push(remainder);
                s.open(section);
            }
            None => s.push_line(line),
        }
        return;
    }

    // 4. Code fence toggle
    if line.starts_with("```") {
        s.mode = match s.mode {
            Mode::Normal => Mode::CodeFence,
            Mode::CodeFence => Mode::Normal,
        };
        s.push_line(line);
        if s.in_fence() {
            s.current.kind = SectionKind::Code;
        }
        return;
    }

    // 5. Blank line
    if blank && !s.in_fence() {
        s.previous_blank = true;
        s.push_line(line);
        return;
    }

    // 6. Numbered list after a blank line
    if s.previous_blank
        && !s.in_fence()
        && RE_LIST_ITEM.is_match(line)
        && s.current.lines.len() > s.thresholds.list_min_lines
        && !s.current_title_contains(LIST_GUARD_WORD)
    {
        let mut section = Section::new(SectionKind::List, Some(LIST_TITLE.to_string()));
        section.lines.push(line.to_string());
        s.open(section);
        s.previous_blank = false;
        return;
    }

    // 7. Topic shift after a blank line
    if s.previous_blank
        && !blank
        && !line.starts_with(' ')
        && !s.in_fence()
        && index > s.thresholds.topic_min_line_index
        && s.current.lines.len() > s.thresholds.topic_min_lines
    {
        match topic_title(line, s.thresholds) {
            Some(title) => {
                tracing::trace!(index, title = %title, "topic shift");
                let mut section = Section::new(SectionKind::Paragraph, Some(title));
                section.lines.push(line.to_string());
                s.open(section);
            }
            None => s.push_line(line),
        }
        s.previous_blank = false;
        return;
    }

    // 8. Content
    s.push_line(line);
    s.previous_blank = blank;
}

/// Title for a sentence that looks like it starts a new topic.
fn topic_title(line: &str, t: &Thresholds) -> Option<String> {
    let words = line.split(' ').count();
    if words <= t.topic_min_words || line.starts_with(|c: char| c.is_ascii_lowercase()) {
        return None;
    }

    // Text before the first period, so it never ends with one.
    let candidate = line.split('.').next().unwrap_or_default();
    let len = candidate.chars().count();
    (len > t.topic_title_min_len && len < t.topic_title_max_len).then(|| candidate.to_string())
}

/// Title synthesized for a reply that produced a single untitled section.
fn fallback_title(lines: &[String], t: &Thresholds) -> Option<String> {
    let opening = lines
        .iter()
        .take(t.fallback_title_lines)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let candidate = opening.split('.').next().unwrap_or_default();
    let len = candidate.chars().count();
    (len > t.fallback_title_min_len && len < t.fallback_title_max_len)
        .then(|| candidate.to_string())
}

fn non_empty(title: &str) -> Option<String> {
    (!title.is_empty()).then(|| title.to_string())
}
