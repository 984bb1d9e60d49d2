use crate::document::{InlineRun, Scanned};

#[derive(Debug, Clone, Copy, Default)]
struct Emphasis {
    bold: bool,
    italic: bool,
}

/// Split a fragment into runs on `**` (bold) and `*` (italic) markers.
///
/// Markers toggle; an unclosed marker keeps its flag on until the end. A `*`
/// that directly follows a `**` pair and is not followed by another `*` is
/// kept as literal text.
pub fn parse_markup(fragment: &str) -> Scanned<'_, InlineRun> {
    if !fragment.contains('*') {
        return Scanned::Unchanged(fragment);
    }

    // `*` is ASCII, so every index compared against it is a char boundary.
    let bytes = fragment.as_bytes();
    let mut runs = Vec::new();
    let mut emphasis = Emphasis::default();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'*') {
            push_run(&mut runs, &fragment[start..i], emphasis);
            emphasis.bold = !emphasis.bold;
            i += 2;
            start = i;
            continue;
        }

        let after_star = i > 0 && bytes[i - 1] == b'*';
        if !after_star {
            push_run(&mut runs, &fragment[start..i], emphasis);
            emphasis.italic = !emphasis.italic;
            start = i + 1;
        }
        i += 1;
    }

    push_run(&mut runs, &fragment[start..], emphasis);
    Scanned::Parts(runs)
}

fn push_run(runs: &mut Vec<InlineRun>, text: &str, emphasis: Emphasis) {
    if !text.is_empty() {
        runs.push(InlineRun {
            text: text.to_string(),
            bold: emphasis.bold,
            italic: emphasis.italic,
        });
    }
}
