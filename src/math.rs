use std::mem;

use crate::document::{MathSegment, Scanned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathState {
    Text,
    InlineMath,
    BlockMath,
}

/// Split a fragment on `$` / `$$` delimiters.
///
/// Math that is still open at the end of the fragment is dropped, along with
/// everything after its opening delimiter. A single `$` inside `$$ … $$` is
/// discarded.
pub fn extract_math(fragment: &str) -> Scanned<'_, MathSegment> {
    if !fragment.contains('$') {
        return Scanned::Unchanged(fragment);
    }

    let mut segments = Vec::new();
    let mut text = String::new();
    let mut math = String::new();
    let mut state = MathState::Text;
    let mut chars = fragment.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            match state {
                MathState::Text => text.push(c),
                MathState::InlineMath | MathState::BlockMath => math.push(c),
            }
            continue;
        }

        let double = chars.peek() == Some(&'$');
        match (state, double) {
            (MathState::Text, true) => {
                flush_text(&mut text, &mut segments);
                chars.next();
                state = MathState::BlockMath;
            }
            (MathState::BlockMath, true) => {
                segments.push(MathSegment::Block(mem::take(&mut math)));
                chars.next();
                state = MathState::Text;
            }
            (MathState::Text, false) => {
                flush_text(&mut text, &mut segments);
                state = MathState::InlineMath;
            }
            (MathState::InlineMath, _) => {
                segments.push(MathSegment::Inline(mem::take(&mut math)));
                state = MathState::Text;
            }
            (MathState::BlockMath, false) => {}
        }
    }

    flush_text(&mut text, &mut segments);

    if state != MathState::Text {
        tracing::debug!(dropped = math.len(), "unterminated math at end of fragment");
    }

    Scanned::Parts(segments)
}

fn flush_text(text: &mut String, segments: &mut Vec<MathSegment>) {
    if !text.is_empty() {
        segments.push(MathSegment::Text(mem::take(text)));
    }
}
