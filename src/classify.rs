use regex::Regex;
use std::sync::LazyLock;

// A numbered item on any line after the first; `\s` may span the newline.
static RE_NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*[0-9]+\.\s").unwrap());

/// Whether the text shows any structure worth segmenting.
pub fn has_structure(text: &str) -> bool {
    let headings = text.contains("## ") || text.contains("# ");
    let bold_labels = text.contains("**") && text.contains(":**");
    let numbered = RE_NUMBERED_LINE.is_match(text);
    let math = text.contains('$');

    tracing::trace!(headings, bold_labels, numbered, math, "classified reply");
    headings || bold_labels || numbered || math
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unstructured() {
        assert!(!has_structure("plain text"));
        assert!(!has_structure(""));
        assert!(!has_structure("Just a sentence.\nAnd another one."));
    }

    #[test]
    fn headings() {
        assert!(has_structure("# Title\nBody"));
        assert!(has_structure("intro\n## Sub"));
        // marker must be followed by a space
        assert!(!has_structure("#hashtag"));
    }

    #[test]
    fn bold_label_needs_both_markers() {
        assert!(has_structure("**Statement:** x"));
        assert!(!has_structure("**bold** only"));
        assert!(!has_structure("trailing:"));
    }

    #[test]
    fn numbered_list_after_a_newline() {
        assert!(has_structure("Steps\n1. first"));
        assert!(has_structure("Steps\n   12. indented"));
        assert!(has_structure("Steps\n\n2.\tnext"));
        // first line has no preceding newline
        assert!(!has_structure("1. first"));
        assert!(!has_structure("Version\n1.5 is out"));
    }

    #[test]
    fn any_dollar_counts_as_math() {
        assert!(has_structure("costs $5"));
    }
}
