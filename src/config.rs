use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub segment: Thresholds,
    pub html: HtmlConfig,
    pub typst: TypstConfig,
}

/// Tuning knobs of the segmenter heuristics.
///
/// Every comparison is strict: a section needs *more than* `list_min_lines`
/// lines before a numbered line may open a list, and so on.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub list_min_lines: usize,
    pub topic_min_line_index: usize,
    pub topic_min_lines: usize,
    pub topic_min_words: usize,
    pub topic_title_min_len: usize,
    pub topic_title_max_len: usize,
    pub fallback_title_lines: usize,
    pub fallback_title_min_len: usize,
    pub fallback_title_max_len: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            list_min_lines: 3,
            topic_min_line_index: 5,
            topic_min_lines: 5,
            topic_min_words: 6,
            topic_title_min_len: 15,
            topic_title_max_len: 60,
            fallback_title_lines: 3,
            fallback_title_min_len: 10,
            fallback_title_max_len: 80,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Wrap the output in a full `<!DOCTYPE html>` page.
    pub standalone: bool,
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            title: "Reply".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TypstConfig {
    /// Font family for body text; the Typst default when unset.
    pub font: Option<String>,
    pub page_numbers: bool,
}

impl Config {
    /// Config shipped with the crate (`src/default_config.toml`).
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled defaults if it
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).map_err(|e| match e {
                Error::Config { message, .. } => Error::Config {
                    path: Some(path.to_path_buf()),
                    message,
                },
                other => other,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config not found, using defaults");
                Ok(Self::compiled_default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: None,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_builtin_thresholds() {
        let config = Config::compiled_default();
        assert_eq!(config.segment, Thresholds::default());
        assert!(config.html.standalone);
        assert_eq!(config.typst.font, None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml("[segment]\ntopic_min_words = 3\n").unwrap();
        assert_eq!(config.segment.topic_min_words, 3);
        assert_eq!(config.segment.topic_title_max_len, 60);
        assert_eq!(config.html, HtmlConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Config::from_toml("[segment\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::compiled_default());
    }

    #[test]
    fn load_reports_path_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "segment = 3").unwrap();
        match Config::load(&path).unwrap_err() {
            Error::Config { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
