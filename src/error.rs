use std::path::PathBuf;

use thiserror::Error;

/// Failures of the outer surfaces. Parsing itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config{}: {message}", in_path(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Typst compilation failed: {0}")]
    Typst(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("unknown format: {0}. Use html, typst, json or pdf")]
    UnknownFormat(String),
}

fn in_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
