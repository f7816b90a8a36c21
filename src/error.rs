use crate::handler::LimitIssue;
use std::io;
use thiserror::Error;

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Unified error type for all archive operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    // Structural errors
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    #[error("Unknown archive format: {0}")]
    UnknownFormat(String),

    // Generate-time contract violations
    #[error("Size mismatch for {name}: declared native size {expected}, content is {actual} bytes")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Archive exceeds format limits: {}", format_issues(.0))]
    LimitsExceeded(Vec<LimitIssue>),

    // Compression errors
    #[error("Invalid transform parameters: {0}")]
    InvalidParameters(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn format_issues(issues: &[LimitIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
