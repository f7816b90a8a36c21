//! Checks an archive against a format's declared capabilities.
//!
//! [`check_archive_limits`] runs every generic check. Handlers whose record
//! layout imposes extra limits compose the individual checks with their own.

use super::metadata::{Capabilities, Metadata};
use crate::archive::{Archive, ArchiveFile};
use thiserror::Error;

/// A reason an archive cannot be written in a given format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitIssue {
    #[error("archive has {count} files, format allows at most {max}")]
    TooManyFiles { count: usize, max: usize },

    #[error("filename {name:?} is {len} characters, format allows at most {max}")]
    NameTooLong { name: String, len: usize, max: usize },

    #[error("filename {name:?} cannot be stored: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("{name}: format does not support per-file control of the {attribute} attribute")]
    UnsupportedAttribute {
        name: String,
        attribute: &'static str,
    },

    #[error("{name}: declared native size {expected} but content is {actual} bytes")]
    NativeSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name}: {size} bytes exceeds the format's {max}-byte file limit")]
    FileTooLarge {
        name: String,
        size: usize,
        max: usize,
    },

    #[error("{name}: content could not be read: {reason}")]
    UnreadableContent { name: String, reason: String },
}

pub fn check_file_count(caps: &Capabilities, archive: &Archive<'_>) -> Option<LimitIssue> {
    let max = caps.max_file_count?;
    (archive.len() > max).then(|| LimitIssue::TooManyFiles {
        count: archive.len(),
        max,
    })
}

/// Check `stored_name`, the form the format will actually write, against the
/// filename limit
pub fn check_filename(caps: &Capabilities, stored_name: &str) -> Option<LimitIssue> {
    let max = caps.file.max_filename_len?;
    let len = stored_name.chars().count();
    (len > max).then(|| LimitIssue::NameTooLong {
        name: stored_name.to_string(),
        len,
        max,
    })
}

/// Reject explicit attribute requests the format cannot honour per file
pub fn check_attributes(caps: &Capabilities, file: &ArchiveFile<'_>) -> Vec<LimitIssue> {
    let mut issues = Vec::new();
    let allowed = caps.file.attributes;
    if !allowed.compressed && file.attributes.compressed == Some(true) {
        issues.push(LimitIssue::UnsupportedAttribute {
            name: file.name.clone(),
            attribute: "compressed",
        });
    }
    if !allowed.encrypted && file.attributes.encrypted == Some(true) {
        issues.push(LimitIssue::UnsupportedAttribute {
            name: file.name.clone(),
            attribute: "encrypted",
        });
    }
    issues
}

/// Confirm the declared native size matches the decoded content
///
/// A zero native size is skipped and only logged: it is legal but means the
/// writer cannot preallocate.
pub fn check_native_size(file: &ArchiveFile<'_>) -> Option<LimitIssue> {
    let content = match file.content() {
        Ok(content) => content,
        Err(e) => {
            return Some(LimitIssue::UnreadableContent {
                name: file.name.clone(),
                reason: e.to_string(),
            })
        }
    };

    if file.native_size == 0 {
        if !content.is_empty() {
            tracing::warn!(
                file = %file.name,
                actual = content.len(),
                "native size is 0 but content is not empty; output buffers will be reallocated"
            );
        }
        return None;
    }

    (content.len() != file.native_size).then(|| LimitIssue::NativeSizeMismatch {
        name: file.name.clone(),
        expected: file.native_size,
        actual: content.len(),
    })
}

/// Run every generic check, using each file's name as-is
pub fn check_archive_limits(metadata: &Metadata, archive: &Archive<'_>) -> Vec<LimitIssue> {
    let caps = &metadata.caps;
    let mut issues: Vec<LimitIssue> = check_file_count(caps, archive).into_iter().collect();

    for file in archive {
        issues.extend(check_filename(caps, &file.name));
        issues.extend(check_attributes(caps, file));
        issues.extend(check_native_size(file));
    }

    issues
}
