//! The contract every container format implements
//!
//! Handlers are stateless: every operation takes its inputs explicitly, so
//! one handler value can serve any number of archives from any thread.

pub mod limits;
mod metadata;

pub use limits::{check_archive_limits, LimitIssue};
pub use metadata::{AttributeCapabilities, Capabilities, DetectionClass, FileCapabilities, Metadata};

use crate::archive::Archive;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// The main container bytes plus any supplementary files the format needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBundle {
    pub main: Vec<u8>,
    /// Supplementary files keyed by the ids returned from [`ArchiveHandler::supps`]
    pub supps: BTreeMap<String, Vec<u8>>,
}

impl ContentBundle {
    pub fn new(main: impl Into<Vec<u8>>) -> Self {
        Self {
            main: main.into(),
            supps: BTreeMap::new(),
        }
    }
}

impl From<Vec<u8>> for ContentBundle {
    fn from(main: Vec<u8>) -> Self {
        Self::new(main)
    }
}

/// Three-valued autodetection verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// The content is certainly this format
    Certain,
    /// The content could be this format but nothing decides it
    Possible,
    /// The content is certainly not this format
    Rejected,
}

/// Result of [`ArchiveHandler::identify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identification {
    pub confidence: Confidence,
    pub reason: String,
}

impl Identification {
    pub fn certain(reason: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Certain,
            reason: reason.into(),
        }
    }

    pub fn possible(reason: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Possible,
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Rejected,
            reason: reason.into(),
        }
    }

    /// `Some(true)`, `Some(false)` or `None` for an undecided match
    pub fn valid(&self) -> Option<bool> {
        match self.confidence {
            Confidence::Certain => Some(true),
            Confidence::Rejected => Some(false),
            Confidence::Possible => None,
        }
    }
}

/// A container format: capability description, autodetection, parse and generate
pub trait ArchiveHandler: Send + Sync {
    /// Describe the format. Needs no file content.
    fn metadata(&self) -> Metadata;

    /// List everything preventing `archive` from being written in this format
    ///
    /// An empty list means [`ArchiveHandler::generate`] may be called.
    fn check_limits(&self, archive: &Archive<'_>) -> Vec<LimitIssue> {
        check_archive_limits(&self.metadata(), archive)
    }

    /// Name any extra files that must be loaded alongside `name`, keyed by id
    fn supps(&self, _name: &str, _content: &[u8]) -> Option<BTreeMap<String, String>> {
        None
    }

    /// Decide from content (and optionally filename) whether this is the format
    fn identify(&self, content: &[u8], filename: &str) -> Identification;

    /// Read a container into an archive borrowing from `bundle`
    ///
    /// Structurally invalid input is an error, never a partial archive.
    fn parse<'a>(&self, bundle: &'a ContentBundle) -> Result<Archive<'a>>;

    /// Write `archive` out in this format
    ///
    /// The archive must already pass [`ArchiveHandler::check_limits`].
    fn generate(&self, archive: &Archive<'_>) -> Result<ContentBundle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_maps_confidence() {
        assert_eq!(Identification::certain("ok").valid(), Some(true));
        assert_eq!(Identification::rejected("no").valid(), Some(false));
        assert_eq!(Identification::possible("maybe").valid(), None);
    }

    #[test]
    fn test_identification_serializes() {
        let json = serde_json::to_value(Identification::possible("empty file")).unwrap();
        assert_eq!(json["confidence"], "possible");
        assert_eq!(json["reason"], "empty file");
    }
}
