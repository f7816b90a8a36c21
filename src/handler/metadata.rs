use serde::Serialize;
use std::collections::BTreeMap;

/// How a format is recognised, which decides its place in dispatch order
///
/// Cheap and decisive checks run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionClass {
    /// Fixed magic bytes
    Signature,
    /// No signature; the directory has to be walked to decide
    Enumeration,
    /// Can only ever report a possible match
    Heuristic,
}

/// Whether the format lets each file choose a given attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttributeCapabilities {
    pub compressed: bool,
    pub encrypted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCapabilities {
    pub last_modified: bool,
    pub attributes: AttributeCapabilities,
    /// Longest filename the format can store, if limited
    pub max_filename_len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub max_file_count: Option<usize>,
    pub file: FileCapabilities,
    /// Archive-level tags the format stores, keyed by tag id
    pub tags: BTreeMap<&'static str, &'static str>,
}

/// Static description of a format handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub id: &'static str,
    pub title: &'static str,
    pub games: Vec<&'static str>,
    pub glob: Vec<&'static str>,
    pub detection: DetectionClass,
    pub caps: Capabilities,
}
