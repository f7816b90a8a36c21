use super::file::{ArchiveFile, FileAttributes};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// In-memory view of a container's contents
///
/// File order is the on-disk order: parse preserves it, generate writes
/// files in this order.
#[derive(Debug, Clone, Default)]
pub struct Archive<'a> {
    pub files: Vec<ArchiveFile<'a>>,
    /// Archive-level tags such as a description field, for formats that have them
    pub tags: BTreeMap<String, String>,
}

/// Summary row for one file, suitable for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<usize>,
    pub native_size: usize,
    pub attributes: FileAttributes,
}

impl<'a> Archive<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: Vec<ArchiveFile<'a>>) -> Self {
        Self {
            files,
            tags: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, file: ArchiveFile<'a>) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveFile<'a>> {
        self.files.iter()
    }

    /// Case-insensitive lookup, as DOS filenames are
    pub fn find(&self, name: &str) -> Option<&ArchiveFile<'a>> {
        self.files.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut ArchiveFile<'a>> {
        self.files
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<ArchiveFile<'a>> {
        let index = self
            .files
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))?;
        Some(self.files.remove(index))
    }

    pub fn listing(&self) -> Vec<FileSummary> {
        self.files
            .iter()
            .map(|f| FileSummary {
                name: f.name.clone(),
                file_type: f.file_type.clone(),
                disk_size: f.disk_size,
                native_size: f.native_size,
                attributes: f.attributes,
            })
            .collect()
    }

    /// Copy every borrowed file so the archive outlives its source buffer
    pub fn into_owned(self) -> Result<Archive<'static>> {
        let files = self
            .files
            .into_iter()
            .map(ArchiveFile::into_owned)
            .collect::<Result<Vec<_>>>()?;
        Ok(Archive {
            files,
            tags: self.tags,
        })
    }
}

impl<'a> IntoIterator for Archive<'a> {
    type Item = ArchiveFile<'a>;
    type IntoIter = std::vec::IntoIter<ArchiveFile<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b Archive<'a> {
    type Item = &'b ArchiveFile<'a>;
    type IntoIter = std::slice::Iter<'b, ArchiveFile<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl<'a> FromIterator<ArchiveFile<'a>> for Archive<'a> {
    fn from_iter<I: IntoIterator<Item = ArchiveFile<'a>>>(iter: I) -> Self {
        Self::with_files(iter.into_iter().collect())
    }
}
