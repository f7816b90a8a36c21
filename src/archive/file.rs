use crate::compression::{Pipeline, Transform};
use crate::error::{ArchiveError, Result};
use serde::Serialize;
use std::borrow::Cow;

/// Per-file attribute flags
///
/// `None` leaves the choice to the format's default behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub compressed: Option<bool>,
    pub encrypted: Option<bool>,
}

/// Where a file's on-disk bytes live
#[derive(Debug, Clone)]
pub enum FileData<'a> {
    /// A byte range inside a container buffer the archive was parsed from
    Span {
        buffer: &'a [u8],
        offset: usize,
        length: usize,
    },
    /// Bytes the archive owns
    Owned(Vec<u8>),
}

impl<'a> FileData<'a> {
    /// Resolve to the stored bytes
    pub fn bytes(&self) -> Result<&[u8]> {
        match self {
            FileData::Span {
                buffer,
                offset,
                length,
            } => offset
                .checked_add(*length)
                .and_then(|end| buffer.get(*offset..end))
                .ok_or_else(|| {
                    ArchiveError::InvalidFormat(format!(
                        "File data {}+{} runs past end of {}-byte container",
                        offset,
                        length,
                        buffer.len()
                    ))
                }),
            FileData::Owned(bytes) => Ok(bytes),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FileData::Span { length, .. } => *length,
            FileData::Owned(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy borrowed bytes so the data no longer depends on the source buffer
    pub fn into_owned(self) -> Result<FileData<'static>> {
        Ok(match self {
            FileData::Owned(bytes) => FileData::Owned(bytes),
            span => FileData::Owned(span.bytes()?.to_vec()),
        })
    }
}

/// How to turn a file's on-disk bytes back into its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    pub pipeline: &'static Pipeline,
    /// Extra output capacity reserved beyond `native_size`
    pub overrun: usize,
}

/// One member file inside a container
#[derive(Debug, Clone)]
pub struct ArchiveFile<'a> {
    pub name: String,
    /// Semantic content type, e.g. `map/fast-bg`
    pub file_type: Option<String>,
    /// Bytes occupied inside the container, known after parse
    pub disk_size: Option<usize>,
    /// Length of the decoded content
    pub native_size: usize,
    pub attributes: FileAttributes,
    data: FileData<'a>,
    decoder: Option<Decoder>,
}

impl ArchiveFile<'static> {
    /// Create a file from its logical content, e.g. when building a new archive
    pub fn from_content(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            file_type: None,
            disk_size: None,
            native_size: content.len(),
            attributes: FileAttributes::default(),
            data: FileData::Owned(content),
            decoder: None,
        }
    }
}

impl<'a> ArchiveFile<'a> {
    /// Create a file backed by `length` bytes of `buffer` starting at `offset`
    ///
    /// The bytes are stored as-is until a decoder is attached with
    /// [`ArchiveFile::with_decoder`].
    pub fn from_span(
        name: impl Into<String>,
        buffer: &'a [u8],
        offset: usize,
        length: usize,
    ) -> Self {
        Self {
            name: name.into(),
            file_type: None,
            disk_size: Some(length),
            native_size: length,
            attributes: FileAttributes::default(),
            data: FileData::Span {
                buffer,
                offset,
                length,
            },
            decoder: None,
        }
    }

    pub fn with_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    pub fn with_compression(mut self, compressed: Option<bool>) -> Self {
        self.attributes.compressed = compressed;
        self
    }

    pub fn with_encryption(mut self, encrypted: Option<bool>) -> Self {
        self.attributes.encrypted = encrypted;
        self
    }

    /// Mark the stored bytes as encoded, decoding to `native_size` bytes
    pub fn with_decoder(mut self, decoder: Decoder, native_size: usize) -> Self {
        self.decoder = Some(decoder);
        self.native_size = native_size;
        self
    }

    pub fn data(&self) -> &FileData<'a> {
        &self.data
    }

    pub fn decoder(&self) -> Option<&Decoder> {
        self.decoder.as_ref()
    }

    /// The exact bytes stored in the container, no transform applied
    pub fn raw(&self) -> Result<&[u8]> {
        self.data.bytes()
    }

    /// The decoded content
    ///
    /// Encoded files run through their decoder pipeline on every call and
    /// the output is cut to `native_size`, as some pipelines leave padding
    /// bytes behind. Decoding stops `overrun` bytes past `native_size`, so a
    /// small body cannot expand without bound.
    pub fn content(&self) -> Result<Cow<'_, [u8]>> {
        let raw = self.raw()?;
        let Some(decoder) = self.decoder else {
            return Ok(Cow::Borrowed(raw));
        };

        let cap = self.native_size.saturating_add(decoder.overrun);
        let mut content = decoder.pipeline.reveal_capped(raw, Some(cap), Some(cap))?;
        if content.len() < self.native_size {
            return Err(ArchiveError::DecompressionFailed(format!(
                "{} decoded to {} bytes, expected {}",
                self.name,
                content.len(),
                self.native_size
            )));
        }
        content.truncate(self.native_size);
        Ok(Cow::Owned(content))
    }

    /// Replace the file's content, dropping any on-disk encoding
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.native_size = content.len();
        self.disk_size = None;
        self.data = FileData::Owned(content);
        self.decoder = None;
    }

    /// Detach the file from the buffer it was parsed from
    pub fn into_owned(self) -> Result<ArchiveFile<'static>> {
        Ok(ArchiveFile {
            name: self.name,
            file_type: self.file_type,
            disk_size: self.disk_size,
            native_size: self.native_size,
            attributes: self.attributes,
            data: self.data.into_owned()?,
            decoder: self.decoder,
        })
    }
}
