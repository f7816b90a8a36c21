//! FAST engine `.DAT` containers (Monster Bash)
//!
//! The container is a flat run of 37-byte records, each followed directly
//! by its file body. There is no header or signature, so identification
//! walks every record and checks that the last body ends exactly at the end
//! of the buffer.
//!
//! Compressed bodies are LZW (9 to 12-bit codes, LSB first) over an RLE90
//! stream.

mod record;
mod types;

pub use record::{FatRecord, RecordWalker, MAX_STORED_NAME_LEN, NAME_FIELD_LEN, RECORD_LEN};
pub use types::{code_for_name, lookup_code, TypeEntry, CODE_NONE, CODE_SOUND, TYPE_TABLE};

use crate::archive::{Archive, ArchiveFile, Decoder};
use crate::compression::{Codec, LzwParams, Pipeline, Transform};
use crate::error::{ArchiveError, Result};
use crate::handler::limits::{check_attributes, check_file_count, check_native_size};
use crate::handler::{
    ArchiveHandler, AttributeCapabilities, Capabilities, ContentBundle, DetectionClass,
    FileCapabilities, Identification, LimitIssue, Metadata,
};

/// Give up identifying after this many records
///
/// The format has no file count field; this only bounds the walk over
/// arbitrary input.
pub const MAX_IDENTIFY_FILES: usize = 4096;

/// Spare output capacity reserved when decompressing
pub const DECODE_OVERRUN: usize = 16;

/// Largest size either record size field can hold
pub const MAX_FILE_SIZE: usize = u16::MAX as usize;

pub const LZW_PARAMS: LzwParams = LzwParams {
    initial_bits: 9,
    max_bits: 12,
    eof_code: Some(256),
    reset_code: Some(257),
    first_code: 258,
    big_endian: false,
    growth_hint: 0,
};

static CODEC: Pipeline = Pipeline::new(&[Codec::Lzw(LZW_PARAMS), Codec::Rle90]);

fn decoder() -> Decoder {
    Decoder {
        pipeline: &CODEC,
        overrun: DECODE_OVERRUN,
    }
}

/// Body bytes and record decompressed size for one file's content
fn encode_body(file: &ArchiveFile<'_>, content: &[u8]) -> Result<(Vec<u8>, usize)> {
    // A zero decompressed size means "stored", so empty files are never packed
    if file.attributes.compressed == Some(false) || content.is_empty() {
        Ok((content.to_vec(), 0))
    } else {
        Ok((CODEC.obscure(content)?, content.len()))
    }
}

/// Either size field overflowing its 16 bits
fn size_issue(file: &ArchiveFile<'_>, native_len: usize, body_len: usize) -> Option<LimitIssue> {
    [native_len, body_len]
        .into_iter()
        .find(|&size| size > MAX_FILE_SIZE)
        .map(|size| LimitIssue::FileTooLarge {
            name: file.name.clone(),
            size,
            max: MAX_FILE_SIZE,
        })
}

/// Handler for FAST engine `.DAT` containers
#[derive(Debug, Clone, Copy, Default)]
pub struct DatFastHandler;

impl DatFastHandler {
    pub const ID: &'static str = "arc-dat-fast";
}

impl ArchiveHandler for DatFastHandler {
    fn metadata(&self) -> Metadata {
        Metadata {
            id: Self::ID,
            title: "FAST Engine .DAT File",
            games: vec!["Monster Bash"],
            glob: vec!["bash*.dat"],
            detection: DetectionClass::Enumeration,
            caps: Capabilities {
                max_file_count: None,
                file: FileCapabilities {
                    last_modified: false,
                    attributes: AttributeCapabilities {
                        compressed: true,
                        encrypted: false,
                    },
                    max_filename_len: Some(MAX_STORED_NAME_LEN),
                },
                tags: Default::default(),
            },
        }
    }

    fn check_limits(&self, archive: &Archive<'_>) -> Vec<LimitIssue> {
        let metadata = self.metadata();
        let caps = &metadata.caps;
        let mut issues: Vec<LimitIssue> = check_file_count(caps, archive).into_iter().collect();

        for file in archive {
            // Limits apply to the name as written, after the type extension is removed
            let (_, stored_name) = code_for_name(&file.name);
            if let Some(reason) = record::name_problem(stored_name) {
                issues.push(LimitIssue::InvalidName {
                    name: file.name.clone(),
                    reason,
                });
            }
            issues.extend(check_attributes(caps, file));

            if let Some(issue) = check_native_size(file) {
                issues.push(issue);
                continue;
            }
            let Ok(content) = file.content() else {
                continue;
            };
            // The packed size is only known after packing
            match encode_body(file, &content) {
                Ok((body, _)) => issues.extend(size_issue(file, content.len(), body.len())),
                Err(e) => issues.push(LimitIssue::UnreadableContent {
                    name: file.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        issues
    }

    fn identify(&self, content: &[u8], _filename: &str) -> Identification {
        let mut walker = RecordWalker::new(content);
        for _ in 0..MAX_IDENTIFY_FILES {
            match walker.next_entry() {
                Ok(None) => {
                    return Identification::certain("All records end exactly at end of file")
                }
                Ok(Some(_)) => {}
                Err(e) => return Identification::rejected(e.to_string()),
            }
        }
        Identification::rejected(format!("Too many files (over {})", MAX_IDENTIFY_FILES))
    }

    fn parse<'a>(&self, bundle: &'a ContentBundle) -> Result<Archive<'a>> {
        let content = bundle.main.as_slice();
        let mut walker = RecordWalker::new(content);
        let mut archive = Archive::new();

        while let Some((record, offset)) = walker.next_entry()? {
            let (extension, file_type) = lookup_code(record.type_code);
            let name = format!("{}{}", record.name, extension);
            tracing::debug!(
                name = %name,
                offset,
                type_code = record.type_code,
                compressed_size = record.compressed_size,
                decompressed_size = record.decompressed_size,
                "read record"
            );

            let mut file =
                ArchiveFile::from_span(name, content, offset, record.compressed_size as usize);
            if let Some(file_type) = file_type {
                file = file.with_type(file_type);
            }
            file = if record.is_compressed() {
                file.with_compression(Some(true))
                    .with_decoder(decoder(), record.decompressed_size as usize)
            } else {
                file.with_compression(Some(false))
            };
            archive.push(file);
        }

        Ok(archive)
    }

    fn generate(&self, archive: &Archive<'_>) -> Result<ContentBundle> {
        let total = RECORD_LEN * archive.len()
            + archive.iter().map(|f| f.native_size).sum::<usize>();
        let mut output = Vec::with_capacity(total);

        for file in archive {
            let (type_code, stored_name) = code_for_name(&file.name);

            let content = file.content()?;
            if file.native_size == 0 && !content.is_empty() {
                tracing::warn!(
                    name = %file.name,
                    actual = content.len(),
                    "native size is 0 but content is not empty; writing the content length"
                );
            } else if content.len() != file.native_size {
                return Err(ArchiveError::SizeMismatch {
                    name: file.name.clone(),
                    expected: file.native_size,
                    actual: content.len(),
                });
            }

            let (body, decompressed_size) = encode_body(file, &content)?;
            if let Some(issue) = size_issue(file, content.len(), body.len()) {
                return Err(ArchiveError::LimitsExceeded(vec![issue]));
            }

            let record = FatRecord {
                type_code,
                compressed_size: body.len() as u16,
                name: stored_name.to_string(),
                decompressed_size: decompressed_size as u16,
            };
            tracing::debug!(
                name = %file.name,
                type_code,
                native_size = file.native_size,
                disk_size = body.len(),
                "write record"
            );
            record.write_to(&mut output)?;
            output.extend_from_slice(&body);
        }

        Ok(ContentBundle::new(output))
    }
}
