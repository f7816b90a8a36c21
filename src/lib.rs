//! gamearchive-rs: read, write and autodetect DOS-era game resource archives
//!
//! This library works entirely on in-memory buffers, combining:
//! - A format handler contract (capabilities, limit checks, identify, parse, generate)
//! - Graded autodetection across every registered format
//! - Lazy member access, decompressing only when content is requested
//! - The LZW and RLE transforms those formats compress with
//!
//! # Example
//!
//! ```
//! use gamearchive_rs::{Archive, ArchiveFile, ContentBundle, Registry};
//!
//! let registry = Registry::with_builtin_formats();
//! let handler = registry.handler("arc-dat-fast")?;
//!
//! // Build an archive and write it out
//! let mut archive = Archive::new();
//! archive.push(ArchiveFile::from_content("LEVEL1.mbg", vec![0u8; 64]));
//! assert!(handler.check_limits(&archive).is_empty());
//! let bundle = handler.generate(&archive)?;
//!
//! // Detect the format again and read the file back
//! let found = registry.find_handler(&bundle.main, "bash1.dat");
//! let parsed = found[0].parse(&bundle)?;
//! assert_eq!(parsed.files[0].file_type.as_deref(), Some("map/fast-bg"));
//! assert_eq!(parsed.files[0].content()?.len(), 64);
//! # Ok::<(), gamearchive_rs::ArchiveError>(())
//! ```

// Core modules
pub mod archive;
pub mod compression;
pub mod error;
pub mod formats;
pub mod handler;
pub mod registry;

// Re-export commonly used types
pub use archive::{Archive, ArchiveFile, Decoder, FileAttributes, FileData, FileSummary};
pub use compression::{Codec, LzwParams, Pipeline, Transform};
pub use error::{ArchiveError, Result};
pub use formats::DatFastHandler;
pub use handler::{
    ArchiveHandler, Capabilities, Confidence, ContentBundle, DetectionClass, Identification,
    LimitIssue, Metadata,
};
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Ensure core types are accessible
        let registry = Registry::default();
        assert_eq!(registry.list_handlers().count(), 1);
        let _file = ArchiveFile::from_content("A", Vec::new());
    }
}
