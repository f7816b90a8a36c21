mod file;
mod model;

pub use file::{ArchiveFile, Decoder, FileAttributes, FileData};
pub use model::{Archive, FileSummary};
