use crate::error::{ArchiveError, Result};
use crate::handler::LimitIssue;
use std::io::{Cursor, Read, Write};

/// Record size in bytes
pub const RECORD_LEN: usize = 37;

/// Filename field width, terminator included
pub const NAME_FIELD_LEN: usize = 31;

/// Longest name that still leaves room for the terminator
pub const MAX_STORED_NAME_LEN: usize = NAME_FIELD_LEN - 1;

/// Fixed-width directory record preceding each file body
///
/// Structure (37 bytes, little-endian):
/// - Type code: uint16
/// - Compressed size: uint16 (bytes of body following the record)
/// - Filename: 31 bytes, NUL or space terminated, printable ASCII
/// - Decompressed size: uint16 (0 = body stored uncompressed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatRecord {
    pub type_code: u16,
    pub compressed_size: u16,
    pub name: String,
    pub decompressed_size: u16,
}

impl FatRecord {
    pub fn is_compressed(&self) -> bool {
        self.decompressed_size != 0
    }

    /// Write the record to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let name_field = encode_name(&self.name)?;

        writer.write_all(&self.type_code.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        writer.write_all(&name_field)?;
        writer.write_all(&self.decompressed_size.to_le_bytes())?;

        Ok(RECORD_LEN)
    }

    /// Read a record from a reader, validating the filename field
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let type_code = read_u16(&mut reader)?;
        let compressed_size = read_u16(&mut reader)?;

        let mut name_field = [0u8; NAME_FIELD_LEN];
        reader.read_exact(&mut name_field)?;
        let name = decode_name(&name_field)?;

        let decompressed_size = read_u16(&mut reader)?;

        Ok(Self {
            type_code,
            compressed_size,
            name,
            decompressed_size,
        })
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

fn decode_name(field: &[u8; NAME_FIELD_LEN]) -> Result<String> {
    let name = match field.iter().position(|&b| b == 0) {
        Some(end) => &field[..end],
        None if field[NAME_FIELD_LEN - 1] == b' ' => &field[..],
        None => {
            return Err(ArchiveError::InvalidFormat(
                "Filename field has no terminator".to_string(),
            ))
        }
    };

    if let Some(&bad) = name.iter().find(|&&b| !is_printable(b)) {
        return Err(ArchiveError::InvalidFormat(format!(
            "Filename contains non-printable byte 0x{:02X}",
            bad
        )));
    }

    // Printable ASCII maps one byte to one char
    Ok(name
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end_matches(' ')
        .to_string())
}

/// Why `name` cannot go into a record, if it cannot
pub fn name_problem(name: &str) -> Option<&'static str> {
    if name.len() > MAX_STORED_NAME_LEN {
        Some("longer than 30 characters")
    } else if !name.bytes().all(is_printable) {
        Some("only printable ASCII is allowed")
    } else if name.ends_with(' ') {
        Some("trailing spaces are not preserved")
    } else {
        None
    }
}

fn encode_name(name: &str) -> Result<[u8; NAME_FIELD_LEN]> {
    if let Some(reason) = name_problem(name) {
        return Err(ArchiveError::LimitsExceeded(vec![LimitIssue::InvalidName {
            name: name.to_string(),
            reason,
        }]));
    }

    let mut field = [0u8; NAME_FIELD_LEN];
    field[..name.len()].copy_from_slice(name.as_bytes());
    Ok(field)
}

fn read_u16<R: Read>(mut reader: R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Walks records end to end over a container buffer
pub struct RecordWalker<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> RecordWalker<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(content),
        }
    }

    /// Bytes between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.cursor.position() as usize
    }

    /// Read the next record and skip its body
    ///
    /// Returns the record with the offset of its body, or `None` exactly at
    /// the end of the buffer.
    pub fn next_entry(&mut self) -> Result<Option<(FatRecord, usize)>> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < RECORD_LEN {
            return Err(ArchiveError::InvalidFormat(format!(
                "Truncated record: {} bytes left, record needs {}",
                remaining, RECORD_LEN
            )));
        }

        let record = FatRecord::read_from(&mut self.cursor)?;
        let body_offset = self.cursor.position() as usize;
        let body_len = record.compressed_size as usize;
        if body_len > self.remaining() {
            return Err(ArchiveError::InvalidFormat(format!(
                "File {:?} runs past end of archive: {} bytes declared, {} left",
                record.name,
                body_len,
                self.remaining()
            )));
        }

        self.cursor.set_position((body_offset + body_len) as u64);
        Ok(Some((record, body_offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FatRecord {
        FatRecord {
            type_code: 1,
            compressed_size: 0x0102,
            name: "LEVEL1".to_string(),
            decompressed_size: 0x0304,
        }
    }

    #[test]
    fn test_record_layout() {
        let mut buf = Vec::new();
        let written = sample().write_to(&mut buf).unwrap();

        assert_eq!(written, RECORD_LEN);
        assert_eq!(buf.len(), RECORD_LEN);
        assert_eq!(&buf[0..2], &[0x01, 0x00]);
        assert_eq!(&buf[2..4], &[0x02, 0x01]);
        assert_eq!(&buf[4..10], b"LEVEL1");
        assert!(buf[10..35].iter().all(|&b| b == 0));
        assert_eq!(&buf[35..37], &[0x04, 0x03]);

        assert_eq!(FatRecord::read_from(&buf[..]).unwrap(), sample());
    }

    #[test]
    fn test_space_terminated_name() {
        let mut buf = vec![32, 0, 0, 0];
        let mut field = [b' '; NAME_FIELD_LEN];
        field[..4].copy_from_slice(b"DEMO");
        buf.extend_from_slice(&field);
        buf.extend_from_slice(&[0, 0]);

        let record = FatRecord::read_from(&buf[..]).unwrap();
        assert_eq!(record.name, "DEMO");
    }

    #[test]
    fn test_unterminated_name_rejected() {
        let mut buf = vec![0, 0, 0, 0];
        buf.extend_from_slice(&[b'A'; NAME_FIELD_LEN]);
        buf.extend_from_slice(&[0, 0]);

        let err = FatRecord::read_from(&buf[..]).unwrap_err();
        assert!(err.to_string().contains("no terminator"));
    }

    #[test]
    fn test_control_byte_rejected() {
        let mut buf = vec![0, 0, 0, 0];
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..3].copy_from_slice(&[b'A', 0x07, b'B']);
        buf.extend_from_slice(&field);
        buf.extend_from_slice(&[0, 0]);

        let err = FatRecord::read_from(&buf[..]).unwrap_err();
        assert!(err.to_string().contains("0x07"));
    }

    #[test]
    fn test_name_problems() {
        assert_eq!(name_problem("OK.BIN"), None);
        assert!(name_problem(&"X".repeat(31)).is_some());
        assert_eq!(name_problem(&"X".repeat(30)), None);
        assert!(name_problem("tab\there").is_some());
        assert!(name_problem("ü").is_some());
        assert!(name_problem("SPACE ").is_some());
    }

    #[test]
    fn test_walker_offsets() {
        let mut buf = Vec::new();
        let first = FatRecord {
            type_code: 32,
            compressed_size: 3,
            name: "A".to_string(),
            decompressed_size: 0,
        };
        first.write_to(&mut buf).unwrap();
        buf.extend_from_slice(b"abc");
        let second = FatRecord {
            name: "B".to_string(),
            compressed_size: 0,
            ..first.clone()
        };
        second.write_to(&mut buf).unwrap();

        let mut walker = RecordWalker::new(&buf);
        assert_eq!(walker.next_entry().unwrap(), Some((first, RECORD_LEN)));
        assert_eq!(
            walker.next_entry().unwrap(),
            Some((second, RECORD_LEN * 2 + 3))
        );
        assert_eq!(walker.next_entry().unwrap(), None);
    }
}
