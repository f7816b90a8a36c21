use super::bits::{BitReader, BitWriter};
use super::Transform;
use crate::error::{ArchiveError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Largest code width the bit packer supports
const MAX_SUPPORTED_BITS: u8 = 16;

/// Declarative LZW parameter set
///
/// Codes `0..=255` are literal bytes. Dictionary entries are numbered from
/// `first_code` upward. The code width starts at `initial_bits` and grows by
/// one bit each time the next free code no longer fits, up to `max_bits`.
/// When the dictionary is full the encoder emits `reset_code` (if the
/// variant has one) and both sides start over at `first_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LzwParams {
    pub initial_bits: u8,
    pub max_bits: u8,
    pub eof_code: Option<u16>,
    pub reset_code: Option<u16>,
    pub first_code: u16,
    pub big_endian: bool,
    /// Extra capacity to reserve on top of the input-derived estimate
    pub growth_hint: usize,
}

impl LzwParams {
    fn validate(&self) -> Result<()> {
        if self.initial_bits < 9 || self.initial_bits > self.max_bits {
            return Err(ArchiveError::InvalidParameters(format!(
                "initial code width {} must be between 9 and max width {}",
                self.initial_bits, self.max_bits
            )));
        }
        if self.max_bits > MAX_SUPPORTED_BITS {
            return Err(ArchiveError::InvalidParameters(format!(
                "max code width {} exceeds {}",
                self.max_bits, MAX_SUPPORTED_BITS
            )));
        }
        for (label, code) in [("end", self.eof_code), ("reset", self.reset_code)] {
            if let Some(code) = code {
                if code < 256 || code >= self.first_code {
                    return Err(ArchiveError::InvalidParameters(format!(
                        "{} code {} must lie between 256 and first code {}",
                        label, code, self.first_code
                    )));
                }
            }
        }
        if u32::from(self.first_code) >= self.dictionary_limit() {
            return Err(ArchiveError::InvalidParameters(format!(
                "first code {} leaves no room in a {}-bit dictionary",
                self.first_code, self.max_bits
            )));
        }
        if self.first_code < 256 {
            return Err(ArchiveError::InvalidParameters(
                "first code overlaps the literal range".to_string(),
            ));
        }
        if self.eof_code.is_some() && self.eof_code == self.reset_code {
            return Err(ArchiveError::InvalidParameters(
                "end and reset codes must differ".to_string(),
            ));
        }
        Ok(())
    }

    fn dictionary_limit(&self) -> u32 {
        1u32 << self.max_bits
    }

    /// Width needed so that `next_code` is representable
    fn width_for(&self, next_code: u32) -> u32 {
        let needed = 32 - next_code.leading_zeros();
        needed.clamp(u32::from(self.initial_bits), u32::from(self.max_bits))
    }
}

/// LZW codec bound to one parameter set
#[derive(Debug, Clone, Copy)]
pub struct Lzw {
    params: LzwParams,
}

impl Lzw {
    pub fn new(params: LzwParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LzwParams {
        &self.params
    }
}

impl Transform for Lzw {
    fn reveal_capped(
        &self,
        input: &[u8],
        size_hint: Option<usize>,
        cap: Option<usize>,
    ) -> Result<Vec<u8>> {
        let p = &self.params;
        p.validate()?;

        let cap = cap.unwrap_or(usize::MAX);
        let capacity = size_hint
            .unwrap_or(input.len() * 2)
            .saturating_add(p.growth_hint)
            .min(cap);
        let mut output = Vec::with_capacity(capacity);
        let mut reader = BitReader::new(input, p.big_endian);

        let first = u32::from(p.first_code);
        let limit = p.dictionary_limit();
        let mut dict: Vec<Vec<u8>> = Vec::new();
        let mut prev: Option<Vec<u8>> = None;

        loop {
            // The encoder adds its entry for the previous code before writing
            // this one, so the width runs one entry ahead of our dictionary.
            let pending = u32::from(prev.is_some());
            let next_code = first + dict.len() as u32;
            let width = p.width_for((next_code + pending).min(limit));

            let Some(code) = reader.read(width) else {
                break;
            };

            if p.eof_code.map(u32::from) == Some(code) {
                break;
            }
            if p.reset_code.map(u32::from) == Some(code) {
                dict.clear();
                prev = None;
                continue;
            }

            let entry = if code < 256 {
                vec![code as u8]
            } else if code >= first && code < next_code {
                dict[(code - first) as usize].clone()
            } else if code == next_code {
                // Code defined by this very step: previous string plus its own first byte
                let Some(prev) = prev.as_ref() else {
                    return Err(ArchiveError::DecompressionFailed(format!(
                        "LZW code {} referenced before any string was decoded",
                        code
                    )));
                };
                let mut entry = prev.clone();
                entry.push(prev[0]);
                entry
            } else {
                return Err(ArchiveError::DecompressionFailed(format!(
                    "LZW code {} outside dictionary (next free code {})",
                    code, next_code
                )));
            };

            output.extend_from_slice(&entry);
            if output.len() >= cap {
                output.truncate(cap);
                break;
            }

            if let Some(mut prev_entry) = prev.take() {
                if next_code < limit {
                    prev_entry.push(entry[0]);
                    dict.push(prev_entry);
                }
            }
            prev = Some(entry);
        }

        tracing::trace!(input = input.len(), output = output.len(), "lzw reveal");
        Ok(output)
    }

    fn obscure(&self, input: &[u8]) -> Result<Vec<u8>> {
        let p = &self.params;
        p.validate()?;

        let first = u32::from(p.first_code);
        let limit = p.dictionary_limit();
        let mut writer = BitWriter::with_capacity(input.len() + p.growth_hint, p.big_endian);
        let mut dict: HashMap<(u32, u8), u32> = HashMap::new();
        let mut next_code = first;

        let mut bytes = input.iter().copied();
        if let Some(head) = bytes.next() {
            let mut current = u32::from(head);
            for byte in bytes {
                if let Some(&code) = dict.get(&(current, byte)) {
                    current = code;
                    continue;
                }

                writer.write(current, p.width_for(next_code));
                if next_code < limit {
                    dict.insert((current, byte), next_code);
                    next_code += 1;
                } else if let Some(reset) = p.reset_code {
                    writer.write(u32::from(reset), p.width_for(next_code));
                    dict.clear();
                    next_code = first;
                }
                current = u32::from(byte);
            }
            writer.write(current, p.width_for(next_code));
        }

        if let Some(eof) = p.eof_code {
            // Mirror the decoder, which sizes its read as if one more entry existed
            let width = if input.is_empty() {
                p.width_for(next_code)
            } else {
                p.width_for((next_code + 1).min(limit))
            };
            writer.write(u32::from(eof), width);
        }

        let output = writer.finish();
        tracing::trace!(input = input.len(), output = output.len(), "lzw obscure");
        Ok(output)
    }
}
