use super::Transform;
use crate::error::{ArchiveError, Result};

/// Escape byte introducing a run
pub const RLE90_ESCAPE: u8 = 0x90;

/// Shortest run worth encoding as `byte 0x90 n`
const MIN_RUN: usize = 3;

/// Longest run a single count byte can express
const MAX_RUN: usize = 255;

/// RLE90 run-length codec
///
/// `0x90 0x00` is a literal `0x90`. `0x90 n` (n > 0) repeats the previously
/// emitted byte `n - 1` more times, so the run totals `n` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rle90;

impl Transform for Rle90 {
    fn reveal_capped(
        &self,
        input: &[u8],
        size_hint: Option<usize>,
        cap: Option<usize>,
    ) -> Result<Vec<u8>> {
        let cap = cap.unwrap_or(usize::MAX);
        let capacity = size_hint.unwrap_or(input.len() * 2).min(cap);
        let mut output = Vec::with_capacity(capacity);
        let mut iter = input.iter().copied();
        let mut prev: Option<u8> = None;

        while let Some(byte) = iter.next() {
            if output.len() >= cap {
                break;
            }

            if byte != RLE90_ESCAPE {
                output.push(byte);
                prev = Some(byte);
                continue;
            }

            // A trailing lone escape is padding left behind by the packer
            let Some(count) = iter.next() else {
                break;
            };
            if count == 0 {
                output.push(RLE90_ESCAPE);
                prev = Some(RLE90_ESCAPE);
                continue;
            }

            let Some(repeat) = prev else {
                return Err(ArchiveError::DecompressionFailed(
                    "RLE run with no preceding byte".to_string(),
                ));
            };
            let room = cap - output.len();
            output.extend(std::iter::repeat(repeat).take((count as usize - 1).min(room)));
        }

        Ok(output)
    }

    /// Every escape sequence this codec writes decodes to at least one byte
    /// per two input bytes, so a prefix of that length always suffices.
    fn input_bound(&self, output_cap: usize) -> Option<usize> {
        Some(output_cap.saturating_mul(2).saturating_add(2))
    }

    fn obscure(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() + input.len() / 8);
        let mut pos = 0;

        while pos < input.len() {
            let byte = input[pos];
            let run = input[pos..]
                .iter()
                .take(MAX_RUN)
                .take_while(|&&b| b == byte)
                .count();

            push_literal(&mut output, byte);
            if run >= MIN_RUN {
                output.push(RLE90_ESCAPE);
                output.push(run as u8);
            } else {
                for _ in 1..run {
                    push_literal(&mut output, byte);
                }
            }
            pos += run;
        }

        Ok(output)
    }
}

fn push_literal(output: &mut Vec<u8>, byte: u8) {
    output.push(byte);
    if byte == RLE90_ESCAPE {
        output.push(0);
    }
}
