//! Compression transforms used by container formats
//!
//! Handlers describe their compression declaratively as a [`Pipeline`] of
//! [`Codec`] stages. `reveal` runs the stages in order, `obscure` runs them
//! in reverse, so a pipeline is written in decompression order.

mod bits;
mod lzw;
mod rle;

pub use lzw::{Lzw, LzwParams};
pub use rle::{Rle90, RLE90_ESCAPE};

use crate::error::Result;
use serde::Serialize;

/// A reversible byte transform
pub trait Transform {
    /// Decode `input`. `size_hint` is only an allocation hint.
    fn reveal(&self, input: &[u8], size_hint: Option<usize>) -> Result<Vec<u8>> {
        self.reveal_capped(input, size_hint, None)
    }

    /// Decode `input`, stopping once `cap` output bytes exist
    ///
    /// The output is the first `cap` bytes of what [`Transform::reveal`]
    /// would produce, or all of it when shorter.
    fn reveal_capped(
        &self,
        input: &[u8],
        size_hint: Option<usize>,
        cap: Option<usize>,
    ) -> Result<Vec<u8>>;

    /// Encode `input`
    fn obscure(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// How much input is enough to decode `output_cap` bytes, if that is bounded
    fn input_bound(&self, _output_cap: usize) -> Option<usize> {
        None
    }
}

/// One stage of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Codec {
    Lzw(LzwParams),
    Rle90,
}

impl Transform for Codec {
    fn reveal_capped(
        &self,
        input: &[u8],
        size_hint: Option<usize>,
        cap: Option<usize>,
    ) -> Result<Vec<u8>> {
        match self {
            Codec::Lzw(params) => Lzw::new(*params).reveal_capped(input, size_hint, cap),
            Codec::Rle90 => Rle90.reveal_capped(input, size_hint, cap),
        }
    }

    fn obscure(&self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Codec::Lzw(params) => Lzw::new(*params).obscure(input),
            Codec::Rle90 => Rle90.obscure(input),
        }
    }

    fn input_bound(&self, output_cap: usize) -> Option<usize> {
        match self {
            Codec::Lzw(params) => Lzw::new(*params).input_bound(output_cap),
            Codec::Rle90 => Rle90.input_bound(output_cap),
        }
    }
}

/// Ordered chain of codecs, listed in decompression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    stages: &'static [Codec],
}

impl Pipeline {
    pub const fn new(stages: &'static [Codec]) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &'static [Codec] {
        self.stages
    }
}

impl Transform for Pipeline {
    fn reveal_capped(
        &self,
        input: &[u8],
        size_hint: Option<usize>,
        cap: Option<usize>,
    ) -> Result<Vec<u8>> {
        // Each stage only needs as much output as the next stage can consume
        let mut caps = vec![cap; self.stages.len()];
        for i in (1..self.stages.len()).rev() {
            caps[i - 1] = caps[i].and_then(|c| self.stages[i].input_bound(c));
        }

        let mut data = input.to_vec();
        let last = self.stages.len().saturating_sub(1);
        for (i, stage) in self.stages.iter().enumerate() {
            // Only the final stage knows the expected output size
            let hint = if i == last { size_hint } else { None };
            data = stage.reveal_capped(&data, hint, caps[i])?;
        }
        if let Some(cap) = cap {
            data.truncate(cap);
        }
        Ok(data)
    }

    fn obscure(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut data = input.to_vec();
        for stage in self.stages.iter().rev() {
            data = stage.obscure(&data)?;
        }
        Ok(data)
    }
}

/// Decompress `input` through `pipeline`
pub fn reveal(input: &[u8], pipeline: &Pipeline, size_hint: Option<usize>) -> Result<Vec<u8>> {
    pipeline.reveal(input, size_hint)
}

/// Compress `input` through `pipeline`
pub fn obscure(input: &[u8], pipeline: &Pipeline) -> Result<Vec<u8>> {
    pipeline.obscure(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LZW: LzwParams = LzwParams {
        initial_bits: 9,
        max_bits: 12,
        eof_code: Some(256),
        reset_code: Some(257),
        first_code: 258,
        big_endian: false,
        growth_hint: 16,
    };

    static CHAIN: Pipeline = Pipeline::new(&[Codec::Lzw(LZW), Codec::Rle90]);

    #[test]
    fn test_pipeline_order() {
        let data = b"\x00\x00\x00\x00\x00\x00\x00\x00tile tile tile".to_vec();
        let packed = obscure(&data, &CHAIN).unwrap();

        // Compression runs RLE first, so LZW alone yields the RLE stream
        let rle_stream = Codec::Lzw(LZW).reveal(&packed, None).unwrap();
        assert_eq!(rle_stream, Rle90.obscure(&data).unwrap());

        assert_eq!(reveal(&packed, &CHAIN, Some(data.len())).unwrap(), data);
    }

    #[test]
    fn test_capped_reveal_is_prefix() {
        let data: Vec<u8> = (0..3000u32)
            .map(|i| if i % 100 < 60 { 0x90 } else { i as u8 })
            .collect();
        let packed = obscure(&data, &CHAIN).unwrap();

        for cap in [0, 1, 59, 60, 61, 500, 2999, 3000, 5000] {
            let capped = CHAIN.reveal_capped(&packed, None, Some(cap)).unwrap();
            assert_eq!(capped, &data[..cap.min(data.len())], "cap {}", cap);
        }
    }

    #[test]
    fn test_stage_caps_follow_input_bounds() {
        assert_eq!(Codec::Rle90.input_bound(10), Some(22));
        assert_eq!(Codec::Lzw(LZW).input_bound(10), None);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let identity = Pipeline::new(&[]);
        assert_eq!(identity.obscure(b"abc").unwrap(), b"abc");
        assert_eq!(identity.reveal(b"abc", None).unwrap(), b"abc");
    }
}
