//! Variable-width code packing for the LZW codec.
//!
//! Little-endian packing fills each byte from the least significant bit
//! upward; big-endian packing fills from the most significant bit downward.

/// Reads fixed-width codes out of a byte slice
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    acc: u32,
    acc_bits: u32,
    big_endian: bool,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8], big_endian: bool) -> Self {
        Self {
            data,
            pos: 0,
            acc: 0,
            acc_bits: 0,
            big_endian,
        }
    }

    /// Read the next `width`-bit code, or `None` once fewer than `width`
    /// bits remain (trailing padding).
    pub fn read(&mut self, width: u32) -> Option<u32> {
        debug_assert!(width > 0 && width <= 24);
        while self.acc_bits < width {
            let byte = *self.data.get(self.pos)? as u32;
            self.pos += 1;
            if self.big_endian {
                self.acc = (self.acc << 8) | byte;
            } else {
                self.acc |= byte << self.acc_bits;
            }
            self.acc_bits += 8;
        }

        let mask = (1u32 << width) - 1;
        let code = if self.big_endian {
            (self.acc >> (self.acc_bits - width)) & mask
        } else {
            let code = self.acc & mask;
            self.acc >>= width;
            code
        };
        self.acc_bits -= width;
        if self.big_endian {
            self.acc &= (1u32 << self.acc_bits) - 1;
        }
        Some(code)
    }
}

/// Packs fixed-width codes into a growable byte buffer
pub struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    acc_bits: u32,
    big_endian: bool,
}

impl BitWriter {
    pub fn with_capacity(capacity: usize, big_endian: bool) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            acc: 0,
            acc_bits: 0,
            big_endian,
        }
    }

    pub fn write(&mut self, code: u32, width: u32) {
        debug_assert!(width > 0 && width <= 24);
        debug_assert!(code < (1u32 << width));
        if self.big_endian {
            self.acc = (self.acc << width) | code;
            self.acc_bits += width;
            while self.acc_bits >= 8 {
                self.acc_bits -= 8;
                self.out.push((self.acc >> self.acc_bits) as u8);
            }
            self.acc &= (1u32 << self.acc_bits) - 1;
        } else {
            self.acc |= code << self.acc_bits;
            self.acc_bits += width;
            while self.acc_bits >= 8 {
                self.out.push(self.acc as u8);
                self.acc >>= 8;
                self.acc_bits -= 8;
            }
        }
    }

    /// Flush any partial byte (zero padded) and return the packed output
    pub fn finish(mut self) -> Vec<u8> {
        if self.acc_bits > 0 {
            let byte = if self.big_endian {
                self.acc << (8 - self.acc_bits)
            } else {
                self.acc
            };
            self.out.push(byte as u8);
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut writer = BitWriter::with_capacity(4, false);
        writer.write(0x101, 9);
        writer.write(0x0FF, 9);
        let bytes = writer.finish();
        // 0x101 | 0x0FF << 9 = 0x1FF01, 18 bits over 3 bytes
        assert_eq!(bytes, vec![0x01, 0xFF, 0x01]);

        let mut reader = BitReader::new(&bytes, false);
        assert_eq!(reader.read(9), Some(0x101));
        assert_eq!(reader.read(9), Some(0x0FF));
        assert_eq!(reader.read(9), None);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut writer = BitWriter::with_capacity(4, true);
        writer.write(0x101, 9);
        writer.write(0x0FF, 9);
        let bytes = writer.finish();
        // 1_0000_0001 0_1111_1111 then 6 padding bits
        assert_eq!(bytes, vec![0x80, 0xBF, 0xC0]);

        let mut reader = BitReader::new(&bytes, true);
        assert_eq!(reader.read(9), Some(0x101));
        assert_eq!(reader.read(9), Some(0x0FF));
        assert_eq!(reader.read(9), None);
    }

    #[test]
    fn test_width_changes_mid_stream() {
        for big_endian in [false, true] {
            let mut writer = BitWriter::with_capacity(8, big_endian);
            writer.write(300, 9);
            writer.write(1000, 10);
            writer.write(4000, 12);
            let bytes = writer.finish();

            let mut reader = BitReader::new(&bytes, big_endian);
            assert_eq!(reader.read(9), Some(300));
            assert_eq!(reader.read(10), Some(1000));
            assert_eq!(reader.read(12), Some(4000));
        }
    }
}
