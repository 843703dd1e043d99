use crate::error::{Error, Result};

/// Return the bit at absolute index `position` in `bits`
///
/// Bit 0 of a byte is its most significant bit. Positions past the end of
/// the buffer are reported as `UnexpectedEof`.
#[inline]
pub fn bit_at(bits: &[u8], position: u64) -> Result<bool> {
    let byte = usize::try_from(position / 8).map_err(|_| Error::UnexpectedEof)?;
    let mask = 0x80u8 >> (position % 8);
    bits.get(byte).map(|b| b & mask != 0).ok_or(Error::UnexpectedEof)
}

/// Bit-level reader over an in-memory buffer
///
/// Mirrors `BitWriter`: bits are consumed MSB-first within each byte.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute bit position of the next read
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = bit_at(self.data, self.position)?;
        self.position += 1;
        Ok(bit)
    }

    /// Read `n` bits (0-64), most significant first
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        debug_assert!(n <= 64, "Cannot read more than 64 bits at once");

        if self.bits_remaining() < n as u64 {
            return Err(Error::UnexpectedEof);
        }

        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

    /// Read 8 bits as a byte (need not be aligned)
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.read_bits(8).map(|v| v as u8)
    }

    /// Discard remaining bits in current byte, align to next byte boundary
    pub fn align_to_byte(&mut self) {
        self.position = self.position.div_ceil(8) * 8;
    }

    /// Current absolute bit position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bits left before the end of the buffer
    pub fn bits_remaining(&self) -> u64 {
        (self.data.len() as u64 * 8).saturating_sub(self.position)
    }

    /// The unread bytes from the next byte boundary on
    pub fn remaining_bytes(&self) -> &'a [u8] {
        let start = self.position.div_ceil(8) as usize;
        self.data.get(start..).unwrap_or(&[])
    }
}
