use crate::bits::{bytes_needed, from_wire, to_wire};
use crate::error::Result;

use super::Lz77Config;

/// One LZ77 output unit: a back-reference followed by a literal
///
/// `offset` counts back from the end of the window; 0 means no reference
/// and then `length` is 0 as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub offset: u32,
    pub length: u32,
    pub literal: u8,
}

impl Token {
    pub fn literal(byte: u8) -> Self {
        Self { offset: 0, length: 0, literal: byte }
    }

    pub fn is_literal(&self) -> bool {
        self.offset == 0 && self.length == 0
    }

    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        self.length as usize + 1
    }
}

/// Fixed field widths of a token on the wire
///
/// `[offset: bytes_needed(window_size)][length: bytes_needed(buffer_size)][literal: 1]`,
/// each field big-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenFormat {
    offset_bytes: usize,
    length_bytes: usize,
}

impl TokenFormat {
    pub fn new(config: &Lz77Config) -> Self {
        Self {
            offset_bytes: bytes_needed(config.window_size),
            length_bytes: bytes_needed(config.buffer_size),
        }
    }

    /// Bytes per encoded token
    pub fn width(&self) -> usize {
        self.offset_bytes + self.length_bytes + 1
    }

    pub fn encode(&self, token: &Token, out: &mut Vec<u8>) -> Result<()> {
        to_wire(token.offset as u64, self.offset_bytes, out)?;
        to_wire(token.length as u64, self.length_bytes, out)?;
        out.push(token.literal);
        Ok(())
    }

    /// Decode one token from exactly `width()` bytes
    pub fn decode(&self, bytes: &[u8]) -> Token {
        debug_assert_eq!(bytes.len(), self.width());
        let (offset, rest) = bytes.split_at(self.offset_bytes);
        let (length, literal) = rest.split_at(self.length_bytes);
        Token {
            offset: from_wire(offset) as u32,
            length: from_wire(length) as u32,
            literal: literal[0],
        }
    }
}
