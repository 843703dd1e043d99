//! Self-describing stream header.
//!
//! ```text
//! [original length: 32 bits][symbol count: 16 bits]
//! per symbol: [value: 8 bits][code length: 8 bits][code: length bits]
//! zero padding to a byte boundary
//! ```
//!
//! All fields are MSB-first, so the two integers read big-endian.

use super::tree::{Code, CodeTable, MAX_CODE_BITS};
use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// Decoded header contents
#[derive(Clone, Debug)]
pub struct Header {
    pub original_len: u32,
    pub codes: CodeTable,
}

/// Serialize the header and leave the writer byte aligned
pub fn write_header(original_len: u32, codes: &CodeTable, writer: &mut BitWriter) {
    writer.write_bits(original_len as u64, 32);
    writer.write_bits(codes.len() as u64, 16);
    for (symbol, code) in codes.iter() {
        writer.write_byte(symbol);
        writer.write_byte(code.len);
        writer.write_bits(code.bits, code.len);
    }
    writer.align_to_byte();
}

/// Header size in bytes for `codes`
pub fn header_len(codes: &CodeTable) -> usize {
    let bits: u64 = 48 + codes.iter().map(|(_, code)| 16 + code.len as u64).sum::<u64>();
    bits.div_ceil(8) as usize
}

/// Parse a header and leave the reader at the first payload byte
pub fn read_header(reader: &mut BitReader<'_>) -> Result<Header> {
    let original_len = read_field(reader, 32, "original length")? as u32;
    let count = read_field(reader, 16, "symbol count")? as usize;
    if count > 256 {
        return Err(Error::corrupt(format!("symbol count {count} exceeds 256")));
    }

    let mut codes = CodeTable::new();
    for _ in 0..count {
        let symbol = read_field(reader, 8, "symbol")? as u8;
        let len = read_field(reader, 8, "code length")? as u8;
        if len == 0 || len > MAX_CODE_BITS {
            return Err(Error::corrupt(format!("symbol {symbol:#04x} has code length {len}")));
        }
        let bits = read_field(reader, len, "code")?;
        if codes.insert(symbol, Code { bits, len }).is_some() {
            return Err(Error::corrupt(format!("symbol {symbol:#04x} listed twice")));
        }
    }

    if count == 0 && original_len != 0 {
        return Err(Error::corrupt(format!("{original_len} bytes declared but no symbols")));
    }

    reader.align_to_byte();
    Ok(Header { original_len, codes })
}

fn read_field(reader: &mut BitReader<'_>, bits: u8, what: &str) -> Result<u64> {
    reader.read_bits(bits).map_err(|e| match e {
        Error::UnexpectedEof => Error::corrupt(format!("header truncated in {what}")),
        other => other,
    })
}
