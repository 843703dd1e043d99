//! Field sizing and wire byte order.
//!
//! Multi-byte fields (LZ77 offsets and lengths, the Huffman header) travel
//! big-endian regardless of the host.

use crate::error::{Error, Result};

/// Widest integer field the codecs emit, in bytes
pub const MAX_FIELD_BYTES: usize = 8;

/// `floor(log2(n))`, the bits a field sized from capacity `n` gets (0 for n <= 1)
#[inline]
pub fn bits_needed(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        31 - n.leading_zeros()
    }
}

/// `ceil(bits_needed(n) / 8)`
#[inline]
pub fn bytes_needed(n: u32) -> usize {
    bits_needed(n).div_ceil(8) as usize
}

/// Whether the host stores integers least-significant byte first
#[inline]
pub fn host_is_little_endian() -> bool {
    u16::from_ne_bytes([0xBB, 0xAA]) == 0xAABB
}

/// Encode `value` as a `width`-byte big-endian field into `out`
///
/// Host bytes are reversed on little-endian machines. A value that does not
/// fit in `width` bytes is rejected rather than truncated.
pub fn to_wire(value: u64, width: usize, out: &mut Vec<u8>) -> Result<()> {
    debug_assert!(width <= MAX_FIELD_BYTES);

    if width < MAX_FIELD_BYTES && value >> (width * 8) != 0 {
        return Err(Error::corrupt(format!("value {value} does not fit a {width}-byte field")));
    }

    let host = value.to_ne_bytes();
    let mut wire = [0u8; MAX_FIELD_BYTES];
    for (i, byte) in wire.iter_mut().enumerate() {
        *byte = if host_is_little_endian() { host[MAX_FIELD_BYTES - 1 - i] } else { host[i] };
    }
    out.extend_from_slice(&wire[MAX_FIELD_BYTES - width..]);
    Ok(())
}

/// Decode a big-endian field of up to 8 bytes
pub fn from_wire(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= MAX_FIELD_BYTES);

    let mut wire = [0u8; MAX_FIELD_BYTES];
    wire[MAX_FIELD_BYTES - bytes.len()..].copy_from_slice(bytes);

    let mut host = [0u8; MAX_FIELD_BYTES];
    for (i, byte) in host.iter_mut().enumerate() {
        *byte = if host_is_little_endian() { wire[MAX_FIELD_BYTES - 1 - i] } else { wire[i] };
    }
    u64::from_ne_bytes(host)
}

/// Check that a codec parameter is a power of two >= 2
///
/// Only then does `bits_needed` cover every value below the parameter.
pub fn validate_capacity(name: &'static str, value: u32) -> Result<()> {
    if value >= 2 && value.is_power_of_two() {
        Ok(())
    } else {
        Err(Error::InvalidConfig { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(0), 0);
        assert_eq!(bits_needed(1), 0);
        assert_eq!(bits_needed(2), 1);
        assert_eq!(bits_needed(255), 7);
        assert_eq!(bits_needed(256), 8);
        assert_eq!(bits_needed(4096), 12);
        assert_eq!(bits_needed(u32::MAX), 31);
    }

    #[test]
    fn test_bytes_needed() {
        assert_eq!(bytes_needed(1), 0);
        assert_eq!(bytes_needed(2), 1);
        assert_eq!(bytes_needed(64), 1);
        assert_eq!(bytes_needed(256), 1);
        assert_eq!(bytes_needed(512), 2);
        assert_eq!(bytes_needed(65536), 2);
        assert_eq!(bytes_needed(1 << 17), 3);
    }

    #[test]
    fn test_host_order_matches_target() {
        assert_eq!(host_is_little_endian(), cfg!(target_endian = "little"));
    }

    #[test]
    fn test_to_wire_is_big_endian() {
        let mut out = Vec::new();
        to_wire(0x0102_0304, 4, &mut out).unwrap();
        to_wire(0xAB, 1, &mut out).unwrap();
        to_wire(0, 0, &mut out).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04, 0xAB]);
    }

    #[test]
    fn test_to_wire_rejects_overflow() {
        let mut out = Vec::new();
        assert!(to_wire(256, 1, &mut out).is_err());
        assert!(to_wire(1, 0, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_from_wire() {
        assert_eq!(from_wire(&[0x12, 0x34]), 0x1234);
        assert_eq!(from_wire(&[0xFF]), 0xFF);
        assert_eq!(from_wire(&[]), 0);
        assert_eq!(from_wire(&[0x01, 0x02, 0x03, 0x04]), 0x0102_0304);
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity("window_size", 256).is_ok());
        assert!(validate_capacity("window_size", 2).is_ok());
        assert!(matches!(
            validate_capacity("window_size", 300),
            Err(Error::InvalidConfig { name: "window_size", value: 300 })
        ));
        assert!(validate_capacity("table_size", 1).is_err());
        assert!(validate_capacity("table_size", 0).is_err());
    }
}
