use std::collections::TryReserveError;

use thiserror::Error;

use crate::Algorithm;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Invalid {name}: {value} (must be a power of two >= 2)")]
    InvalidConfig { name: &'static str, value: u32 },

    #[error("Unsupported algorithm: {0} is declared but not implemented")]
    Unsupported(Algorithm),

    #[error("Unknown algorithm name: {0:?}")]
    UnknownAlgorithm(String),

    // Decoding errors
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    #[error("Unexpected end of input")]
    UnexpectedEof,

    // Resource errors
    #[error("Allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),

    #[error("Huffman code length {0} exceeds 64 bits")]
    CodeTooLong(u32),

    #[error("Input of {0} bytes exceeds the 4 GiB Huffman limit")]
    InputTooLarge(u64),

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptStream(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_config() {
        let err = Error::InvalidConfig { name: "window_size", value: 300 };
        assert_eq!(err.to_string(), "Invalid window_size: 300 (must be a power of two >= 2)");
    }

    #[test]
    fn test_display_unsupported() {
        let err = Error::Unsupported(Algorithm::Bwt);
        assert!(err.to_string().contains("BWT"));
    }

    #[test]
    fn test_allocation_failure_from_try_reserve() {
        let mut v: Vec<u8> = Vec::new();
        let err: Error = v.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, Error::AllocationFailure(_)));
    }
}
