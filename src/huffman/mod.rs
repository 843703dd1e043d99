//! Static Huffman coding with the code table carried in the stream header.

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod tree;

pub use decoder::{decode, DecodeTree};
pub use encoder::{count_frequencies, encode};
pub use header::{read_header, write_header, Header};
pub use tree::{assign_codes, Code, CodeTable, FrequencyTable, HuffmanTree, NodeId};

use crate::error::Result;
use crate::io::{Sink, Source, StreamOptions};
use crate::{Codec, CodecStats};

/// Huffman codec
///
/// Compression reads the source twice, so the source must return the same
/// bytes for the same offsets across both passes.
#[derive(Default)]
pub struct Huffman {
    options: StreamOptions,
}

impl Huffman {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }
}

impl Codec for Huffman {
    fn compress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        encode(&self.options, source, sink)
    }

    fn decompress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        decode(&self.options, source, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceSource, VecSink};

    fn round_trip(codec: &mut Huffman, data: &[u8]) -> Vec<u8> {
        let mut compressed = VecSink::new();
        codec.compress(SliceSource::new(data), &mut compressed).unwrap();
        let mut restored = VecSink::new();
        codec.decompress(SliceSource::new(compressed.as_bytes()), &mut restored).unwrap();
        restored.into_inner()
    }

    #[test]
    fn test_round_trip_text() {
        let data = b"AAAAAAAABBBBCCCCCDD";
        assert_eq!(round_trip(&mut Huffman::new(), data), data);
    }

    #[test]
    fn test_round_trip_edge_sizes() {
        let mut codec = Huffman::new();
        for data in [&b""[..], b"x", b"xy", b"xxxxxxxxxxxxxxxxx"] {
            assert_eq!(round_trip(&mut codec, data), data);
        }
    }

    #[test]
    fn test_round_trip_all_byte_values_small_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i * i % 256) as u8).collect();
        let options = StreamOptions { chunk_size: 100, ..Default::default() };
        let mut codec = Huffman::new().with_stream_options(options);
        assert_eq!(round_trip(&mut codec, &data), data);
    }
}
