#![no_main]

use libfuzzer_sys::fuzz_target;
use lzhuff::{decompress, Algorithm, CodecConfig, SliceSource, VecSink};

fuzz_target!(|data: &[u8]| {
    // Decoding may fail on arbitrary input - that's OK
    // We're looking for panics/crashes, not errors
    for algorithm in [Algorithm::Lz77, Algorithm::Lz78, Algorithm::Huffman] {
        let mut sink = VecSink::new();
        let _ = decompress(algorithm, &CodecConfig::default(), SliceSource::new(data), &mut sink);
    }
});
