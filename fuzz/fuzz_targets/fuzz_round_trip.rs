#![no_main]

use libfuzzer_sys::fuzz_target;
use lzhuff::{
    compress, decompress, Algorithm, CodecConfig, Lz77Config, Lz78Config, SliceSource, VecSink,
};

fuzz_target!(|data: &[u8]| {
    // First byte picks the parameters, the rest is the payload
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    let config = CodecConfig {
        lz77: Lz77Config {
            window_size: 2 << (selector & 0x07),
            buffer_size: 2 << ((selector >> 3) & 0x03),
        },
        lz78: Lz78Config { table_size: 2 << ((selector >> 5) & 0x07) },
        ..Default::default()
    };

    for algorithm in [Algorithm::Lz77, Algorithm::Lz78, Algorithm::Huffman] {
        let mut compressed = VecSink::new();
        compress(algorithm, &config, SliceSource::new(payload), &mut compressed)
            .expect("compression of valid input must succeed");

        let mut restored = VecSink::new();
        decompress(algorithm, &config, SliceSource::new(compressed.as_bytes()), &mut restored)
            .expect("own output must decode");
        assert_eq!(restored.as_bytes(), payload, "{algorithm} round trip mismatch");
    }
});
