use log::debug;

use super::dictionary::PhraseList;
use super::Lz78Config;
use crate::bits::{bits_needed, BitReader};
use crate::error::Result;
use crate::io::{check_cancel, read_to_end, Sink, Source, StreamOptions};
use crate::CodecStats;

/// Replay `(code, literal)` pairs produced with the same `config`
///
/// Pairs are not byte aligned, so the compressed stream is pulled whole
/// before replay; output still goes to the sink in chunks.
pub fn decode<S: Source, K: Sink>(
    config: &Lz78Config,
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let code_bits = bits_needed(config.table_size) as u8;
    let pair_bits = code_bits as u64 + 8;

    let input = read_to_end(&mut source, options.chunk_size, options.cancel.as_ref())?;
    let mut reader = BitReader::new(&input);
    let mut phrases = PhraseList::new(config.table_size);
    let mut stats = CodecStats { input_bytes: input.len() as u64, ..Default::default() };
    let mut out = Vec::new();

    // Trailing padding is always shorter than one pair
    while reader.bits_remaining() >= pair_bits {
        check_cancel(options.cancel.as_ref())?;
        let code = reader.read_bits(code_bits)? as u32;
        let literal = reader.read_byte()?;
        phrases.expand(code, literal, &mut out)?;
        stats.units += 1;

        if out.len() >= options.chunk_size {
            sink.write(&out)?;
            stats.output_bytes += out.len() as u64;
            out.clear();
        }
    }

    if !out.is_empty() {
        sink.write(&out)?;
        stats.output_bytes += out.len() as u64;
    }
    sink.finish()?;

    debug!(
        "lz78 decompress (table={}, {} codes used): {} -> {} bytes from {} pairs",
        config.table_size,
        phrases.code_count(),
        stats.input_bytes,
        stats.output_bytes,
        stats.units
    );
    Ok(stats)
}
