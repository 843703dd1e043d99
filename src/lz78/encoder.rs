use log::{debug, trace};

use super::dictionary::PhraseTable;
use super::Lz78Config;
use crate::bits::{bits_needed, BitWriter};
use crate::error::Result;
use crate::io::{check_cancel, Sink, Source, StreamOptions};
use crate::CodecStats;

/// Compress `source` into bit-packed `(code, literal)` pairs
pub fn encode<S: Source, K: Sink>(
    config: &Lz78Config,
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let code_bits = bits_needed(config.table_size) as u8;
    let mut table = PhraseTable::new(config.table_size)?;
    let mut writer = BitWriter::new();
    let mut stats = CodecStats::default();

    let mut chunk = vec![0u8; options.chunk_size.max(1)];
    // Current phrase, its code, and the code of the phrase minus its last byte
    let mut phrase: Vec<u8> = Vec::new();
    let mut code = 0u32;
    let mut prefix_code = 0u32;

    loop {
        check_cancel(options.cancel.as_ref())?;
        let n = source.read(&mut chunk, stats.input_bytes)?;
        stats.input_bytes += n as u64;

        for &byte in &chunk[..n] {
            phrase.push(byte);
            if let Some(extended) = table.lookup(&phrase) {
                prefix_code = code;
                code = extended;
                continue;
            }

            trace!("lz78 pair ({}, {:#04x})", code, byte);
            writer.write_bits(code as u64, code_bits);
            writer.write_byte(byte);
            stats.units += 1;
            table.insert(&phrase);

            phrase.clear();
            code = 0;
            prefix_code = 0;
        }

        if writer.len() >= options.chunk_size {
            let bytes = writer.drain_complete();
            sink.write(&bytes)?;
            stats.output_bytes += bytes.len() as u64;
        }

        if n < chunk.len() {
            break;
        }
    }

    // Input ended inside a known phrase Q + b: send it as (code(Q), b)
    if let Some(&last) = phrase.last() {
        trace!("lz78 final pair ({}, {:#04x})", prefix_code, last);
        writer.write_bits(prefix_code as u64, code_bits);
        writer.write_byte(last);
        stats.units += 1;
    }

    let bytes = writer.finish();
    if !bytes.is_empty() {
        sink.write(&bytes)?;
        stats.output_bytes += bytes.len() as u64;
    }
    sink.finish()?;

    debug!(
        "lz78 compress (table={}, {} codes used{}): {} -> {} bytes in {} pairs",
        config.table_size,
        table.code_count(),
        if table.is_full() { ", frozen" } else { "" },
        stats.input_bytes,
        stats.output_bytes,
        stats.units
    );
    Ok(stats)
}
