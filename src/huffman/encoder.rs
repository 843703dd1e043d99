use log::{debug, trace};

use super::header::write_header;
use super::tree::{assign_codes, CodeTable, FrequencyTable, HuffmanTree};
use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::io::{check_cancel, Sink, Source, StreamOptions};
use crate::CodecStats;

/// Count byte frequencies over the whole source
pub fn count_frequencies<S: Source>(source: &mut S, options: &StreamOptions) -> Result<FrequencyTable> {
    let mut frequencies = FrequencyTable::new();
    let mut chunk = vec![0u8; options.chunk_size.max(1)];
    loop {
        check_cancel(options.cancel.as_ref())?;
        let n = source.read(&mut chunk, frequencies.total())?;
        frequencies.count(&chunk[..n]);
        if n < chunk.len() {
            return Ok(frequencies);
        }
    }
}

/// Two-pass Huffman compression: count, build codes, then encode
pub fn encode<S: Source, K: Sink>(
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let frequencies = count_frequencies(&mut source, options)?;
    let total = frequencies.total();
    let original_len = u32::try_from(total).map_err(|_| Error::InputTooLarge(total))?;

    let codes = match HuffmanTree::build(&frequencies) {
        Some(tree) => assign_codes(&tree)?,
        None => CodeTable::new(),
    };
    for (symbol, code) in codes.iter() {
        trace!("huffman code {:#04x}: {:0width$b}", symbol, code.bits, width = code.len as usize);
    }

    let mut writer = BitWriter::new();
    write_header(original_len, &codes, &mut writer);

    let mut stats = CodecStats::default();
    let mut chunk = vec![0u8; options.chunk_size.max(1)];
    loop {
        check_cancel(options.cancel.as_ref())?;
        let n = source.read(&mut chunk, stats.input_bytes)?;
        stats.input_bytes += n as u64;
        if stats.input_bytes > total {
            return Err(Error::corrupt("source grew between passes"));
        }

        for &byte in &chunk[..n] {
            let code = codes
                .get(byte)
                .ok_or_else(|| Error::corrupt(format!("byte {byte:#04x} not seen in first pass")))?;
            writer.write_bits(code.bits, code.len);
        }
        stats.units += n as u64;

        if writer.len() >= options.chunk_size {
            let bytes = writer.drain_complete();
            sink.write(&bytes)?;
            stats.output_bytes += bytes.len() as u64;
        }

        if n < chunk.len() {
            break;
        }
    }

    if stats.input_bytes != total {
        return Err(Error::corrupt("source shrank between passes"));
    }

    let bytes = writer.finish();
    if !bytes.is_empty() {
        sink.write(&bytes)?;
        stats.output_bytes += bytes.len() as u64;
    }
    sink.finish()?;

    debug!(
        "huffman compress ({} distinct symbols): {} -> {} bytes",
        codes.len(),
        stats.input_bytes,
        stats.output_bytes
    );
    Ok(stats)
}
