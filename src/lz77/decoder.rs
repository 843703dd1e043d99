use log::debug;

use super::token::{Token, TokenFormat};
use super::window::HistoryWindow;
use super::Lz77Config;
use crate::error::{Error, Result};
use crate::io::{check_cancel, Sink, Source, StreamOptions};
use crate::CodecStats;

/// Expand a token stream produced with the same `config`
pub fn decode<S: Source, K: Sink>(
    config: &Lz77Config,
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let format = TokenFormat::new(config);
    let width = format.width();
    let mut window = HistoryWindow::new(config.window_size as usize)?;
    let mut stats = CodecStats::default();

    // Pull whole tokens; only the final short read can leave a partial one
    let read_size = (options.chunk_size / width).max(1) * width;
    let mut input = vec![0u8; read_size];
    let mut out = Vec::new();

    loop {
        check_cancel(options.cancel.as_ref())?;
        let n = source.read(&mut input, stats.input_bytes)?;
        stats.input_bytes += n as u64;

        let mut chunks = input[..n].chunks_exact(width);
        for chunk in &mut chunks {
            check_cancel(options.cancel.as_ref())?;
            apply(config, &mut window, format.decode(chunk), &mut out)?;
            stats.units += 1;
        }
        let trailing = chunks.remainder().len();

        if !out.is_empty() {
            sink.write(&out)?;
            stats.output_bytes += out.len() as u64;
            out.clear();
        }

        if trailing != 0 {
            return Err(Error::corrupt(format!(
                "truncated token: {} trailing bytes, token width {}",
                trailing, width
            )));
        }
        if n < read_size {
            break;
        }
    }
    sink.finish()?;

    debug!(
        "lz77 decompress (window={}, buffer={}): {} -> {} bytes from {} tokens",
        config.window_size, config.buffer_size, stats.input_bytes, stats.output_bytes, stats.units
    );
    Ok(stats)
}

/// Validate one token against the current history and expand it into `out`
fn apply(
    config: &Lz77Config,
    window: &mut HistoryWindow,
    token: Token,
    out: &mut Vec<u8>,
) -> Result<()> {
    if token.length >= config.buffer_size {
        return Err(Error::corrupt(format!(
            "match length {} not below buffer size {}",
            token.length, config.buffer_size
        )));
    }

    if token.offset == 0 {
        if token.length != 0 {
            return Err(Error::corrupt(format!("match length {} without offset", token.length)));
        }
    } else {
        if token.offset >= config.window_size {
            return Err(Error::corrupt(format!(
                "offset {} not below window size {}",
                token.offset, config.window_size
            )));
        }
        if token.offset as usize > window.available() {
            return Err(Error::corrupt(format!(
                "offset {} reaches before the start of output ({} bytes)",
                token.offset,
                window.available()
            )));
        }
        out.try_reserve(token.length as usize + 1)?;
        window.copy_back(token.offset as usize, token.length as usize, out);
    }

    window.push_byte(token.literal);
    out.push(token.literal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceSource, VecSink};

    fn decode_bytes(config: &Lz77Config, data: &[u8], chunk_size: usize) -> Result<Vec<u8>> {
        let options = StreamOptions { chunk_size, ..Default::default() };
        let mut sink = VecSink::new();
        decode(config, &options, SliceSource::new(data), &mut sink)?;
        Ok(sink.into_inner())
    }

    #[test]
    fn test_literals_and_copy() {
        let config = Lz77Config::default();
        // 'a', 'b', then copy "ab" from 2 back followed by 'c'
        let stream = [0, 0, b'a', 0, 0, b'b', 2, 2, b'c'];
        assert_eq!(decode_bytes(&config, &stream, 4096).unwrap(), b"ababc");
    }

    #[test]
    fn test_small_reads_round_down_to_whole_tokens() {
        let config = Lz77Config::default();
        let stream = [0, 0, b'x', 1, 1, b'y', 3, 2, b'z'];
        for chunk_size in [1, 4, 6, 4096] {
            assert_eq!(decode_bytes(&config, &stream, chunk_size).unwrap(), b"xxyxxz");
        }
    }

    #[test]
    fn test_overlapping_copy() {
        let config = Lz77Config::default();
        // 'a' then copy 5 from distance 1
        assert_eq!(decode_bytes(&config, &[0, 0, b'a', 1, 5, b'b'], 4096).unwrap(), b"aaaaaab");
    }

    #[test]
    fn test_truncated_stream() {
        let config = Lz77Config::default();
        let err = decode_bytes(&config, &[0, 0, b'a', 0], 4096).unwrap_err();
        assert!(matches!(err, Error::CorruptStream(_)));
    }

    #[test]
    fn test_offset_before_output_start() {
        let config = Lz77Config::default();
        let err = decode_bytes(&config, &[0, 0, b'a', 5, 1, b'b'], 4096).unwrap_err();
        assert!(matches!(err, Error::CorruptStream(_)));
    }

    #[test]
    fn test_length_without_offset() {
        let config = Lz77Config::default();
        let err = decode_bytes(&config, &[0, 3, b'a'], 4096).unwrap_err();
        assert!(matches!(err, Error::CorruptStream(_)));
    }

    #[test]
    fn test_fields_beyond_configured_sizes() {
        let config = Lz77Config { window_size: 16, buffer_size: 4 };
        // Field widths are one byte each, wide enough to hold out-of-range values
        assert!(decode_bytes(&config, &[0, 0, b'a', 1, 4, b'b'], 4096).is_err());
        assert!(decode_bytes(&config, &[0, 0, b'a', 16, 1, b'b'], 4096).is_err());
    }

    #[test]
    fn test_empty_stream() {
        assert!(decode_bytes(&Lz77Config::default(), &[], 4096).unwrap().is_empty());
    }
}
