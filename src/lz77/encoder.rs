use log::{debug, trace};

use super::token::{Token, TokenFormat};
use super::window::{find_longest_match, SearchBuffer};
use super::Lz77Config;
use crate::error::Result;
use crate::io::{check_cancel, Sink, Source, StreamOptions};
use crate::CodecStats;

/// Compress `source` into a stream of fixed-width tokens
pub fn encode<S: Source, K: Sink>(
    config: &Lz77Config,
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let format = TokenFormat::new(config);
    let window_size = config.window_size as usize;
    let mut buffer = SearchBuffer::new(window_size, config.buffer_size as usize);
    let mut out = Vec::with_capacity(options.chunk_size.min(1 << 20) + format.width());
    let mut stats = CodecStats::default();

    loop {
        check_cancel(options.cancel.as_ref())?;
        buffer.refill(&mut source, options.chunk_size)?;

        let lookahead = buffer.lookahead();
        if lookahead.is_empty() {
            break;
        }

        let (offset, length) = find_longest_match(buffer.window(), lookahead, window_size);
        let token = Token { offset: offset as u32, length: length as u32, literal: lookahead[length] };
        trace!("lz77 token {:?}", token);

        format.encode(&token, &mut out)?;
        stats.units += 1;

        if out.len() >= options.chunk_size {
            sink.write(&out)?;
            stats.output_bytes += out.len() as u64;
            out.clear();
        }

        buffer.advance(length + 1);
    }

    if !out.is_empty() {
        sink.write(&out)?;
        stats.output_bytes += out.len() as u64;
    }
    sink.finish()?;

    stats.input_bytes = buffer.bytes_read();
    debug!(
        "lz77 compress (window={}, buffer={}): {} -> {} bytes in {} tokens",
        config.window_size, config.buffer_size, stats.input_bytes, stats.output_bytes, stats.units
    );
    Ok(stats)
}
