pub mod bits;
pub mod collections;
pub mod error;
pub mod huffman;
pub mod io;
pub mod lz77;
pub mod lz78;

pub use error::{Error, Result};
pub use huffman::Huffman;
pub use io::{
    CancelFlag, ReaderSource, Sink, SliceSource, Source, StreamOptions, VecSink, WriterSink,
};
pub use lz77::{Lz77, Lz77Config};
pub use lz78::{Lz78, Lz78Config};

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};

/// Algorithm selector
///
/// Every classic algorithm name is accepted, but only LZ77, LZ78 and Huffman
/// have codecs; the rest fail with [`Error::Unsupported`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Lz77,
    Lzss,
    Lz78,
    Lzw,
    Arithmetic,
    Huffman,
    Bwt,
    Ppm,
    Rle,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Self::Lz77,
        Self::Lzss,
        Self::Lz78,
        Self::Lzw,
        Self::Arithmetic,
        Self::Huffman,
        Self::Bwt,
        Self::Ppm,
        Self::Rle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lz77 => "LZ77",
            Self::Lzss => "LZSS",
            Self::Lz78 => "LZ78",
            Self::Lzw => "LZW",
            Self::Arithmetic => "Arithmetic",
            Self::Huffman => "Huffman",
            Self::Bwt => "BWT",
            Self::Ppm => "PPM",
            Self::Rle => "RLE",
        }
    }

    /// Whether a codec exists for this algorithm
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Lz77 | Self::Lz78 | Self::Huffman)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Case-insensitive match on [`Algorithm::name`]
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Parameters for every codec, plus streaming options
#[derive(Clone, Debug, Default)]
pub struct CodecConfig {
    pub lz77: Lz77Config,
    pub lz78: Lz78Config,
    pub stream: StreamOptions,
}

impl CodecConfig {
    /// Check the parameters `algorithm` reads, without touching any I/O
    pub fn validate(&self, algorithm: Algorithm) -> Result<()> {
        match algorithm {
            Algorithm::Lz77 => self.lz77.validate(),
            Algorithm::Lz78 => self.lz78.validate(),
            Algorithm::Huffman => Ok(()),
            other => Err(Error::Unsupported(other)),
        }
    }
}

/// Statistics from one compress or decompress call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Tokens, pairs or symbols processed
    pub units: u64,
}

/// A codec bound to its configuration
pub trait Codec {
    /// Compress everything `source` yields into `sink`
    fn compress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats>;

    /// Reverse [`Codec::compress`]
    fn decompress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Compress,
    Decompress,
}

fn run<S: Source, K: Sink>(
    direction: Direction,
    algorithm: Algorithm,
    config: &CodecConfig,
    source: S,
    sink: K,
) -> Result<CodecStats> {
    debug!("{:?} with {} ({:?})", direction, algorithm, config);

    macro_rules! apply {
        ($codec:expr) => {{
            let mut codec = $codec;
            match direction {
                Direction::Compress => codec.compress(source, sink),
                Direction::Decompress => codec.decompress(source, sink),
            }
        }};
    }

    match algorithm {
        Algorithm::Lz77 => {
            apply!(Lz77::new(config.lz77)?.with_stream_options(config.stream.clone()))
        }
        Algorithm::Lz78 => {
            apply!(Lz78::new(config.lz78)?.with_stream_options(config.stream.clone()))
        }
        Algorithm::Huffman => apply!(Huffman::new().with_stream_options(config.stream.clone())),
        other => {
            warn!("{} is declared but has no codec", other);
            Err(Error::Unsupported(other))
        }
    }
}

/// Compress `source` into `sink` with `algorithm`
///
/// Unsupported algorithms and invalid parameters fail before the source is
/// read. The sink's `finish` runs once, only on success.
pub fn compress<S: Source, K: Sink>(
    algorithm: Algorithm,
    config: &CodecConfig,
    source: S,
    sink: K,
) -> Result<CodecStats> {
    run(Direction::Compress, algorithm, config, source, sink)
}

/// Decompress `source` into `sink`
///
/// LZ77 and LZ78 streams do not record their parameters, so `config` must
/// match the one used to compress.
pub fn decompress<S: Source, K: Sink>(
    algorithm: Algorithm,
    config: &CodecConfig,
    source: S,
    sink: K,
) -> Result<CodecStats> {
    run(Direction::Decompress, algorithm, config, source, sink)
}

/// Compress an in-memory buffer with default parameters
pub fn compress_data(data: &[u8], algorithm: Algorithm) -> Result<Vec<u8>> {
    let mut sink = VecSink::new();
    compress(algorithm, &CodecConfig::default(), SliceSource::new(data), &mut sink)?;
    Ok(sink.into_inner())
}

/// Decompress an in-memory buffer produced by [`compress_data`]
pub fn decompress_data(data: &[u8], algorithm: Algorithm) -> Result<Vec<u8>> {
    let mut sink = VecSink::new();
    decompress(algorithm, &CodecConfig::default(), SliceSource::new(data), &mut sink)?;
    Ok(sink.into_inner())
}

/// Compress the file at `src` into a new file at `dst`
pub fn compress_file(
    src: &Path,
    dst: &Path,
    algorithm: Algorithm,
    config: &CodecConfig,
) -> Result<CodecStats> {
    file_run(Direction::Compress, src, dst, algorithm, config)
}

/// Decompress the file at `src` into a new file at `dst`
pub fn decompress_file(
    src: &Path,
    dst: &Path,
    algorithm: Algorithm,
    config: &CodecConfig,
) -> Result<CodecStats> {
    file_run(Direction::Decompress, src, dst, algorithm, config)
}

fn file_run(
    direction: Direction,
    src: &Path,
    dst: &Path,
    algorithm: Algorithm,
    config: &CodecConfig,
) -> Result<CodecStats> {
    if !algorithm.is_supported() {
        warn!("{} is declared but has no codec", algorithm);
    }
    // Fail before `File::create` truncates an existing destination
    config.validate(algorithm)?;

    let source = ReaderSource::new(BufReader::new(File::open(src)?));
    let sink = WriterSink::new(BufWriter::new(File::create(dst)?));
    run(direction, algorithm, config, source, sink)
}
