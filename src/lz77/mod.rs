//! Sliding-window LZ77 with fixed-width `(offset, length, literal)` tokens.

pub mod decoder;
pub mod encoder;
pub mod token;
pub mod window;

pub use decoder::decode;
pub use encoder::encode;
pub use token::{Token, TokenFormat};

use crate::bits::validate_capacity;
use crate::error::Result;
use crate::io::{Sink, Source, StreamOptions};
use crate::{Codec, CodecStats};

/// LZ77 parameters; both sides of a stream must agree on them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lz77Config {
    /// Bytes of history a match may reach back into (power of two >= 2)
    pub window_size: u32,
    /// Lookahead capacity (power of two >= 2); match lengths stay below it
    pub buffer_size: u32,
}

impl Lz77Config {
    pub fn validate(&self) -> Result<()> {
        validate_capacity("window_size", self.window_size)?;
        validate_capacity("buffer_size", self.buffer_size)
    }
}

impl Default for Lz77Config {
    fn default() -> Self {
        Self { window_size: 256, buffer_size: 64 }
    }
}

/// LZ77 codec bound to one validated configuration
pub struct Lz77 {
    config: Lz77Config,
    options: StreamOptions,
}

impl Lz77 {
    pub fn new(config: Lz77Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, options: StreamOptions::default() })
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &Lz77Config {
        &self.config
    }
}

impl Codec for Lz77 {
    fn compress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        encode(&self.config, &self.options, source, sink)
    }

    fn decompress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        decode(&self.config, &self.options, source, sink)
    }
}
