//! LZ78 with an adaptive phrase dictionary.
//!
//! Output is a sequence of `(code, literal)` pairs, bit-packed MSB-first with
//! `bits_needed(table_size)`-bit codes. When the dictionary reaches
//! `table_size` entries it is frozen on both sides.

pub mod decoder;
pub mod dictionary;
pub mod encoder;

pub use decoder::decode;
pub use dictionary::{PhraseList, PhraseTable};
pub use encoder::encode;

use crate::bits::validate_capacity;
use crate::error::Result;
use crate::io::{Sink, Source, StreamOptions};
use crate::{Codec, CodecStats};

/// LZ78 parameters; both sides of a stream must agree on them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lz78Config {
    /// Maximum dictionary entries including the empty phrase (power of two >= 2)
    pub table_size: u32,
}

impl Lz78Config {
    pub fn validate(&self) -> Result<()> {
        validate_capacity("table_size", self.table_size)
    }
}

impl Default for Lz78Config {
    fn default() -> Self {
        Self { table_size: 4096 }
    }
}

/// LZ78 codec bound to one validated configuration
pub struct Lz78 {
    config: Lz78Config,
    options: StreamOptions,
}

impl Lz78 {
    pub fn new(config: Lz78Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, options: StreamOptions::default() })
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &Lz78Config {
        &self.config
    }
}

impl Codec for Lz78 {
    fn compress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        encode(&self.config, &self.options, source, sink)
    }

    fn decompress<S: Source, K: Sink>(&mut self, source: S, sink: K) -> Result<CodecStats> {
        decode(&self.config, &self.options, source, sink)
    }
}
