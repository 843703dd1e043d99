//! Pull/push stream boundary between the codecs and their callers.
//!
//! A codec pulls input from a [`Source`] at explicit offsets and pushes
//! framed output into a [`Sink`]. The sink's `finish` is the completion
//! signal and runs once, after the last write of a successful call.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Pull-style input
pub trait Source {
    /// Fill `buf` with bytes starting at `offset`, returning how many were delivered
    ///
    /// Returning fewer than `buf.len()` bytes signals end of input.
    fn read(&mut self, buf: &mut [u8], offset: u64) -> Result<usize>;
}

/// Push-style output
pub trait Sink {
    /// Accept `buf`, which is only borrowed for the duration of the call
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Completion signal, called once after the final write
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        (**self).read(buf, offset)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// In-memory source over a borrowed slice
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Source for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

/// Source over any seekable reader (files, cursors)
pub struct ReaderSource<R> {
    reader: R,
    /// Position the reader is known to be at, to skip redundant seeks
    position: Option<u64>,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, position: None }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> Source for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> Result<usize> {
        if self.position != Some(offset) {
            self.reader.seek(SeekFrom::Start(offset))?;
        }

        // Keep reading until the buffer is full or the reader is exhausted,
        // so a short count always means end of input
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.position = None;
                    return Err(Error::Io(e));
                }
            }
        }

        self.position = Some(offset + filled as u64);
        Ok(filled)
    }
}

/// In-memory sink that collects everything written
#[derive(Debug, Default)]
pub struct VecSink {
    data: Vec<u8>,
    finished: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the completion signal has fired
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Sink for VecSink {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.data.try_reserve(buf.len())?;
        self.data.extend_from_slice(buf);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sink over any writer; `finish` flushes it
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Cooperative cancellation handle
///
/// Clones share one flag. Codecs check it at each source read and each
/// decoded unit.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once `cancel` has been called
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Default bytes per source pull and per sink write
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Streaming knobs shared by every codec
#[derive(Clone, Debug)]
pub struct StreamOptions {
    /// Bytes requested per `Source::read`; output is flushed to the sink in
    /// batches of roughly this size
    pub chunk_size: usize,
    pub cancel: Option<CancelFlag>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, cancel: None }
    }
}

/// Check an optional flag
#[inline]
pub(crate) fn check_cancel(flag: Option<&CancelFlag>) -> Result<()> {
    flag.map_or(Ok(()), CancelFlag::check)
}

/// Read the whole source, `chunk_size` bytes per pull
pub(crate) fn read_to_end<S: Source>(
    source: &mut S,
    chunk_size: usize,
    cancel: Option<&CancelFlag>,
) -> Result<Vec<u8>> {
    let chunk_size = chunk_size.max(1);
    let mut data = Vec::new();
    loop {
        check_cancel(cancel)?;
        let start = data.len();
        data.try_reserve(chunk_size)?;
        data.resize(start + chunk_size, 0);
        let n = source.read(&mut data[start..], start as u64)?;
        data.truncate(start + n);
        if n < chunk_size {
            return Ok(data);
        }
    }
}
