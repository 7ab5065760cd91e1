//! Seekable in-memory body stream and the writer abstraction for streamed
//! bodies.
//!
//! # Design
//! Every body handed out by a factory is fully materialised before the
//! conversion returns, so a `Stream` is just a cursor over shared `Bytes`.
//! Cloning it is cheap and never aliases mutable state.
//!
//! Streamed bodies are described by a [`StreamWriter`]: a function that
//! receives the sink to write into. The caller of the writer owns the sink,
//! so capturing its output needs no redirection of any ambient channel.

use std::fmt;
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

/// Writes a response body into the provided sink.
///
/// Called synchronously, once per conversion. An error aborts the
/// conversion and is returned to its caller.
pub type StreamWriter = Arc<dyn Fn(&mut dyn Write) -> io::Result<()> + Send + Sync>;

/// Wrap a closure as a [`StreamWriter`].
pub fn writer<F>(f: F) -> StreamWriter
where
    F: Fn(&mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A readable, seekable byte stream positioned at offset 0 when created.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stream {
    inner: Cursor<Bytes>,
}

impl Stream {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: Cursor::new(bytes.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a file to its end.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Drain a reader to its end.
    pub fn from_reader(mut reader: impl Read) -> io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::new(buf))
    }

    /// Run `writer` once against a fresh buffer and wrap what it wrote.
    pub fn capture(writer: &StreamWriter) -> io::Result<Self> {
        let mut sink = BytesMut::new().writer();
        writer(&mut sink)?;
        Ok(Self::new(sink.into_inner().freeze()))
    }

    /// The bytes not read yet. Moves the cursor to the end.
    pub fn contents(&mut self) -> Bytes {
        let len = self.len();
        let start = (self.inner.position() as usize).min(len);
        let rest = self.inner.get_ref().slice(start..);
        self.inner.set_position(len as u64);
        rest
    }

    /// The whole buffer, regardless of the cursor.
    pub fn to_bytes(&self) -> Bytes {
        self.inner.get_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for Stream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("len", &self.len())
            .field("position", &self.position())
            .finish()
    }
}

impl From<Bytes> for Stream {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}
