//! Content sources: named, forward-only chunk sequences with an optional known length.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use bytes::Bytes;
use tracing::warn;

use crate::chunk::{Chunk, ChunkIter};
use crate::constants::MAX_READ_CHUNK_SIZE;
use crate::types::StreamError;

/// Turns any reader into a chunk sequence of at most `chunk_size` bytes per chunk.
///
/// The reader is owned by the iterator and dropped (closed) when the iterator is
/// dropped, after EOF, after an error, or on early cancellation alike.
pub struct ReaderChunks<R> {
    reader: Option<R>,
    chunk_size: usize,
}

impl<R: Read> ReaderChunks<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0 && chunk_size <= MAX_READ_CHUNK_SIZE);
        Self {
            reader: Some(reader),
            chunk_size,
        }
    }
}

impl<R: Read> Iterator for ReaderChunks<R> {
    type Item = Result<Chunk, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(n) => {
                    buf.truncate(n);
                    return Some(Ok(Bytes::from(buf)));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.reader = None;
                    return Some(Err(StreamError::Io(e)));
                }
            }
        }
    }
}

/// A content source bound to one template placeholder.
pub struct ContentSource {
    pub chunks: ChunkIter,
    /// Total raw length, when known before streaming (e.g. file size).
    pub length: Option<u64>,
}

impl ContentSource {
    pub fn new(chunks: ChunkIter, length: Option<u64>) -> Self {
        Self { chunks, length }
    }

    /// In-memory source delivered as a single chunk.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        let length = Some(data.len() as u64);
        Self {
            chunks: Box::new(std::iter::once(Ok(data))),
            length,
        }
    }

    /// Pre-chunked in-memory source.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let length = Some(chunks.iter().map(|c| c.len() as u64).sum());
        Self {
            chunks: Box::new(chunks.into_iter().map(Ok)),
            length,
        }
    }

    /// Any reader; length is unknown unless supplied.
    pub fn from_reader<R>(reader: R, chunk_size: usize, length: Option<u64>) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            chunks: Box::new(ReaderChunks::new(reader, chunk_size)),
            length,
        }
    }

    /// Open a file for chunked reading.
    ///
    /// A missing file is reported as `SourceNotFound`, every other open failure as
    /// `SourceOpen`. Nothing has been streamed when either is returned.
    pub fn open_file(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            warn!(path = %name, error = %e, "cannot open file to read from");
            StreamError::from_open(name.clone(), e)
        })?;
        let length = file
            .metadata()
            .map_err(|e| StreamError::from_open(name, e))?
            .len();
        Ok(Self::from_reader(file, chunk_size, Some(length)))
    }

    pub fn into_chunks(self) -> ChunkIter {
        self.chunks
    }
}

impl std::fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSource")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
