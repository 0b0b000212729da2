use bytes::Bytes;
use tracing::{debug, info};

use crate::chunk::{Chunk, ChunkIter};
use crate::encoding::{IncrementalBase64Encoder, calculate_base64_size, encode_chunks};
use crate::pipe::ChunkPipe;
use crate::source::ContentSource;
use crate::template::scan::split_segments;
use crate::types::StreamError;

/// A literal document split at its placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Bytes>,
}

impl Template {
    pub fn parse(input: impl Into<Bytes>) -> Self {
        let input: Bytes = input.into();
        Self {
            segments: split_segments(&input),
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    /// Total length of all literal segments.
    pub fn literal_len(&self) -> u64 {
        self.segments.iter().map(|s| s.len() as u64).sum()
    }

    fn check_count(&self, supplied: usize) -> Result<(), StreamError> {
        if supplied != self.placeholder_count() {
            return Err(StreamError::placeholder_mismatch(self.placeholder_count(), supplied));
        }
        Ok(())
    }

    /// Exact output length of `splice` for contents of the given raw lengths.
    /// Touches no content.
    pub fn precomputed_length(&self, raw_lengths: &[u64]) -> Result<u64, StreamError> {
        self.check_count(raw_lengths.len())?;
        let encoded: u64 = raw_lengths.iter().map(|&n| calculate_base64_size(n)).sum();
        Ok(self.literal_len() + encoded)
    }

    /// Precomputed length for bound sources, `None` if any source length is unknown.
    pub fn splice_len(&self, contents: &[ContentSource]) -> Result<Option<u64>, StreamError> {
        self.check_count(contents.len())?;
        let lengths: Option<Vec<u64>> = contents.iter().map(|c| c.length).collect();
        lengths.map(|l| self.precomputed_length(&l)).transpose()
    }

    /// Stream segment₀, base64(contents₀), segment₁, ..., segmentₙ.
    ///
    /// A count mismatch fails here, before any byte is produced.
    pub fn splice(&self, contents: Vec<ContentSource>) -> Result<Splice, StreamError> {
        self.check_count(contents.len())?;
        info!(
            contents = contents.len(),
            segments = self.segments.len(),
            "splice contents into template"
        );
        Ok(Splice {
            segments: self.segments.clone().into_iter(),
            contents: contents.into_iter(),
            current: None,
            failed: false,
            bytes_out: 0,
        })
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Template::parse(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Template::parse(Bytes::from(s))
    }
}

/// Lazy concatenation of literal segments and encoded content streams.
///
/// Content `i + 1` is not read before content `i` has completed. The first error
/// ends the splice; remaining sources are dropped right away.
pub struct Splice {
    segments: std::vec::IntoIter<Bytes>,
    contents: std::vec::IntoIter<ContentSource>,
    current: Option<ChunkPipe<ChunkIter, IncrementalBase64Encoder>>,
    failed: bool,
    bytes_out: u64,
}

impl Splice {
    /// Bytes emitted so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }
}

impl Iterator for Splice {
    type Item = Result<Chunk, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if let Some(encoder) = self.current.as_mut() {
            match encoder.next() {
                Some(Ok(chunk)) => {
                    self.bytes_out += chunk.len() as u64;
                    return Some(Ok(chunk));
                }
                Some(Err(e)) => {
                    self.failed = true;
                    self.current = None;
                    self.contents = Vec::new().into_iter();
                    return Some(Err(e));
                }
                None => self.current = None,
            }
        }

        let segment = self.segments.next()?;
        if let Some(content) = self.contents.next() {
            self.current = Some(encode_chunks(content.chunks));
        } else {
            debug!(bytes = self.bytes_out + segment.len() as u64, "splice emitting final segment");
        }
        self.bytes_out += segment.len() as u64;
        Some(Ok(segment))
    }
}
