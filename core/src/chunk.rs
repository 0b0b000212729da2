//! Chunk representation shared by every pipeline stage.

use bytes::Bytes;

use crate::types::StreamError;

/// An immutable view over a contiguous byte range. Slicing never copies.
pub type Chunk = Bytes;

/// Lazy, forward-only, finite sequence of chunks.
pub type ChunkIter = Box<dyn Iterator<Item = Result<Chunk, StreamError>> + Send>;

/// Flatten a chunk sequence into a single buffer, stopping at the first error.
pub fn collect_chunks<I>(chunks: I) -> Result<Vec<u8>, StreamError>
where
    I: IntoIterator<Item = Result<Chunk, StreamError>>,
{
    let mut out = Vec::new();
    for chunk in chunks {
        out.extend_from_slice(&chunk?);
    }
    Ok(out)
}

/// Split `data` into chunks of at most `chunk_size` bytes (last one may be shorter).
/// Empty data produces zero chunks; a zero `chunk_size` is a contract error.
pub fn split_into_chunks(data: &[u8], chunk_size: usize) -> Result<Vec<Chunk>, StreamError> {
    if chunk_size == 0 {
        return Err(StreamError::Contract("chunk size must be positive".into()));
    }
    let whole = Bytes::copy_from_slice(data);
    Ok((0..data.len())
        .step_by(chunk_size)
        .map(|start| whole.slice(start..(start + chunk_size).min(data.len())))
        .collect())
}
