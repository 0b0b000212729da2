//! Tokio file sources and sinks.

use std::path::Path;

use futures::stream::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use streaming_core::chunk::Chunk;
use streaming_core::types::StreamError;

use crate::stream::ChunkStream;

/// An opened file, ready to stream, with its size from metadata.
pub struct FileSource {
    pub stream: ChunkStream,
    pub length: u64,
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Open `path` for streaming in chunks of up to `chunk_size` bytes.
///
/// The file is opened here, not on first poll, so a missing file surfaces as
/// `SourceNotFound` before any byte is produced.
pub async fn open_file_source(path: impl AsRef<Path>, chunk_size: usize) -> Result<FileSource, StreamError> {
    let path = path.as_ref();
    let name = path.display().to_string();

    let file = File::open(path).await.map_err(|e| {
        warn!(path = %name, error = %e, "cannot open file to read from");
        StreamError::from_open(name.clone(), e)
    })?;
    let length = file
        .metadata()
        .await
        .map_err(|e| StreamError::from_open(name, e))?
        .len();

    let stream = ReaderStream::with_capacity(file, chunk_size)
        .map(|chunk| chunk.map_err(StreamError::from))
        .boxed();
    Ok(FileSource { stream, length })
}

/// Write every chunk of `stream` to `path` (created or truncated). Returns bytes written.
pub async fn write_stream_to_file<S>(mut stream: S, path: impl AsRef<Path>) -> Result<u64, StreamError>
where
    S: Stream<Item = Result<Chunk, StreamError>> + Unpin,
{
    let path = path.as_ref();
    let mut file = File::create(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "cannot open file to write to");
        StreamError::from_open(path.display().to_string(), e)
    })?;

    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    debug!(path = %path.display(), bytes = written, "stream written to file");
    Ok(written)
}
