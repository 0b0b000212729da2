//! `futures::Stream` counterparts of the core chunk pipe and splicer.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, info};

use streaming_core::chunk::{Chunk, ChunkIter};
use streaming_core::encoding::IncrementalBase64Encoder;
use streaming_core::pipe::ChunkTransform;
use streaming_core::template::Template;
use streaming_core::types::StreamError;

/// Owned, sendable chunk stream. Dropping it is cancellation.
pub type ChunkStream = BoxStream<'static, Result<Chunk, StreamError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipeState {
    Streaming,
    Done,
}

/// Async chunk pipe: same contract as `streaming_core::pipe::ChunkPipe`,
/// polled instead of pulled.
pub struct PipeStream<S, T> {
    input: S,
    transform: T,
    state: PipeState,
    chunks_in: u64,
}

impl<S, T> PipeStream<S, T>
where
    S: Stream<Item = Result<Chunk, StreamError>> + Unpin,
    T: ChunkTransform + Unpin,
{
    pub fn new(input: S, transform: T) -> Self {
        Self {
            input,
            transform,
            state: PipeState::Streaming,
            chunks_in: 0,
        }
    }

    pub fn chunks_in(&self) -> u64 {
        self.chunks_in
    }
}

impl<S, T> Stream for PipeStream<S, T>
where
    S: Stream<Item = Result<Chunk, StreamError>> + Unpin,
    T: ChunkTransform + Unpin,
{
    type Item = Result<Chunk, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state == PipeState::Done {
            return Poll::Ready(None);
        }

        let item = match ready!(this.input.poll_next_unpin(cx)) {
            Some(Ok(chunk)) => match this.transform.transform_chunk(chunk) {
                Ok(out) => {
                    this.chunks_in += 1;
                    Some(Ok(out))
                }
                Err(e) => {
                    debug!(chunks = this.chunks_in, error = %e, "pipe stream transform failed");
                    this.state = PipeState::Done;
                    Some(Err(e))
                }
            },
            Some(Err(e)) => {
                debug!(chunks = this.chunks_in, error = %e, "pipe stream aborted");
                this.state = PipeState::Done;
                Some(Err(e))
            }
            None => {
                this.state = PipeState::Done;
                debug!(chunks = this.chunks_in, "pipe stream finished");
                this.transform.finish().transpose()
            }
        };
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            PipeState::Done => (0, Some(0)),
            // one out per in, plus at most one trailer
            PipeState::Streaming => {
                let (lo, hi) = self.input.size_hint();
                (lo, hi.and_then(|h| h.checked_add(1)))
            }
        }
    }
}

/// Base64-encode a chunk stream; the padded tail is emitted when the input ends.
pub fn base64_encode_stream<S>(input: S) -> PipeStream<S, IncrementalBase64Encoder>
where
    S: Stream<Item = Result<Chunk, StreamError>> + Unpin,
{
    PipeStream::new(input, IncrementalBase64Encoder::new())
}

/// Lift a blocking chunk iterator (e.g. an in-memory `ContentSource`) into a stream.
pub fn iter_stream(chunks: ChunkIter) -> ChunkStream {
    stream::iter(chunks).boxed()
}

/// Splice encoded streams into `template`.
///
/// Segment and source counts are checked before anything is polled. The result
/// yields segment₀, base64(contents₀), segment₁, ... and ends right after the first
/// error, so no later segment follows a failed source.
pub fn splice_streams(template: &Template, contents: Vec<ChunkStream>) -> Result<ChunkStream, StreamError> {
    if contents.len() != template.placeholder_count() {
        return Err(StreamError::placeholder_mismatch(template.placeholder_count(), contents.len()));
    }
    info!(
        contents = contents.len(),
        segments = template.segments().len(),
        "splice streams into template"
    );
    Ok(SpliceStream {
        segments: template.segments().to_vec().into_iter(),
        contents: contents.into_iter(),
        current: None,
        failed: false,
        bytes_out: 0,
    }
    .boxed())
}

/// Async counterpart of `streaming_core::template::Splice`.
///
/// Content `i + 1` is not polled before content `i` has completed. On the first
/// error the current encoder and every remaining source are dropped at once.
pub struct SpliceStream {
    segments: std::vec::IntoIter<Bytes>,
    contents: std::vec::IntoIter<ChunkStream>,
    current: Option<PipeStream<ChunkStream, IncrementalBase64Encoder>>,
    failed: bool,
    bytes_out: u64,
}

impl SpliceStream {
    /// Bytes emitted so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }
}

impl Stream for SpliceStream {
    type Item = Result<Chunk, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.failed {
            return Poll::Ready(None);
        }

        if let Some(encoder) = this.current.as_mut() {
            match ready!(encoder.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    this.bytes_out += chunk.len() as u64;
                    return Poll::Ready(Some(Ok(chunk)));
                }
                Some(Err(e)) => {
                    debug!(bytes = this.bytes_out, error = %e, "splice stream aborted");
                    this.failed = true;
                    this.current = None;
                    this.contents = Vec::new().into_iter();
                    this.segments = Vec::new().into_iter();
                    return Poll::Ready(Some(Err(e)));
                }
                None => this.current = None,
            }
        }

        let Some(segment) = this.segments.next() else {
            return Poll::Ready(None);
        };
        if let Some(content) = this.contents.next() {
            this.current = Some(base64_encode_stream(content));
        } else {
            debug!(bytes = this.bytes_out + segment.len() as u64, "splice stream emitting final segment");
        }
        this.bytes_out += segment.len() as u64;
        Poll::Ready(Some(Ok(segment)))
    }
}

/// Drain a chunk stream into one buffer, stopping at the first error.
pub async fn collect_stream<S>(mut stream: S) -> Result<Vec<u8>, StreamError>
where
    S: Stream<Item = Result<Chunk, StreamError>> + Unpin,
{
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk?);
    }
    Ok(out)
}
