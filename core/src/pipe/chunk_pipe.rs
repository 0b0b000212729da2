use tracing::debug;

use crate::chunk::Chunk;
use crate::pipe::types::{ChunkTransform, FnTransform, NoTrailer};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipeState {
    Streaming,
    Done,
}

/// Pull-based chunk pipe.
///
/// - One output chunk per input chunk, in input order.
/// - `finish` runs once after the input ends cleanly, and its chunk (if any) is the last item.
/// - The first error (from the input or the transform) is yielded and the pipe is fused;
///   the trailer is then never invoked.
/// - Dropping the pipe early is cancellation: the trailer never runs.
pub struct ChunkPipe<I, T> {
    input: I,
    transform: T,
    state: PipeState,
    chunks_in: u64,
}

impl<I, T> ChunkPipe<I, T>
where
    I: Iterator<Item = Result<Chunk, StreamError>>,
    T: ChunkTransform,
{
    pub fn new(input: I, transform: T) -> Self {
        Self {
            input,
            transform,
            state: PipeState::Streaming,
            chunks_in: 0,
        }
    }

    /// Number of input chunks transformed so far.
    pub fn chunks_in(&self) -> u64 {
        self.chunks_in
    }

    fn fail(&mut self, e: StreamError) -> Option<Result<Chunk, StreamError>> {
        debug!(chunks = self.chunks_in, error = %e, "chunk pipe aborted");
        self.state = PipeState::Done;
        Some(Err(e))
    }
}

impl<I, T> Iterator for ChunkPipe<I, T>
where
    I: Iterator<Item = Result<Chunk, StreamError>>,
    T: ChunkTransform,
{
    type Item = Result<Chunk, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == PipeState::Done {
            return None;
        }

        match self.input.next() {
            Some(Ok(chunk)) => match self.transform.transform_chunk(chunk) {
                Ok(out) => {
                    self.chunks_in += 1;
                    Some(Ok(out))
                }
                Err(e) => self.fail(e),
            },
            Some(Err(e)) => self.fail(e),
            None => {
                self.state = PipeState::Done;
                match self.transform.finish() {
                    Ok(Some(trailer)) => {
                        debug!(chunks = self.chunks_in, trailer_len = trailer.len(), "chunk pipe finished with trailer");
                        Some(Ok(trailer))
                    }
                    Ok(None) => {
                        debug!(chunks = self.chunks_in, "chunk pipe finished");
                        None
                    }
                    Err(e) => Some(Err(e)),
                }
            }
        }
    }
}

/// Pipe `input` through `transform` without a trailer.
pub fn pipe<I, F>(input: I, transform: F) -> ChunkPipe<I::IntoIter, FnTransform<F, NoTrailer>>
where
    I: IntoIterator<Item = Result<Chunk, StreamError>>,
    F: FnMut(Chunk) -> Result<Chunk, StreamError> + Send,
{
    ChunkPipe::new(input.into_iter(), FnTransform::new(transform, None))
}

/// Pipe `input` through `transform`, then emit the chunk produced by `trailer`.
pub fn pipe_with_trailer<I, F, G>(
    input: I,
    transform: F,
    trailer: G,
) -> ChunkPipe<I::IntoIter, FnTransform<F, G>>
where
    I: IntoIterator<Item = Result<Chunk, StreamError>>,
    F: FnMut(Chunk) -> Result<Chunk, StreamError> + Send,
    G: FnOnce() -> Result<Chunk, StreamError> + Send,
{
    ChunkPipe::new(input.into_iter(), FnTransform::new(transform, Some(trailer)))
}
