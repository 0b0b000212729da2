use crate::chunk::Chunk;
use crate::types::StreamError;

// Require Send so transforms can move into a stream owned by another task.
pub trait ChunkTransform: Send {
    /// Transform a single input chunk into exactly one output chunk.
    fn transform_chunk(&mut self, input: Chunk) -> Result<Chunk, StreamError>;

    /// Called once after the last input chunk; may emit one trailer chunk.
    fn finish(&mut self) -> Result<Option<Chunk>, StreamError> {
        Ok(None)
    }
}

impl<T: ChunkTransform + ?Sized> ChunkTransform for Box<T> {
    fn transform_chunk(&mut self, input: Chunk) -> Result<Chunk, StreamError> {
        (**self).transform_chunk(input)
    }

    fn finish(&mut self) -> Result<Option<Chunk>, StreamError> {
        (**self).finish()
    }
}

/// Trailer type used by pipes that never emit a trailer.
pub type NoTrailer = fn() -> Result<Chunk, StreamError>;

/// Adapts a per-chunk closure plus an optional one-shot trailer closure.
///
/// The trailer is `FnOnce`: it is taken out on the first `finish` call and can
/// never run twice.
pub struct FnTransform<F, G> {
    transform: F,
    trailer: Option<G>,
}

impl<F, G> FnTransform<F, G> {
    pub fn new(transform: F, trailer: Option<G>) -> Self {
        Self { transform, trailer }
    }
}

impl<F, G> ChunkTransform for FnTransform<F, G>
where
    F: FnMut(Chunk) -> Result<Chunk, StreamError> + Send,
    G: FnOnce() -> Result<Chunk, StreamError> + Send,
{
    fn transform_chunk(&mut self, input: Chunk) -> Result<Chunk, StreamError> {
        (self.transform)(input)
    }

    fn finish(&mut self) -> Result<Option<Chunk>, StreamError> {
        match self.trailer.take() {
            Some(trailer) => trailer().map(Some),
            None => Ok(None),
        }
    }
}
