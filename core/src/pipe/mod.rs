//! Generic chunk-wise transformer with an optional one-shot trailer.
//!
//! Responsibilities:
//! - Apply a transform to each chunk, in order, one chunk at a time
//! - Emit a trailer exactly once after clean completion
//!
//! Non-responsibilities:
//! - Encoding
//! - IO

pub mod types;
pub mod chunk_pipe;

pub use types::{ChunkTransform, FnTransform, NoTrailer};
pub use chunk_pipe::{ChunkPipe, pipe, pipe_with_trailer};
