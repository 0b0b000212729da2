//! streaming-core
//!
//! Pure Rust streaming transform pipeline: chunk pipe, incremental Base64,
//! template splicing and blocking transfers.
//! No async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod chunk;

pub mod telemetry;
pub mod source;
pub mod transfer;

// Stream layers
pub mod pipe;
pub mod encoding;
pub mod template;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::chunk::{Chunk, ChunkIter, collect_chunks};
    pub use crate::encoding::{IncrementalBase64Encoder, calculate_base64_size, encode_chunks};
    pub use crate::pipe::{ChunkPipe, ChunkTransform, pipe, pipe_with_trailer};
    pub use crate::source::ContentSource;
    pub use crate::template::{Template, placeholder_token};
    pub use crate::transfer::{transfer, transfer_seekable};
    pub use crate::types::StreamError;
}
