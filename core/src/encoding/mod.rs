//! Incremental (chunk-boundary independent) Base64 encoding.
//!
//! Mid-stream chunks only ever contain whole 4-character groups; padding is
//! produced by the trailer, once, at end of stream.

pub mod encoder;
pub mod size;

pub use encoder::{Carry, IncrementalBase64Encoder, encode_chunks, encode_to_vec};
pub use size::calculate_base64_size;
