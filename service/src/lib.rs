//! streaming-service
//!
//! Tokio adapters over streaming-core: chunk streams, async transfers,
//! file sources and the file store operations.

#![forbid(unsafe_code)]

pub mod stream;
pub mod file;
pub mod transfer;
pub mod store;

pub use streaming_core::types::StreamError;

pub mod prelude {
    pub use crate::file::{FileSource, open_file_source, write_stream_to_file};
    pub use crate::store::{FileStore, StoreConfig, StreamingResponse, UploadReceipt};
    pub use crate::stream::{ChunkStream, PipeStream, base64_encode_stream, collect_stream, splice_streams};
    pub use crate::transfer::{transfer_async, transfer_file_async};
    pub use streaming_core::prelude::*;
}
