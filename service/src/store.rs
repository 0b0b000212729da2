//! File store: upload, download, and download with files inlined as Base64
//! into a JSON wrapper document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use streaming_core::constants::DEFAULT_READ_CHUNK_SIZE;
use streaming_core::template::Template;
use streaming_core::types::StreamError;

use crate::file::{open_file_source, write_stream_to_file};
use crate::stream::{ChunkStream, splice_streams};

pub const DEFAULT_BASE_DIR: &str = "FILES";

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory every stored file lives in (flat, no subdirectories).
    pub base_dir: PathBuf,
    /// Read chunk size for downloads.
    pub read_chunk_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub size: u64,
}

/// Declared length plus the body that produces exactly that many bytes.
pub struct StreamingResponse {
    pub content_type: &'static str,
    pub content_length: u64,
    pub body: ChunkStream,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// `[a-zA-Z0-9-]+` `.` `[a-z]{3,4}`, nothing else.
pub fn is_valid_filename(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty()
        && stem.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && (3..=4).contains(&ext.len())
        && ext.bytes().all(|b| b.is_ascii_lowercase())
}

pub fn content_type_for(name: &str) -> &'static str {
    if name.ends_with(".txt") {
        TEXT_PLAIN
    } else {
        APPLICATION_OCTET_STREAM
    }
}

/// JSON object with the given fields, in the given order.
pub fn wrapper_document<K, I>(fields: I) -> Value
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect::<Map<String, Value>>())
}

pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StreamError> {
        if !is_valid_filename(name) {
            warn!(name, "rejected file name");
            return Err(StreamError::InvalidName(name.to_string()));
        }
        Ok(self.config.base_dir.join(name))
    }

    /// Store `body` under `name`, replacing any existing file.
    pub async fn upload(&self, name: &str, body: ChunkStream) -> Result<UploadReceipt, StreamError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.config.base_dir).await?;
        let size = write_stream_to_file(body, &path).await?;
        info!(name, size, "file uploaded");
        Ok(UploadReceipt { size })
    }

    pub async fn download(&self, name: &str) -> Result<StreamingResponse, StreamError> {
        let path = self.path_for(name)?;
        let source = open_file_source(&path, self.config.read_chunk_size).await?;
        info!(name, size = source.length, "file download");
        Ok(StreamingResponse {
            content_type: content_type_for(name),
            content_length: source.length,
            body: source.stream,
        })
    }

    /// Stream `wrapper` with `<base64-N>` replaced by the Base64 of file `names[N - 1]`.
    ///
    /// Names, placeholder count and every file are checked before the response is
    /// built; once it is returned, only mid-stream I/O can still fail.
    pub async fn download_with_base64(
        &self,
        wrapper: &Value,
        names: &[&str],
    ) -> Result<StreamingResponse, StreamError> {
        let paths = names
            .iter()
            .map(|name| self.path_for(name))
            .collect::<Result<Vec<_>, _>>()?;

        let document = serde_json::to_vec(wrapper).map_err(|e| StreamError::Template(e.to_string()))?;
        let template = Template::parse(document);
        if template.placeholder_count() != names.len() {
            return Err(StreamError::placeholder_mismatch(template.placeholder_count(), names.len()));
        }

        let mut lengths = Vec::with_capacity(paths.len());
        let mut streams = Vec::with_capacity(paths.len());
        for path in &paths {
            let source = open_file_source(path, self.config.read_chunk_size).await?;
            lengths.push(source.length);
            streams.push(source.stream);
        }

        let content_length = template.precomputed_length(&lengths)?;
        info!(files = names.len(), content_length, "file download with base64 inclusion");
        Ok(StreamingResponse {
            content_type: APPLICATION_JSON,
            content_length,
            body: splice_streams(&template, streams)?,
        })
    }
}
