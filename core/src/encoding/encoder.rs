use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use bytes::Bytes;
use tracing::trace;

use crate::chunk::Chunk;
use crate::pipe::{ChunkPipe, ChunkTransform};
use crate::types::StreamError;

/// 0–2 input bytes left over between chunks (3 raw bytes map to 4 encoded characters).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Carry {
    bytes: [u8; 2],
    len: u8,
}

impl Carry {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    fn set(&mut self, tail: &[u8]) {
        debug_assert!(tail.len() <= 2, "carry holds at most two bytes");
        self.bytes[..tail.len()].copy_from_slice(tail);
        self.len = tail.len() as u8;
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Base64 encoder whose concatenated output does not depend on how the input is chunked.
///
/// Create one per stream; the carry is never shared.
#[derive(Debug, Default)]
pub struct IncrementalBase64Encoder {
    carry: Carry,
    bytes_in: u64,
    bytes_out: u64,
}

impl IncrementalBase64Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn carry(&self) -> &Carry {
        &self.carry
    }

    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    fn encode_groups(input: &[u8], out: &mut [u8]) -> Result<usize, StreamError> {
        STANDARD_NO_PAD
            .encode_slice(input, out)
            .map_err(|e| StreamError::Transform(format!("base64 encode: {e}")))
    }
}

impl ChunkTransform for IncrementalBase64Encoder {
    fn transform_chunk(&mut self, input: Chunk) -> Result<Chunk, StreamError> {
        self.bytes_in += input.len() as u64;
        let carried = self.carry.len();
        let total = carried + input.len();

        if total < 3 {
            let mut merged = [0u8; 2];
            merged[..carried].copy_from_slice(self.carry.as_slice());
            merged[carried..total].copy_from_slice(&input);
            self.carry.set(&merged[..total]);
            return Ok(Bytes::new());
        }

        let mut out = vec![0u8; total / 3 * 4];
        let mut written = 0;
        let mut rest: &[u8] = &input;

        // Complete the carried group on the stack; the rest is encoded in place.
        if carried > 0 {
            let need = 3 - carried;
            let mut group = [0u8; 3];
            group[..carried].copy_from_slice(self.carry.as_slice());
            group[carried..].copy_from_slice(&input[..need]);
            written += Self::encode_groups(&group, &mut out[..4])?;
            rest = &input[need..];
        }

        let whole = rest.len() / 3 * 3;
        written += Self::encode_groups(&rest[..whole], &mut out[written..])?;
        self.carry.set(&rest[whole..]);

        debug_assert_eq!(written, out.len());
        self.bytes_out += written as u64;
        trace!(input = input.len(), output = written, carry = self.carry.len(), "base64 chunk");
        Ok(Bytes::from(out))
    }

    fn finish(&mut self) -> Result<Option<Chunk>, StreamError> {
        let tail = STANDARD.encode(self.carry.as_slice());
        self.carry.clear();
        self.bytes_out += tail.len() as u64;
        Ok(Some(Bytes::from(tail)))
    }
}

/// Base64-encode a chunk sequence lazily.
pub fn encode_chunks<I>(input: I) -> ChunkPipe<I::IntoIter, IncrementalBase64Encoder>
where
    I: IntoIterator<Item = Result<Chunk, StreamError>>,
{
    ChunkPipe::new(input.into_iter(), IncrementalBase64Encoder::new())
}

/// One-shot padded encoding of a complete buffer.
pub fn encode_to_vec(input: &[u8]) -> Vec<u8> {
    STANDARD.encode(input).into_bytes()
}
