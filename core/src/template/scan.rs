use bytes::Bytes;

use crate::constants::{MAX_PLACEHOLDERS, TOKEN_PREFIX, TOKEN_SUFFIX};
use crate::types::StreamError;

/// The literal placeholder token for slot `index` (1-based), e.g. `<base64-1>`.
///
/// Only `1..=MAX_PLACEHOLDERS` name a slot the scanner recognizes; any other
/// index is a contract error.
pub fn placeholder_token(index: usize) -> Result<String, StreamError> {
    if !(1..=MAX_PLACEHOLDERS).contains(&index) {
        return Err(StreamError::Contract(format!(
            "placeholder index {index} outside 1..={MAX_PLACEHOLDERS}"
        )));
    }
    Ok(token_for(index))
}

fn token_for(index: usize) -> String {
    format!("{TOKEN_PREFIX}{index}{TOKEN_SUFFIX}")
}

/// Leftmost occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split a template into literal segments around `<base64-1>`, `<base64-2>`, ...
///
/// Each token is searched for in the text that follows the previous one. Scanning
/// stops at the first index that is not found; the unscanned tail (which may still
/// contain higher-numbered tokens verbatim) becomes the last segment.
/// Always returns `placeholders + 1` segments. Segments share the input buffer.
pub fn split_segments(input: &Bytes) -> Vec<Bytes> {
    let mut segments = Vec::with_capacity(2);
    let mut rest = input.clone();

    for index in 1..=MAX_PLACEHOLDERS {
        let token = token_for(index);
        match find(&rest, token.as_bytes()) {
            Some(pos) => {
                segments.push(rest.slice(..pos));
                rest = rest.slice(pos + token.len()..);
            }
            None => break,
        }
    }

    segments.push(rest);
    segments
}
