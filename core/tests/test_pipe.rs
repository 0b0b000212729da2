// Chunk pipe behaviour:
// * per-chunk transform, order preserved
// * trailer exactly once on clean completion
// * no trailer on input failure, transform failure or early drop

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use streaming_core::chunk::{Chunk, collect_chunks};
    use streaming_core::pipe::{ChunkPipe, ChunkTransform, pipe, pipe_with_trailer};
    use streaming_core::source::ReaderChunks;
    use streaming_core::types::StreamError;

    const SMALL: &str = "abcdefghijklmnopqrstuvwxyz01234567890123456789abcdefghijklmnopqrstuvwxyz";
    const FOOTER: &str = "FOO";

    fn ten_k() -> Vec<u8> {
        b"0123456789".repeat(1024)
    }

    fn small_input() -> Vec<Result<Chunk, StreamError>> {
        vec![Ok(Bytes::from_static(SMALL.as_bytes()))]
    }

    fn file_like(data: Vec<u8>, chunk_size: usize) -> ReaderChunks<Cursor<Vec<u8>>> {
        ReaderChunks::new(Cursor::new(data), chunk_size)
    }

    fn keep_letters(chunk: Chunk) -> Result<Chunk, StreamError> {
        Ok(chunk.iter().copied().filter(u8::is_ascii_alphabetic).collect::<Vec<u8>>().into())
    }

    fn drop_even_digits(chunk: Chunk) -> Result<Chunk, StreamError> {
        Ok(chunk.iter().copied().filter(|b| !b"02468".contains(b)).collect::<Vec<u8>>().into())
    }

    fn count_bytes(chunk: Chunk) -> Result<Chunk, StreamError> {
        Ok(Bytes::from(format!("{}-", chunk.len())))
    }

    fn footer() -> Result<Chunk, StreamError> {
        Ok(Bytes::from_static(FOOTER.as_bytes()))
    }

    #[test]
    fn pipe_noop_small() {
        let out = collect_chunks(pipe(small_input(), Ok)).unwrap();
        assert_eq!(out, SMALL.as_bytes());
    }

    #[test]
    fn pipe_sanitize_small() {
        let out = collect_chunks(pipe(small_input(), keep_letters)).unwrap();
        assert_eq!(out, b"abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn pipe_sanitize_large() {
        for chunk_size in [1024, 4096] {
            let input = file_like(ten_k(), chunk_size);
            let out = collect_chunks(pipe(input, drop_even_digits)).unwrap();
            assert_eq!(out.len(), ten_k().len() / 2, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn pipe_with_trailer_counts_chunks() {
        let cases = [
            (1023, "1023-1023-1023-1023-1023-1023-1023-1023-1023-1023-10-FOO"),
            (1024, "1024-1024-1024-1024-1024-1024-1024-1024-1024-1024-FOO"),
            (1025, "1025-1025-1025-1025-1025-1025-1025-1025-1025-1015-FOO"),
            (10240, "10240-FOO"),
        ];
        for (chunk_size, expected) in cases {
            let input = file_like(ten_k(), chunk_size);
            let out = collect_chunks(pipe_with_trailer(input, count_bytes, footer)).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), expected);
        }
    }

    #[test]
    fn trailer_is_last_chunk_and_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let input: Vec<Result<Chunk, StreamError>> =
            vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];

        let chunks: Vec<Chunk> = pipe_with_trailer(input, Ok, move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"|end"))
        })
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.last().unwrap(), &Bytes::from_static(b"|end"));
    }

    #[test]
    fn trailer_runs_for_empty_input() {
        let out = collect_chunks(pipe_with_trailer(Vec::<Result<Chunk, StreamError>>::new(), Ok, footer)).unwrap();
        assert_eq!(out, FOOTER.as_bytes());
    }

    #[test]
    fn input_failure_suppresses_trailer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let input: Vec<Result<Chunk, StreamError>> = vec![
            Ok(Bytes::from_static(b"ok")),
            Err(StreamError::Transform("upstream broke".into())),
            Ok(Bytes::from_static(b"never")),
        ];

        let mut p = pipe_with_trailer(input, Ok, move || {
            seen.fetch_add(1, Ordering::SeqCst);
            footer()
        });

        assert_eq!(p.next().unwrap().unwrap(), Bytes::from_static(b"ok"));
        assert!(p.next().unwrap().is_err());
        assert!(p.next().is_none(), "pipe must be fused after an error");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn transform_failure_stops_pipe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let transformed = Arc::new(AtomicUsize::new(0));
        let count = transformed.clone();
        let input: Vec<Result<Chunk, StreamError>> =
            (0..5).map(|i| Ok(Bytes::from(vec![i as u8; 4]))).collect();

        let p = pipe_with_trailer(
            input,
            move |chunk: Chunk| {
                if count.fetch_add(1, Ordering::SeqCst) == 2 {
                    return Err(StreamError::Transform("bad chunk".into()));
                }
                Ok(chunk)
            },
            move || {
                seen.fetch_add(1, Ordering::SeqCst);
                footer()
            },
        );

        let results: Vec<_> = p.collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
        assert_eq!(transformed.load(Ordering::SeqCst), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_pipe_early_never_runs_trailer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let input = file_like(ten_k(), 1024);
        {
            let mut p = pipe_with_trailer(input, Ok, move || {
                seen.fetch_add(1, Ordering::SeqCst);
                footer()
            });
            let _ = p.next();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    struct Upper;

    impl ChunkTransform for Upper {
        fn transform_chunk(&mut self, input: Chunk) -> Result<Chunk, StreamError> {
            Ok(input.to_ascii_uppercase().into())
        }
    }

    #[test]
    fn trait_transform_without_trailer() {
        let input: Vec<Result<Chunk, StreamError>> =
            vec![Ok(Bytes::from_static(b"abc")), Ok(Bytes::from_static(b"def"))];
        let mut p = ChunkPipe::new(input.into_iter(), Upper);
        let out = collect_chunks(&mut p).unwrap();
        assert_eq!(out, b"ABCDEF");
        assert_eq!(p.chunks_in(), 2);
    }
}
