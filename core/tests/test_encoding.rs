// Incremental Base64:
// * output independent of chunk boundaries
// * padding only in the trailer
// * exact size precomputation

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use proptest::prelude::*;

    use streaming_core::chunk::{Chunk, collect_chunks, split_into_chunks};
    use streaming_core::encoding::{
        IncrementalBase64Encoder, calculate_base64_size, encode_chunks, encode_to_vec,
    };
    use streaming_core::pipe::ChunkTransform;
    use streaming_core::source::ReaderChunks;
    use streaming_core::types::StreamError;

    fn digits(n: usize) -> Vec<u8> {
        b"0123456789".iter().copied().cycle().take(n).collect()
    }

    fn encode_parts(parts: &[&[u8]]) -> Vec<u8> {
        let input: Vec<Result<Chunk, StreamError>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p)))
            .collect();
        collect_chunks(encode_chunks(input)).unwrap()
    }

    #[test]
    fn encodes_ten_digits_to_sixteen_bytes() {
        let out = encode_parts(&[b"0123456789".as_slice()]);
        assert_eq!(out.len(), 16);
        assert_eq!(out, b"MDEyMzQ1Njc4OQ==");
        assert_eq!(STANDARD.decode(&out).unwrap(), b"0123456789");
    }

    #[test]
    fn encodes_known_digit_strings() {
        let cases = [
            (31, "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MA=="),
            (32, "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDE="),
            (33, "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDEy"),
        ];
        for (n, expected) in cases {
            let data = digits(n);
            assert_eq!(encode_parts(&[data.as_slice()]), expected.as_bytes(), "length {n}");
            // one byte per chunk is the worst case for the carry
            let singles: Vec<&[u8]> = data.chunks(1).collect();
            assert_eq!(encode_parts(&singles), expected.as_bytes(), "length {n}, 1-byte chunks");
        }
    }

    #[test]
    fn two_part_splits_match_one_shot() {
        let parts: [&[u8]; 4] = [b"xyz", b"xy", b"x", b""];
        for a in parts {
            for b in parts {
                let whole = [a, b].concat();
                assert_eq!(
                    encode_parts(&[a, b]),
                    encode_to_vec(&whole),
                    "{:?} + {:?}",
                    String::from_utf8_lossy(a),
                    String::from_utf8_lossy(b)
                );
            }
        }
    }

    #[test]
    fn size_formula() {
        let cases = [(0, 0), (1, 4), (2, 4), (3, 4), (4, 8), (5, 8), (6, 8), (7, 12)];
        for (n, expected) in cases {
            assert_eq!(calculate_base64_size(n), expected, "n = {n}");
        }
        for k in [1u64, 10, 1000, 1 << 20] {
            assert_eq!(calculate_base64_size(3 * k), 4 * k);
        }
    }

    #[test]
    fn size_is_monotonic() {
        let mut prev = 0;
        for n in 0..1000u64 {
            let size = calculate_base64_size(n);
            assert!(size >= prev);
            prev = size;
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out = collect_chunks(encode_chunks(Vec::<Result<Chunk, StreamError>>::new())).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn short_chunk_is_carried_not_emitted() {
        let mut encoder = IncrementalBase64Encoder::new();

        let out = encoder.transform_chunk(Bytes::from_static(b"a")).unwrap();
        assert!(out.is_empty());
        assert_eq!(encoder.carry().as_slice(), b"a");

        let out = encoder.transform_chunk(Bytes::from_static(b"b")).unwrap();
        assert!(out.is_empty());
        assert_eq!(encoder.carry().len(), 2);

        let out = encoder.transform_chunk(Bytes::from_static(b"cd")).unwrap();
        assert_eq!(out, Bytes::from_static(b"YWJj"));
        assert_eq!(encoder.carry().as_slice(), b"d");

        let tail = encoder.finish().unwrap().unwrap();
        assert_eq!(tail, Bytes::from_static(b"ZA=="));
        assert!(encoder.carry().is_empty());
        assert_eq!(encoder.bytes_in(), 4);
        assert_eq!(encoder.bytes_out(), 8);
    }

    #[test]
    fn mid_stream_chunks_are_whole_groups() {
        let data = digits(1000);
        let chunks: Vec<Chunk> = encode_chunks(split_into_chunks(&data, 7).unwrap().into_iter().map(Ok))
            .collect::<Result<_, _>>()
            .unwrap();
        let (tail, body) = chunks.split_last().unwrap();
        for chunk in body {
            assert_eq!(chunk.len() % 4, 0);
            assert!(!chunk.contains(&b'='));
        }
        // 1000 = 3 * 333 + 1, the odd byte is the final '9'
        assert_eq!(&tail[..], b"OQ==");
    }

    #[test]
    fn file_like_input_is_chunk_size_independent() {
        let data = digits(10 * 1024);
        let expected = encode_to_vec(&data);
        for chunk_size in [1023, 1024, 1025, 10240] {
            let input = ReaderChunks::new(Cursor::new(data.clone()), chunk_size);
            let out = collect_chunks(encode_chunks(input)).unwrap();
            assert_eq!(out.len() as u64, calculate_base64_size(data.len() as u64));
            assert_eq!(out, expected, "chunk size {chunk_size}");
        }
    }

    proptest! {
        #[test]
        fn chunking_never_changes_output(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            chunk_size in 1usize..300,
        ) {
            let out = collect_chunks(encode_chunks(
                split_into_chunks(&data, chunk_size).unwrap().into_iter().map(Ok),
            ))
            .unwrap();
            prop_assert_eq!(out.len() as u64, calculate_base64_size(data.len() as u64));
            prop_assert_eq!(&out, &STANDARD.encode(&data).into_bytes());
            prop_assert_eq!(STANDARD.decode(&out).unwrap(), data);
        }
    }
}
