//! The concrete scenarios from spec §8, as table-driven `rstest` cases
//! where the shape allows it and individual `#[test]`s otherwise.

use alloc::{
    string::ToString,
    vec,
    vec::Vec,
};

use rstest::rstest;

use crate::{
    byte_source::{ByteSource, StaticSource},
    handle::Handle,
    path::{self, PathComponent},
    value,
};

fn source(text: &str) -> StaticSource<Vec<u8>> {
    StaticSource::new(text.as_bytes().to_vec())
}

#[test]
fn fourth_array_element_is_a_string_handle() {
    let src = source(r#"{"foo": [1, 2, 3, "four"]}"#);
    let root = value(&src).unwrap();
    let foo = root.as_object().unwrap().get(b"foo").unwrap();
    let fourth = foo.as_array().unwrap().get(4).unwrap();
    match fourth {
        Handle::String(s) => {
            let mut raw = Vec::new();
            src.copy_range(s.offset(), s.end_offset(), &mut raw);
            assert_eq!(raw, br#""four""#);
            assert_eq!(s.to_decoded_string_lossy(), "four");
        }
        _ => panic!("expected a string handle"),
    }
}

#[test]
fn sum_of_ids_array() {
    let src = source(r#"{"Image":{"Width":800,"Height":600,"IDs":[116,943,234,38793]}}"#);
    let root = value(&src).unwrap();
    let image = root.as_object().unwrap().get(b"Image").unwrap();
    let ids = image.as_object().unwrap().get(b"IDs").unwrap();
    let mut sum: i64 = 0;
    for item in ids.as_array().unwrap().iter() {
        let (start, _end) = item.unwrap();
        match Handle::at(&src, start).unwrap() {
            Handle::Number(n) => sum += n.to_i64().unwrap(),
            _ => panic!("expected numbers"),
        }
    }
    assert_eq!(sum, 40_086);
}

#[test]
fn scientific_notation_parses_as_big_float() {
    let src = source("[123.456e-789]");
    let root = value(&src).unwrap();
    let elem = root.as_array().unwrap().get(1).unwrap();
    match elem {
        Handle::Number(n) => match n.to_number() {
            crate::number::Number::Big(b) => {
                assert_eq!(b.to_string(), "1.23456e-787");
            }
            other => panic!("expected an arbitrary-precision float, got {other:?}"),
        },
        _ => panic!("expected a number"),
    }
}

#[test]
fn negative_zero_parses_as_negative_zero_float() {
    let src = source("[-0]");
    let root = value(&src).unwrap();
    let elem = root.as_array().unwrap().get(1).unwrap();
    match elem {
        Handle::Number(n) => {
            let v = n.to_number();
            match v {
                crate::number::Number::Float(f) => {
                    assert_eq!(f, 0.0);
                    assert!(f.is_sign_negative());
                }
                other => panic!("expected a negative-zero float, got {other:?}"),
            }
        }
        _ => panic!("expected a number"),
    }
}

#[test]
fn lone_surrogate_key_is_tolerated() {
    let src = source(r#"{"\uDFAA":0}"#);
    let root = value(&src).unwrap();
    let obj = root.as_object().unwrap();
    let mut members: Vec<_> = obj.iter().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(members.len(), 1);
    let key_bytes = members.remove(0).key().to_decoded_bytes();
    // U+DFAA encoded the way a naive per-code-unit UTF-8 encoder would: the
    // three-byte sequence for the lone surrogate's numeric value.
    assert_eq!(key_bytes, [0xED, 0xBE, 0xAA]);
}

#[rstest]
#[case(r#"{"a":1,"b":[1,2,3]}"#, &[PathComponent::Key(b"b"), PathComponent::Index(2)], b"7", r#"{"a":1,"b":[1,7,3]}"#)]
#[case(r#"[1,2,3]"#, &[PathComponent::Index(1)], b"100", r#"[100,2,3]"#)]
fn splice_produces_expected_text(
    #[case] input: &str,
    #[case] path_spec: &[PathComponent<'_>],
    #[case] replacement: &[u8],
    #[case] expected: &str,
) {
    let src = source(input);
    let result = crate::piece_table::splice_value(&src, path_spec, replacement).unwrap();
    assert_eq!(result.to_bytes(), expected.as_bytes());
}

#[test]
fn streaming_feed_in_three_chunks_matches_whole_buffer() {
    use std::io::Read;

    use crate::streaming::StreamingSource;

    let doc = br#"{"id":1296269,"owner":{"login":"oct"}}"#;

    struct FixedChunks {
        chunks: Vec<&'static [u8]>,
        idx: usize,
    }
    impl Read for FixedChunks {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.idx >= self.chunks.len() {
                return Ok(0);
            }
            let chunk = self.chunks[self.idx];
            self.idx += 1;
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    let chunks = vec![&doc[0..10], &doc[10..25], &doc[25..]];
    let mut streaming = StreamingSource::new(FixedChunks { chunks, idx: 0 });

    let id = streaming
        .pump(|src| match path::resolve_from_root(src, &[PathComponent::Key(b"id")])? {
            Handle::Number(n) => Ok(n.to_i64()?),
            _ => unreachable!(),
        })
        .unwrap();
    let login = streaming
        .pump(|src| {
            match path::resolve_from_root(
                src,
                &[PathComponent::Key(b"owner"), PathComponent::Key(b"login")],
            )? {
                Handle::String(s) => Ok(s.to_decoded_string_lossy()),
                _ => unreachable!(),
            }
        })
        .unwrap();

    let flat = StaticSource::new(doc.to_vec());
    let flat_id = match path::resolve_from_root(&flat, &[PathComponent::Key(b"id")]).unwrap() {
        Handle::Number(n) => n.to_i64().unwrap(),
        _ => unreachable!(),
    };
    let flat_login = match path::resolve_from_root(
        &flat,
        &[PathComponent::Key(b"owner"), PathComponent::Key(b"login")],
    )
    .unwrap()
    {
        Handle::String(s) => s.to_decoded_string_lossy(),
        _ => unreachable!(),
    };

    assert_eq!(id, 1_296_269);
    assert_eq!(id, flat_id);
    assert_eq!(login, "oct");
    assert_eq!(login, flat_login);
}
