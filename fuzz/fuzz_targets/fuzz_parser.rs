#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonreader::{ByteSource, Handle, StaticSource, StreamingSource};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x1F); // 5 bits

        // 2) split-seed
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;

        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
            prefix += append_whitespace(&mut data[prefix..], limit);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N whitespace code-points (N chosen randomly) to `buf`,
/// but never exceed `limit`.  Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n_codepoints = rng.random_range(1..=limit.min(8));
        let mut written = 0;

        for _ in 0..n_codepoints {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];

            // Stop if this whitespace would overflow the caller’s slice.
            if written + w.len() > limit {
                break;
            }

            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        match ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(value) => break value,
            Err(_) => continue,
        };
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?), // Arbitrary boolean
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?), // Arbitrary string
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Recursively visits every value reachable from `handle`, forcing every
/// lazy conversion (number fallback chain, string decoding, verbatim text)
/// so the fuzzer can reach deep into the scanner regardless of which shape
/// the mutator produced.
fn walk<S: ByteSource>(source: &S, handle: &Handle<'_, S>) {
    let _ = handle.as_text(source);
    match handle {
        Handle::Null(_) | Handle::Bool(..) => {}
        Handle::Number(n) => {
            let _ = n.to_number();
            let _ = n.to_i64();
            let _ = n.to_f64();
        }
        Handle::String(s) => {
            let _ = s.to_decoded_bytes();
            let _ = s.to_decoded_string_lossy();
            for c in s.chars() {
                let _ = c;
            }
        }
        Handle::Array(arr) => {
            for item in arr.iter() {
                let Ok((start, _end)) = item else { break };
                let Ok(child) = Handle::at(source, start) else {
                    continue;
                };
                walk(source, &child);
            }
        }
        Handle::Object(obj) => {
            for member in obj.iter() {
                let Ok(member) = member else { break };
                let _ = member.key().to_decoded_bytes();
                if let Ok(child) = member.value() {
                    walk(source, &child);
                }
            }
        }
    }
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let data = &data[HEADER..];

    if data.is_empty() {
        return;
    }

    if flags & 1 == 0 {
        // Whole-buffer path: parse the complete document eagerly.
        let src = StaticSource::new(data.to_vec());
        if let Ok(root) = jsonreader::value(&src) {
            walk(&src, &root);

            // Exercise the piece-table splice path too: replace the first
            // array element with its own verbatim text and check the edit
            // is still valid, re-parseable JSON.
            if let Handle::Array(arr) = &root {
                if let Ok(false) = arr.is_empty() {
                    if let Ok(first) = arr.get(1) {
                        let text = first.as_text(&src).unwrap_or_default();
                        let _ = jsonreader::splice_value(
                            &src,
                            &[jsonreader::PathComponent::Index(1)],
                            text.as_bytes(),
                        );
                    }
                }
            }
        }
    } else {
        // Streaming path: feed the same bytes through the chunked reader in
        // pieces whose size is derived from the remaining flag bits.
        let chunk_len = 1 + (flags as usize >> 1);
        let mut streaming = StreamingSource::new(ChunkedReader {
            remaining: data.to_vec(),
            chunk_len,
        });
        let _ = streaming.pump(|src| Handle::root(src).map(|h| h.offset()));
    }
}

struct ChunkedReader {
    remaining: Vec<u8>,
    chunk_len: usize,
}

impl std::io::Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let take = self.chunk_len.min(self.remaining.len()).min(buf.len());
        buf[..take].copy_from_slice(&self.remaining[..take]);
        self.remaining.drain(..take);
        Ok(take)
    }
}

fuzz_target!(|data: &[u8]| parser(data));
