//! A small, depth-bounded `serde_json::Value` generator used as the oracle
//! for the property tests in [`super::properties`]. Grounded on the
//! teacher's `tests/arbitrary.rs`, which generates its own `Value` type the
//! same way; this crate compares against `serde_json` instead of a
//! self-hosted eager type, since materialising a document eagerly is
//! explicitly out of this crate's scope (spec §1 Non-goals).

use alloc::format;

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF64(pub f64);

impl Arbitrary for FiniteF64 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

/// A depth-bounded JSON document, wrapped so it can implement
/// `quickcheck::Arbitrary` without orphan-rule conflicts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JsonDoc(pub Value);

impl Arbitrary for JsonDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 3;
        JsonDoc(gen_val(g, depth))
    }
}

fn gen_val(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        match usize::arbitrary(g) % 4 {
            0 => Value::Null,
            1 => Value::Bool(bool::arbitrary(g)),
            2 => Value::Number(finite_number(g)),
            _ => Value::String(ascii_string(g)),
        }
    } else {
        match usize::arbitrary(g) % 6 {
            0 => Value::Null,
            1 => Value::Bool(bool::arbitrary(g)),
            2 => Value::Number(finite_number(g)),
            3 => Value::String(ascii_string(g)),
            4 => {
                let len = usize::arbitrary(g) % 4;
                Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
            }
            _ => {
                let len = usize::arbitrary(g) % 4;
                let mut map = Map::new();
                for i in 0..len {
                    let mut key = ascii_string(g);
                    if key.is_empty() {
                        key = format!("k{i}");
                    }
                    map.insert(key, gen_val(g, depth - 1));
                }
                Value::Object(map)
            }
        }
    }
}

fn finite_number(g: &mut Gen) -> Number {
    if bool::arbitrary(g) {
        Number::from(i64::arbitrary(g))
    } else {
        Number::from_f64(FiniteF64::arbitrary(g).0).unwrap_or_else(|| Number::from(0))
    }
}

/// Generates printable ASCII only: this crate's escape-decoding semantics
/// are exercised directly by the scenario tests in [`super::scenarios`],
/// so the property tests only need strings that round-trip byte-for-byte
/// through `serde_json`'s own (un)escaping without relying on our decoder
/// to agree on every exotic escape.
fn ascii_string(g: &mut Gen) -> alloc::string::String {
    let len = usize::arbitrary(g) % 8;
    (0..len)
        .map(|_| {
            let choices: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 _-";
            let idx = usize::arbitrary(g) % choices.len();
            choices[idx] as char
        })
        .collect()
}
