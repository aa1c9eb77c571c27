//! The scanner (spec §4.C): stateless byte-level routines that locate token
//! and value boundaries. Every operation takes `(source, offset)` and
//! returns a new offset (optionally with auxiliary data); none of them hold
//! state of their own, so they can be invoked on demand from any handle.

use alloc::vec::Vec;

use crate::{
    byte_source::{ByteSource, Sentinel},
    charclass::{is_number_start, is_structural_begin, is_structural_end, is_value_noise, is_whitespace},
    error::ScanErrorKind,
};

/// Advances past whitespace, per spec 4.C.1.
#[must_use]
pub fn skip_whitespace(source: &impl ByteSource, mut i: usize) -> usize {
    while is_whitespace(source.byte_at(i)) {
        i = source.advance(i);
    }
    i
}

/// Advances once, then skips whitespace/`,`/`:` — the canonical
/// "past current token" step used between members of a collection (spec
/// 4.C.2).
#[must_use]
pub fn skip_noise(source: &impl ByteSource, i: usize) -> usize {
    let mut cur = source.advance(i);
    while is_value_noise(source.byte_at(cur)) {
        cur = source.advance(cur);
    }
    cur
}

/// Returns the offset of the last byte of the value whose first byte is at
/// `i` (spec 4.C.3).
pub fn end_of_value(source: &impl ByteSource, i: usize) -> Result<usize, ScanErrorKind> {
    let b = source.byte_at(i);
    match b {
        b'{' | b'[' => end_of_collection(source, i),
        b'"' => end_of_string(source, i).map(|(end, _has_escape)| end),
        b'-' | b'0'..=b'9' => end_of_number(source, i),
        b't' => Ok(nth_advance(source, i, 3)),
        b'f' => Ok(nth_advance(source, i, 4)),
        b'n' => Ok(nth_advance(source, i, 3)),
        _ => Err(ScanErrorKind::UnexpectedByte { offset: i, found: b }),
    }
}

fn nth_advance(source: &impl ByteSource, mut i: usize, n: usize) -> usize {
    for _ in 0..n {
        i = source.advance(i);
    }
    i
}

/// Returns the offset of the matching closing bracket for the collection
/// beginning at `i` (spec 4.C.4). Uses a nesting counter rather than
/// recursion, so it is stack-safe for arbitrarily deep documents.
pub fn end_of_collection(source: &impl ByteSource, i: usize) -> Result<usize, ScanErrorKind> {
    let mut nesting: i64 = 1;
    let mut cur = i;
    loop {
        cur = skip_noise(source, cur);
        let b = source.byte_at(cur);
        if is_structural_begin(b) {
            nesting += 1;
        } else if is_structural_end(b) {
            nesting -= 1;
            if nesting == 0 {
                return Ok(cur);
            }
        } else if b == Sentinel::Terminator.byte() {
            return Err(ScanErrorKind::UnexpectedByte { offset: cur, found: b });
        } else if b == Sentinel::MoreInputExpected.byte() {
            return Err(ScanErrorKind::InputExhausted);
        } else {
            cur = end_of_value(source, cur)?;
        }
    }
}

/// Scans a string token starting at the opening quote `i`. Returns the
/// offset of the closing quote and whether any `\` escape was observed
/// (spec 4.C.i).
pub fn end_of_string(source: &impl ByteSource, i: usize) -> Result<(usize, bool), ScanErrorKind> {
    let mut cur = source.advance(i);
    let mut has_escape = false;
    loop {
        let b = source.byte_at(cur);
        match b {
            _ if b == Sentinel::Terminator.byte() => {
                return Err(ScanErrorKind::UnterminatedString { offset: i });
            }
            _ if b == Sentinel::MoreInputExpected.byte() => {
                return Err(ScanErrorKind::InputExhausted);
            }
            b'\\' => {
                has_escape = true;
                // Unconditionally consume the escaped byte, including the
                // `u` of `\uXXXX` -- the four hex digits that follow are
                // ordinary bytes to this scan.
                cur = source.advance(cur);
                let escaped = source.byte_at(cur);
                if escaped == Sentinel::Terminator.byte() {
                    return Err(ScanErrorKind::UnterminatedString { offset: i });
                }
                if escaped == Sentinel::MoreInputExpected.byte() {
                    return Err(ScanErrorKind::InputExhausted);
                }
                cur = source.advance(cur);
            }
            b'"' => return Ok((cur, has_escape)),
            _ => cur = source.advance(cur),
        }
    }
}

/// Scans a number token starting at `i`. Returns the offset of its last
/// byte (spec 4.C.ii).
pub fn end_of_number(source: &impl ByteSource, i: usize) -> Result<usize, ScanErrorKind> {
    debug_assert!(is_number_start(source.byte_at(i)));
    let mut end = i;
    loop {
        let next = source.advance(end);
        let b = source.byte_at(next);
        if b == Sentinel::MoreInputExpected.byte() {
            return Err(ScanErrorKind::InputExhausted);
        }
        if b == Sentinel::Terminator.byte() || is_whitespace(b) || is_structural_end(b) || b == b',' {
            return bounded_number_end(source, i, end);
        }
        end = next;
    }
}

/// Rejects a number whose last consumed byte is a sign, decimal point, or
/// exponent marker with nothing after it — JSON number grammar requires a
/// digit to follow each of those, so stopping there means the token was cut
/// off rather than legitimately ended (e.g. bare `-`, `1.`, `1e+`).
fn bounded_number_end(source: &impl ByteSource, start: usize, end: usize) -> Result<usize, ScanErrorKind> {
    match source.byte_at(end) {
        b'-' | b'+' | b'.' | b'e' | b'E' => Err(ScanErrorKind::UnterminatedNumber { offset: start }),
        _ => Ok(end),
    }
}

/// One step of object-member iteration: given `cur` positioned at either
/// the opening `{` or the end of a previously-consumed member's value,
/// returns `None` at the closing `}`, or the key's byte range (exclusive of
/// quotes), whether the key had escapes, the value's offset, and the
/// offset of the value's last byte (which becomes the next `cur`).
pub struct Member {
    /// Offset of the key's opening quote.
    pub key_quote_start: usize,
    /// Offset of the first byte of the key's body (just past the opening
    /// quote).
    pub key_start: usize,
    /// Offset of the key's closing quote.
    pub key_quote_end: usize,
    /// Whether the key contained a `\` escape.
    pub key_has_escape: bool,
    /// Offset of the first byte of the member's value.
    pub value_start: usize,
    /// Offset of the last byte of the member's value.
    pub value_end: usize,
}

/// Advances one member of an object starting from `cur` (either the `{` or
/// a previous member's `value_end`). Returns `Ok(None)` at `}`.
pub fn next_member(source: &impl ByteSource, cur: usize) -> Result<Option<Member>, ScanErrorKind> {
    let at_key = skip_noise(source, cur);
    let b = source.byte_at(at_key);
    if b == b'}' {
        return Ok(None);
    }
    if b != b'"' {
        return Err(ScanErrorKind::UnexpectedByte { offset: at_key, found: b });
    }
    let (key_quote_end, key_has_escape) = end_of_string(source, at_key)?;
    let value_start = skip_noise(source, key_quote_end);
    let value_end = end_of_value(source, value_start)?;
    Ok(Some(Member {
        key_quote_start: at_key,
        key_start: source.advance(at_key),
        key_quote_end,
        key_has_escape,
        value_start,
        value_end,
    }))
}

/// One step of array-element iteration: given `cur` positioned at either the
/// opening `[` or a previously-consumed element's end, returns `None` at the
/// closing `]`, or the element's offset range.
pub fn next_element(
    source: &impl ByteSource,
    cur: usize,
) -> Result<Option<(usize, usize)>, ScanErrorKind> {
    let at_value = skip_noise(source, cur);
    let b = source.byte_at(at_value);
    if b == b']' {
        return Ok(None);
    }
    let value_end = end_of_value(source, at_value)?;
    Ok(Some((at_value, value_end)))
}

/// Locates a member's value by key, honouring the amortised positional-read
/// path: `start` may be the object's opening `{` or a previous member's
/// `value_end`, letting repeated sequential lookups over fields expected in
/// a known order avoid rescanning from the top (spec 4.C.iii).
///
/// Returns the value's start offset, or `None` if `}` is reached first.
/// This is the single-pass, first-match behaviour used for positional
/// reads; full `{...}` lookups that must honour "last key wins" shadowing
/// are built on top in `object::ObjectView::get`.
pub fn find_key_from(
    source: &impl ByteSource,
    start: usize,
    key: &[u8],
) -> Result<Option<usize>, ScanErrorKind> {
    let mut cur = start;
    loop {
        let Some(member) = next_member(source, cur)? else {
            return Ok(None);
        };
        if key_matches(source, &member, key) {
            return Ok(Some(member.value_start));
        }
        cur = member.value_end;
    }
}

/// Compares a scanned member's key against a raw byte key.
///
/// If the key body has no escapes and is the same length as `key`, this is
/// a direct byte comparison; otherwise the key is decoded via the string
/// view and compared character-wise.
pub fn key_matches(source: &impl ByteSource, member: &Member, key: &[u8]) -> bool {
    let body_len = member.key_quote_end - member.key_start;
    if !member.key_has_escape {
        if body_len != key.len() {
            return false;
        }
        let mut raw = Vec::with_capacity(body_len);
        if body_len > 0 {
            source.copy_range(member.key_start, member.key_quote_end - 1, &mut raw);
        }
        return raw == key;
    }
    let decoded = crate::string::decode_body(source, member.key_start, member.key_quote_end);
    decoded == key
}
