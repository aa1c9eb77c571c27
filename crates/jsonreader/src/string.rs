//! The string view (spec §4.G): presents a JSON string token as a sequence
//! of Unicode characters despite being stored as JSON text with escapes.
//!
//! Escape decoding follows RFC 7159 §7. Lone UTF-16 surrogates (e.g. from a
//! bare `\uDFAA` with no matching low surrogate) cannot be represented by
//! Rust's `char`, so the byte-level decode (`to_decoded_bytes`,
//! `as_bytes_if_no_escape`, and key comparison in `scanner::key_matches`)
//! preserves them as the three-byte sequence a naive per-code-unit UTF-8
//! encoder would produce (not valid UTF-8, matching the "tolerate broken
//! Unicode" policy); the `char`-producing iterator substitutes U+FFFD at
//! that position, since it has no other choice.

use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{byte_source::ByteSource, error::ScanErrorKind, scanner};

/// A lazy view over a JSON string value.
#[derive(Clone, Copy)]
pub struct StringHandle<'a, S: ByteSource> {
    source: &'a S,
    /// Offset of the opening quote.
    offset: usize,
    /// Offset of the closing quote.
    quote_end: usize,
    has_escape: bool,
}

impl<'a, S: ByteSource> StringHandle<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Result<Self, ScanErrorKind> {
        let (quote_end, has_escape) = scanner::end_of_string(source, offset)?;
        Ok(Self {
            source,
            offset,
            quote_end,
            has_escape,
        })
    }

    /// Builds a handle from already-scanned boundaries, skipping a repeat
    /// call to [`scanner::end_of_string`]. Used when a member or element has
    /// already been located by the scanner.
    pub(crate) fn from_scanned(source: &'a S, offset: usize, quote_end: usize, has_escape: bool) -> Self {
        Self {
            source,
            offset,
            quote_end,
            has_escape,
        }
    }

    /// Offset of the opening quote (the handle's canonical offset).
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset of the last byte of the verbatim JSON text (the closing
    /// quote).
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.quote_end
    }

    fn content_start(&self) -> usize {
        self.source.advance(self.offset)
    }

    /// Byte length of the string body (between the quotes, escapes not yet
    /// decoded).
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.quote_end - self.content_start()
    }

    /// Whether the source text contains at least one `\` escape.
    #[must_use]
    pub fn has_escape(&self) -> bool {
        self.has_escape
    }

    /// A zero-copy borrow of the raw (still-escaped) body, if the source
    /// supports contiguous slicing over this range and the body has no
    /// escapes to decode.
    #[must_use]
    pub fn as_bytes_if_no_escape(&self) -> Option<&'a [u8]> {
        if self.has_escape {
            return None;
        }
        let content_start = self.content_start();
        if self.quote_end == content_start {
            return Some(&[]);
        }
        self.source.try_as_slice(content_start, self.quote_end - 1)
    }

    /// Materialises the fully decoded body as raw bytes. For strings with
    /// no escapes this is simply the source bytes between the quotes; for
    /// strings with escapes, each escape is decoded per RFC 7159 §7. Lone
    /// surrogates are preserved as their naive three-byte encoding.
    #[must_use]
    pub fn to_decoded_bytes(&self) -> Vec<u8> {
        decode_body(self.source, self.content_start(), self.quote_end)
    }

    /// Materialises the decoded body as a `String`, replacing any
    /// ill-formed sequences (lone surrogates) with U+FFFD. Use
    /// [`Self::to_decoded_bytes`] when exact byte fidelity matters.
    ///
    /// The common no-escape case borrows the body directly and leans on
    /// `bstr`'s lossy UTF-8 conversion instead of re-decoding through
    /// [`Self::to_decoded_bytes`].
    #[must_use]
    pub fn to_decoded_string_lossy(&self) -> String {
        if let Some(raw) = self.as_bytes_if_no_escape() {
            return raw.to_str_lossy().into_owned();
        }
        self.to_decoded_bytes().to_str_lossy().into_owned()
    }

    /// Iterates decoded `char`s without materialising the whole string.
    #[must_use]
    pub fn chars(&self) -> CharsIter<'a, S> {
        CharsIter {
            source: self.source,
            pos: self.content_start(),
            end: self.quote_end,
        }
    }

    /// Returns `true` if `rel_pos` (relative to the start of the decoded
    /// body) lands on the start of a character rather than inside the bytes
    /// of an escape sequence.
    #[must_use]
    pub fn is_valid_char_position(&self, rel_pos: usize) -> bool {
        let mut pos = self.content_start();
        let target = pos + rel_pos;
        if target > self.quote_end {
            return false;
        }
        while pos < target {
            let b = self.source.byte_at(pos);
            if b == b'\\' {
                // The byte right after `\` is never a valid position.
                let escape_start = self.source.advance(pos);
                if target == escape_start {
                    return false;
                }
                pos = skip_escape(self.source, pos, self.quote_end);
            } else {
                pos = utf8_advance(self.source, pos);
            }
        }
        pos == target
    }
}

/// A lazy, allocation-free iterator over the decoded characters of a JSON
/// string body.
pub struct CharsIter<'a, S: ByteSource> {
    source: &'a S,
    pos: usize,
    end: usize,
}

impl<'a, S: ByteSource> Iterator for CharsIter<'a, S> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        let b = self.source.byte_at(self.pos);
        if b == b'\\' {
            let (unit, next_pos) = decode_escape(self.source, self.pos, self.end);
            self.pos = next_pos;
            Some(unit.to_char_lossy())
        } else {
            let (ch, next_pos) = decode_utf8_scalar(self.source, self.pos);
            self.pos = next_pos;
            Some(ch)
        }
    }
}

/// One decoded unit: either a full Unicode scalar value, or a lone
/// surrogate code unit that has no paired half.
enum DecodedUnit {
    Scalar(char),
    LoneSurrogate(u16),
}

impl DecodedUnit {
    fn to_char_lossy(&self) -> char {
        match self {
            Self::Scalar(c) => *c,
            Self::LoneSurrogate(_) => '\u{FFFD}',
        }
    }

    /// Encodes this unit the way a naive per-code-unit UTF-8 encoder would,
    /// which for a lone surrogate produces the three-byte sequence the
    /// spec calls for (not valid UTF-8, tolerated on purpose).
    fn encode_wtf8(&self, out: &mut Vec<u8>) {
        match self {
            Self::Scalar(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Self::LoneSurrogate(unit) => {
                let cp = u32::from(*unit);
                out.push(0xE0 | (cp >> 12) as u8);
                out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            }
        }
    }
}

/// Decodes the full body `[content_start, quote_end)` into raw WTF-8-ish
/// bytes, used both by `to_decoded_bytes` and by key comparison.
pub(crate) fn decode_body(source: &impl ByteSource, content_start: usize, quote_end: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pos = content_start;
    while pos < quote_end {
        let b = source.byte_at(pos);
        if b == b'\\' {
            let (unit, next_pos) = decode_escape(source, pos, quote_end);
            unit.encode_wtf8(&mut out);
            pos = next_pos;
        } else {
            let (ch, next_pos) = decode_utf8_scalar(source, pos);
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            pos = next_pos;
        }
    }
    out
}

/// Decodes one escape sequence starting at the `\` byte at `pos`. Returns
/// the decoded unit and the offset just past the escape.
fn decode_escape(source: &impl ByteSource, pos: usize, end: usize) -> (DecodedUnit, usize) {
    let backslash_next = source.advance(pos);
    let kind = source.byte_at(backslash_next);
    let simple = match kind {
        b'"' => Some('"'),
        b'\\' => Some('\\'),
        b'/' => Some('/'),
        b'b' => Some('\u{8}'),
        b'f' => Some('\u{c}'),
        b'n' => Some('\n'),
        b'r' => Some('\r'),
        b't' => Some('\t'),
        _ => None,
    };
    if let Some(ch) = simple {
        return (DecodedUnit::Scalar(ch), source.advance(backslash_next));
    }
    if kind == b'u' {
        let digits_start = source.advance(backslash_next);
        if let Some((code_unit, after_digits)) = read_hex4(source, digits_start, end) {
            if (0xD800..=0xDBFF).contains(&code_unit) {
                // Possible surrogate pair: look for `\uYYYY` immediately
                // following.
                if source.byte_at(after_digits) == b'\\'
                    && source.byte_at(source.advance(after_digits)) == b'u'
                {
                    let low_digits_start = source.advance(source.advance(after_digits));
                    if let Some((low, after_low)) = read_hex4(source, low_digits_start, end) {
                        if (0xDC00..=0xDFFF).contains(&low) {
                            let cp = 0x10000
                                + ((u32::from(code_unit) - 0xD800) << 10)
                                + (u32::from(low) - 0xDC00);
                            if let Some(c) = char::from_u32(cp) {
                                return (DecodedUnit::Scalar(c), after_low);
                            }
                        }
                    }
                }
                return (DecodedUnit::LoneSurrogate(code_unit), after_digits);
            }
            if (0xDC00..=0xDFFF).contains(&code_unit) {
                return (DecodedUnit::LoneSurrogate(code_unit), after_digits);
            }
            // Safe: not a surrogate, so it is a valid scalar value on its own.
            let c = char::from_u32(u32::from(code_unit)).unwrap_or('\u{FFFD}');
            return (DecodedUnit::Scalar(c), after_digits);
        }
        // Too close to the end for four hex digits: retain the literal
        // `\u` prefix as two characters.
        return (DecodedUnit::Scalar('\\'), backslash_next);
    }
    // Unknown escape character: retain the literal backslash; the byte
    // that follows it is then decoded normally on the next call.
    let _ = pos;
    (DecodedUnit::Scalar('\\'), backslash_next)
}

/// Reads exactly four ASCII hex digits starting at `pos`, stopping short of
/// `end`. Returns the parsed value and the offset just past the digits.
fn read_hex4(source: &impl ByteSource, pos: usize, end: usize) -> Option<(u16, usize)> {
    let mut value: u16 = 0;
    let mut cur = pos;
    for _ in 0..4 {
        if cur >= end {
            return None;
        }
        let b = source.byte_at(cur);
        let digit = (b as char).to_digit(16)?;
        value = value.checked_mul(16)?.checked_add(digit as u16)?;
        cur = source.advance(cur);
    }
    Some((value, cur))
}

fn skip_escape(source: &impl ByteSource, pos: usize, end: usize) -> usize {
    let (_, next) = decode_escape(source, pos, end);
    next
}

/// Decodes one UTF-8 scalar value starting at `pos`. Falls back to
/// U+FFFD and a one-byte advance for invalid lead bytes, so malformed
/// input never wedges the iterator.
fn decode_utf8_scalar(source: &impl ByteSource, pos: usize) -> (char, usize) {
    let lead = source.byte_at(pos);
    let Some(len) = utf8_len_from_lead(lead) else {
        return ('\u{FFFD}', source.advance(pos));
    };
    let mut buf = [0u8; 4];
    let mut cur = pos;
    for slot in buf.iter_mut().take(len) {
        *slot = source.byte_at(cur);
        cur = source.advance(cur);
    }
    match core::str::from_utf8(&buf[..len]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => (ch, cur),
            None => ('\u{FFFD}', source.advance(pos)),
        },
        Err(_) => ('\u{FFFD}', source.advance(pos)),
    }
}

fn utf8_advance(source: &impl ByteSource, pos: usize) -> usize {
    decode_utf8_scalar(source, pos).1
}

fn utf8_len_from_lead(b0: u8) -> Option<usize> {
    if b0 < 0x80 {
        Some(1)
    } else if (0xC2..=0xDF).contains(&b0) {
        Some(2)
    } else if (0xE0..=0xEF).contains(&b0) {
        Some(3)
    } else if (0xF0..=0xF4).contains(&b0) {
        Some(4)
    } else {
        None
    }
}
