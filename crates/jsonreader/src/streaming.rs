//! The streaming adaptor (spec §4.J): wraps a blocking [`std::io::Read`]
//! source with a growing, append-only byte buffer so the same scanner that
//! operates on a complete document can also operate on one still arriving
//! over I/O.
//!
//! The buffer's sentinel byte is [`Sentinel::MoreInputExpected`] until the
//! stream reports end-of-file, at which point it flips to
//! [`Sentinel::Terminator`]. A scanner call that reaches the "more input
//! expected" sentinel raises [`ScanErrorKind::InputExhausted`]; [`pump`]
//! catches that signal, reads more bytes, and retries.
//!
//! [`pump`]: StreamingSource::pump

use alloc::{string::ToString, vec::Vec};
use std::io::Read;

use crate::{
    byte_source::{ByteSource, Sentinel},
    error::{ScanError, ScanErrorKind},
    options::ReaderOptions,
};

/// An append-only byte buffer fed incrementally from a reader.
///
/// Implements [`ByteSource`] directly, so every scanner routine, handle, and
/// view in this crate operates on a `StreamingSource` exactly as it would on
/// a [`crate::byte_source::StaticSource`] — the only difference is that
/// reads past the currently-buffered data raise `InputExhausted` instead of
/// reaching the terminator sentinel, and [`Self::pump`] is the retry loop
/// that resolves that signal.
pub struct StreamingSource<R> {
    reader: R,
    buf: Vec<u8>,
    eof: bool,
    chunk_size: usize,
}

impl<R: Read> StreamingSource<R> {
    /// Wraps `reader` with default [`ReaderOptions`].
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Wraps `reader`, pre-allocating and sizing reads per `options`.
    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(options.streaming_initial_capacity),
            eof: false,
            chunk_size: options.streaming_chunk_size.max(1),
        }
    }

    /// Whether the underlying stream has reported end-of-file. Once true,
    /// `byte_at` past the buffered data returns the terminator sentinel
    /// rather than `MoreInputExpected`, and `pump` will never block again.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.eof
    }

    /// Runs the idempotent, side-effect-free function `f` against the
    /// buffered bytes so far; if it fails with `InputExhausted`, reads more
    /// bytes from the stream and retries from `f`'s original start offset.
    ///
    /// `f` must return an owned value that does not borrow from the
    /// `StreamingSource` it was given — it is re-invoked from scratch on
    /// every retry, exactly as the spec requires ("f must be safe to
    /// re-execute from its original start offset").
    ///
    /// `f` itself stays `ScanErrorKind`-typed so its body can compose
    /// directly with the rest of this crate's internal, pump-embeddable
    /// functions (`Handle::root`, `path::resolve_from_root`, ...); `pump`
    /// converts the final, non-retryable error to the located [`ScanError`]
    /// at the public boundary.
    pub fn pump<T>(&mut self, f: impl Fn(&Self) -> Result<T, ScanErrorKind>) -> Result<T, ScanError> {
        loop {
            match f(self) {
                Ok(v) => return Ok(v),
                Err(ScanErrorKind::InputExhausted) => {
                    self.fill_more().map_err(|e| ScanError::from_kind(self, e))?;
                }
                Err(e) => return Err(ScanError::from_kind(self, e)),
            }
        }
    }

    /// Reads one more chunk from the underlying stream, extending the
    /// buffer or flipping the sentinel to `Terminator` on end-of-file.
    ///
    /// Only reachable while `!self.eof`: once the sentinel flips to
    /// `Terminator`, scanner routines that run off the buffered data report
    /// their ordinary malformed-input errors (`UnexpectedByte`,
    /// `UnterminatedString`, ...) instead of `InputExhausted`, so `pump`
    /// never re-enters this method after end-of-file.
    fn fill_more(&mut self) -> Result<(), ScanErrorKind> {
        debug_assert!(!self.eof);
        let mut chunk = alloc::vec![0u8; self.chunk_size];
        let n = self
            .reader
            .read(&mut chunk)
            .map_err(|e| ScanErrorKind::IoError(e.to_string()))?;
        if n == 0 {
            self.eof = true;
        } else {
            self.buf.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }
}

impl<R> ByteSource for StreamingSource<R> {
    fn byte_at(&self, i: usize) -> u8 {
        if i < self.buf.len() {
            self.buf[i]
        } else if self.eof {
            Sentinel::Terminator.byte()
        } else {
            Sentinel::MoreInputExpected.byte()
        }
    }

    fn advance(&self, i: usize) -> usize {
        i + 1
    }

    fn length(&self) -> usize {
        self.buf.len()
    }

    fn try_as_slice(&self, start: usize, end: usize) -> Option<&[u8]> {
        if end < start {
            return Some(&[]);
        }
        if end < self.buf.len() {
            Some(&self.buf[start..=end])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handle::Handle, path, path::PathComponent};

    /// A `Read` impl that yields its input in fixed-size chunks, to exercise
    /// the pump/retry loop deterministically.
    struct ChunkedReader<'a> {
        remaining: &'a [u8],
        chunk: usize,
    }

    impl Read for ChunkedReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.remaining.len().min(self.chunk).min(buf.len());
            buf[..n].copy_from_slice(&self.remaining[..n]);
            self.remaining = &self.remaining[n..];
            Ok(n)
        }
    }

    #[test]
    fn pump_resolves_value_split_across_chunks() {
        let doc = br#"{"id":1296269,"owner":{"login":"oct"}}"#;
        let reader = ChunkedReader {
            remaining: doc,
            chunk: 10,
        };
        let mut source = StreamingSource::new(reader);

        let id = source
            .pump(|src| {
                let h = path::resolve_from_root(src, &[PathComponent::Key(b"id")])?;
                match h {
                    Handle::Number(n) => Ok(n.to_i64()?),
                    _ => unreachable!(),
                }
            })
            .unwrap();
        assert_eq!(id, 1_296_269);

        let login = source
            .pump(|src| {
                let h = path::resolve_from_root(
                    src,
                    &[PathComponent::Key(b"owner"), PathComponent::Key(b"login")],
                )?;
                match h {
                    Handle::String(s) => Ok(s.to_decoded_string_lossy()),
                    _ => unreachable!(),
                }
            })
            .unwrap();
        assert_eq!(login, "oct");
    }
}
