//! Error types produced while scanning, navigating, or converting JSON
//! values.
//!
//! Every failure mode named in the design is a variant of [`ScanErrorKind`];
//! [`ScanError`] wraps a kind with the line/column at which it occurred,
//! computed lazily (only when an error actually escapes to a caller) by
//! counting newlines in the source prefix.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::byte_source::ByteSource;

/// A JSON value kind, used to report what kind of target an inexact
/// conversion was attempted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberTarget {
    /// A fixed-width signed integer (`i64`, `i128`, ...).
    Integer,
    /// A 64-bit IEEE float.
    Float,
}

impl fmt::Display for NumberTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
        }
    }
}

/// The distinct failure modes a lazy read can raise.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScanErrorKind {
    /// A byte was found where a value could not begin.
    #[error("unexpected byte {found:#04x} at offset {offset}")]
    UnexpectedByte {
        /// Offset of the offending byte.
        offset: usize,
        /// The byte itself.
        found: u8,
    },
    /// A string token ran into the terminator sentinel before its closing
    /// quote.
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString {
        /// Offset of the opening quote.
        offset: usize,
    },
    /// A number token stopped on a byte that JSON number grammar requires to
    /// be followed by at least one more digit (a dangling sign, decimal
    /// point, or exponent marker).
    #[error("unterminated number starting at offset {offset}")]
    UnterminatedNumber {
        /// Offset of the first digit (or leading `-`).
        offset: usize,
    },
    /// An object lookup found no member with the given key.
    #[error("key not found: {0:?}")]
    KeyNotFound(String),
    /// An array index was out of bounds.
    #[error("index {index} out of range (length {length})")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of elements actually present.
        length: usize,
    },
    /// A number could not be represented exactly in the requested narrow
    /// type.
    #[error("value at offset {offset} does not fit in a {target}")]
    InexactConversion {
        /// Offset of the number's first byte.
        offset: usize,
        /// The type the caller asked to convert into.
        target: NumberTarget,
    },
    /// A streaming source has no more bytes buffered and has not yet seen
    /// the terminator sentinel. Never observed outside `streaming::pump`.
    #[error("input exhausted")]
    InputExhausted,
    /// The underlying stream backing a streaming source failed while being
    /// pumped for more bytes.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ScanErrorKind {
    /// The source offset this error is anchored to, when one applies.
    ///
    /// `None` for kinds that describe a whole-scan outcome rather than a
    /// single malformed byte (`KeyNotFound`, `IndexOutOfRange`,
    /// `InputExhausted`, `IoError`); [`ScanError::from_kind`] locates those
    /// at the start of the source instead of walking the buffer.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::UnexpectedByte { offset, .. }
            | Self::UnterminatedString { offset }
            | Self::UnterminatedNumber { offset }
            | Self::InexactConversion { offset, .. } => Some(offset),
            Self::KeyNotFound(_) | Self::IndexOutOfRange { .. } | Self::InputExhausted | Self::IoError(_) => None,
        }
    }
}

/// A [`ScanErrorKind`] located at a line and column within the source.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind} at {line}:{column}")]
pub struct ScanError {
    /// What went wrong.
    pub kind: ScanErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl ScanError {
    /// Builds a located error by counting newlines in `source[0..offset)`.
    ///
    /// This walk is only performed once an error is about to be returned to
    /// a caller; it is never done speculatively during scanning.
    #[must_use]
    pub fn locate(source: &impl ByteSource, offset: usize, kind: ScanErrorKind) -> Self {
        let mut line = 1usize;
        let mut column = 1usize;
        let mut i = 0usize;
        while i < offset {
            if source.byte_at(i) == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            i = source.advance(i);
        }
        Self { kind, line, column }
    }

    /// Builds a located error for the case where no single offset applies
    /// (e.g. an exhausted streaming source observed mid-pump).
    #[must_use]
    pub fn at_start(kind: ScanErrorKind) -> Self {
        Self {
            kind,
            line: 1,
            column: 1,
        }
    }

    /// Wraps `kind` for return across the public error boundary: locates it
    /// against `source` when it carries an offset, or anchors it at the
    /// start of the source otherwise. This is the conversion every public
    /// entry point applies to the `ScanErrorKind` its internal scan produced,
    /// so a caller always receives a value with `line`/`column` rather than
    /// the bare kind.
    #[must_use]
    pub fn from_kind(source: &impl ByteSource, kind: ScanErrorKind) -> Self {
        match kind.offset() {
            Some(offset) => Self::locate(source, offset, kind),
            None => Self::at_start(kind),
        }
    }
}
