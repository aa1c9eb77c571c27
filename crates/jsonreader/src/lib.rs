//! A lazy, zero-copy-where-possible reader for complete JSON documents.
//!
//! Given a JSON document held in a contiguous byte buffer (or, with the
//! `std` feature, arriving incrementally over I/O), this crate exposes its
//! values through small `(source, offset)` handles instead of building a
//! tree of heap-allocated nodes. Navigating into an array or object scans
//! only as far as the access requires; numbers and strings are parsed or
//! decoded only when a caller asks for a concrete representation.
//!
//! ```
//! use jsonreader::{value, StaticSource, Handle};
//!
//! let source = StaticSource::new(br#"{"foo": [1, 2, 3, "four"]}"#.to_vec());
//! let root = value(&source).unwrap();
//! let foo = root.as_object().unwrap().get(b"foo").unwrap();
//! let fourth = foo.as_array().unwrap().get(4).unwrap();
//! match fourth {
//!     Handle::String(s) => assert_eq!(s.to_decoded_string_lossy(), "four"),
//!     _ => unreachable!(),
//! }
//! ```
#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod array;
pub mod byte_source;
pub mod charclass;
pub mod error;
pub mod handle;
pub mod number;
pub mod object;
pub mod options;
pub mod path;
pub mod piece_table;
pub mod scanner;
pub mod string;

#[cfg(feature = "std")]
pub mod streaming;

#[cfg(test)]
mod tests;

pub use array::{ArrayHandle, ArrayIter};
pub use byte_source::{BorrowedSource, ByteSource, OwnedSource, Sentinel, StaticSource};
pub use error::{NumberTarget, ScanError, ScanErrorKind};
pub use handle::Handle;
pub use number::{Number, NumberHandle};
pub use object::{MemberItem, ObjectHandle, ObjectIter};
pub use options::ReaderOptions;
pub use path::{resolve, resolve_from_root, PathComponent};
pub use piece_table::{splice_value, PieceTable};
pub use string::{CharsIter, StringHandle};

#[cfg(feature = "std")]
pub use streaming::StreamingSource;

/// Constructs the root handle of the document held by `source`, per spec §6
/// (`value(source) -> Handle | Bool | Null`). `Bool` and `Null` are
/// represented as [`Handle::Bool`] and [`Handle::Null`] rather than as
/// separate types, since they carry no further navigable structure.
///
/// On failure, carries the line/column of the offending byte: see
/// [`ScanError`]. Code that drives this scan from inside a streaming
/// `StreamingSource::pump` should call [`Handle::root`] directly instead, so
/// a recoverable `InputExhausted` stays a bare [`ScanErrorKind`] for the
/// pump's retry loop to match on.
pub fn value<S: ByteSource>(source: &S) -> Result<Handle<'_, S>, ScanError> {
    Handle::root(source).map_err(|kind| ScanError::from_kind(source, kind))
}

/// Constructs the handle reached by walking `path` from `source`'s root, per
/// spec §6 (`value(source, path) -> Handle | Bool | Null`).
///
/// On failure, carries the line/column of the offending byte: see
/// [`ScanError`]. Code embedding this lookup inside a streaming
/// `StreamingSource::pump` should call [`resolve_from_root`] directly
/// instead, for the same reason as [`value`].
pub fn value_at_path<'a, S: ByteSource>(
    source: &'a S,
    path: &[PathComponent<'_>],
) -> Result<Handle<'a, S>, ScanError> {
    resolve_from_root(source, path).map_err(|kind| ScanError::from_kind(source, kind))
}
