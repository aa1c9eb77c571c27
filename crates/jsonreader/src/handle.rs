//! The value handle (spec §4.D/§6): the entry point that dispatches a
//! `(source, offset)` pair to the appropriate lazy view.

use alloc::{string::String, vec::Vec};

use crate::{
    array::ArrayHandle,
    byte_source::ByteSource,
    error::{ScanError, ScanErrorKind},
    number::NumberHandle,
    object::ObjectHandle,
    scanner,
    string::StringHandle,
};

/// A lazily-dispatched JSON value, anchored at the offset of its first
/// byte.
pub enum Handle<'a, S: ByteSource> {
    /// `null`, at the given offset.
    Null(usize),
    /// `true` or `false`, at the given offset.
    Bool(usize, bool),
    /// A lazily-parsed number.
    Number(NumberHandle<'a, S>),
    /// A lazily-decoded string.
    String(StringHandle<'a, S>),
    /// A lazily-iterated array.
    Array(ArrayHandle<'a, S>),
    /// A lazily-iterated object.
    Object(ObjectHandle<'a, S>),
}

impl<'a, S: ByteSource> Handle<'a, S> {
    /// Dispatches the byte at `offset` to the matching value variant. This
    /// is the sole way a `Handle` is constructed; every other API in this
    /// crate that hands back a nested value funnels through here.
    pub fn at(source: &'a S, offset: usize) -> Result<Self, ScanErrorKind> {
        match source.byte_at(offset) {
            b'{' => Ok(Self::Object(ObjectHandle::new(source, offset))),
            b'[' => Ok(Self::Array(ArrayHandle::new(source, offset))),
            b'"' => Ok(Self::String(StringHandle::new(source, offset)?)),
            b'-' | b'0'..=b'9' => Ok(Self::Number(NumberHandle::new(source, offset)?)),
            b't' => Ok(Self::Bool(offset, true)),
            b'f' => Ok(Self::Bool(offset, false)),
            b'n' => Ok(Self::Null(offset)),
            found => Err(ScanErrorKind::UnexpectedByte { offset, found }),
        }
    }

    /// Parses the complete document held by `source`, starting from its
    /// first non-whitespace byte.
    pub fn root(source: &'a S) -> Result<Self, ScanErrorKind> {
        let start = scanner::skip_whitespace(source, 0);
        Self::at(source, start)
    }

    /// Offset of this value's first byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Null(o) | Self::Bool(o, _) => *o,
            Self::Number(n) => n.offset(),
            Self::String(s) => s.offset(),
            Self::Array(a) => a.offset(),
            Self::Object(o) => o.offset(),
        }
    }

    /// The verbatim JSON text of this value, byte for byte.
    pub fn as_text(&self, source: &S) -> Result<String, ScanError> {
        let (start, end) = self.byte_range(source)?;
        let mut out = Vec::new();
        source.copy_range(start, end, &mut out);
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// The inclusive `[start, end]` byte range of this value's verbatim
    /// JSON text within `source`.
    pub fn byte_range(&self, source: &S) -> Result<(usize, usize), ScanError> {
        match self {
            Self::Null(o) => Ok((*o, *o + 3)),
            Self::Bool(o, true) => Ok((*o, *o + 3)),
            Self::Bool(o, false) => Ok((*o, *o + 4)),
            Self::Number(n) => Ok((n.offset(), n.end_offset())),
            Self::String(s) => Ok((s.offset(), s.end_offset())),
            Self::Array(a) => Ok((
                a.offset(),
                scanner::end_of_collection(source, a.offset()).map_err(|e| ScanError::from_kind(source, e))?,
            )),
            Self::Object(o) => Ok((
                o.offset(),
                scanner::end_of_collection(source, o.offset()).map_err(|e| ScanError::from_kind(source, e))?,
            )),
        }
    }

    /// Returns `Some` when this handle is an array, for array-shaped path
    /// navigation.
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayHandle<'a, S>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `Some` when this handle is an object, for keyed path
    /// navigation.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectHandle<'a, S>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}
