//! The piece-table string (spec §4.I): a logical byte sequence represented
//! as an ordered list of immutable fragments. Implements the [`ByteSource`]
//! contract so the scanner can operate on an edited document without
//! re-serialising anything but the replaced range.
//!
//! Splicing never copies the text of a fragment that survives an edit: the
//! prefix and suffix fragments share the same backing allocation as the
//! piece-table being spliced, via [`alloc::rc::Rc`]. Only the replacement
//! text and, once, the very first adoption of a flat source into
//! piece-table form (see [`PieceTable::whole`]) are copied.

use alloc::{rc::Rc, vec::Vec};

use crate::{
    byte_source::ByteSource,
    byte_source::Sentinel,
    error::ScanError,
    path,
    path::PathComponent,
};

/// One contiguous, immutable slice of a piece-table's backing storage.
///
/// Invariant: a fragment is never empty and never itself wraps another
/// piece-table — nested piece-tables are flattened at construction time, so
/// every fragment is a direct view over a leaf byte buffer.
#[derive(Clone)]
struct Fragment {
    bytes: Rc<[u8]>,
    /// Start offset within `bytes` (inclusive).
    start: usize,
    /// End offset within `bytes` (exclusive).
    end: usize,
}

impl Fragment {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[self.start..self.end]
    }
}

/// A logical byte string composed of an ordered sequence of fragments.
///
/// Concatenating the fragments' slices yields the piece-table's full text.
/// [`PieceTable`] implements [`ByteSource`], so it can be re-parsed exactly
/// like a flat buffer: every handle, view, and path lookup in this crate
/// works unmodified against a spliced document.
#[derive(Clone)]
pub struct PieceTable {
    fragments: Vec<Fragment>,
    total_len: usize,
}

impl PieceTable {
    /// An empty piece-table (zero bytes).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            fragments: Vec::new(),
            total_len: 0,
        }
    }

    /// Wraps `bytes` as a single-fragment piece-table.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        if len == 0 {
            return Self::empty();
        }
        let rc: Rc<[u8]> = Rc::from(bytes.into_boxed_slice());
        Self {
            fragments: alloc::vec![Fragment {
                bytes: rc,
                start: 0,
                end: len,
            }],
            total_len: len,
        }
    }

    /// Copies the entire addressable range of any [`ByteSource`] into a new,
    /// single-fragment piece-table.
    ///
    /// This is the one allocation a flat source pays the first time it is
    /// adopted into piece-table form; every splice performed afterwards
    /// shares fragments structurally instead of copying.
    #[must_use]
    pub fn whole(source: &impl ByteSource) -> Self {
        let len = source.length();
        let mut buf = Vec::with_capacity(len);
        if len > 0 {
            source.copy_range(0, len - 1, &mut buf);
        }
        Self::from_bytes(buf)
    }

    /// The piece-table's full text, copied into one contiguous buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len);
        if self.total_len > 0 {
            self.copy_range(0, self.total_len - 1, &mut out);
        }
        out
    }

    /// Number of fragments currently making up this piece-table. Exposed for
    /// tests that assert structural sharing actually happened.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Locates the fragment index and within-fragment offset that logical
    /// offset `i` falls in, or `None` if `i` is past the end.
    fn locate(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.total_len {
            return None;
        }
        let mut acc = 0usize;
        for (idx, f) in self.fragments.iter().enumerate() {
            let flen = f.len();
            if i < acc + flen {
                return Some((idx, i - acc));
            }
            acc += flen;
        }
        None
    }

    fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let total_len = fragments.iter().map(Fragment::len).sum();
        Self {
            fragments,
            total_len,
        }
    }

    /// Appends the fragments covering the inclusive logical range
    /// `[start, end]` of `self` onto `out`, reusing the backing `Rc<[u8]>`
    /// of each contributing fragment rather than copying bytes.
    fn push_range_fragments(&self, start: usize, end: usize, out: &mut Vec<Fragment>) {
        if start > end {
            return;
        }
        let Some((fi0, off0)) = self.locate(start) else {
            return;
        };
        let mut fi = fi0;
        let mut off = off0;
        let mut remaining = end - start + 1;
        while remaining > 0 && fi < self.fragments.len() {
            let frag = &self.fragments[fi];
            let avail = frag.len() - off;
            let take = avail.min(remaining);
            if take > 0 {
                out.push(Fragment {
                    bytes: frag.bytes.clone(),
                    start: frag.start + off,
                    end: frag.start + off + take,
                });
            }
            remaining -= take;
            fi += 1;
            off = 0;
        }
    }

    /// Replaces the inclusive logical byte range `[start, end]` of `self`
    /// with `replacement`, returning a new piece-table. `self` is not
    /// modified; fragments outside the replaced range are shared, not
    /// copied (spec §4.I: "produce a new piece-table by structural
    /// sharing; originals are not modified").
    #[must_use]
    pub fn splice(&self, start: usize, end: usize, replacement: &PieceTable) -> Self {
        let mut fragments = Vec::new();
        if start > 0 {
            self.push_range_fragments(0, start - 1, &mut fragments);
        }
        for f in &replacement.fragments {
            if f.len() > 0 {
                fragments.push(f.clone());
            }
        }
        if end + 1 < self.total_len {
            self.push_range_fragments(end + 1, self.total_len - 1, &mut fragments);
        }
        Self::from_fragments(fragments)
    }
}

impl ByteSource for PieceTable {
    fn byte_at(&self, i: usize) -> u8 {
        match self.locate(i) {
            Some((fi, off)) => self.fragments[fi].as_slice()[off],
            None => Sentinel::Terminator.byte(),
        }
    }

    fn advance(&self, i: usize) -> usize {
        i + 1
    }

    fn length(&self) -> usize {
        self.total_len
    }

    fn try_as_slice(&self, start: usize, end: usize) -> Option<&[u8]> {
        if end < start {
            return Some(&[]);
        }
        let (fi0, off0) = self.locate(start)?;
        let (fi1, off1) = self.locate(end)?;
        if fi0 != fi1 {
            return None;
        }
        Some(&self.fragments[fi0].as_slice()[off0..=off1])
    }

    fn copy_range(&self, start: usize, end: usize, out: &mut Vec<u8>) {
        if start > end {
            return;
        }
        let Some((fi0, off0)) = self.locate(start) else {
            return;
        };
        let mut fi = fi0;
        let mut off = off0;
        let mut remaining = end - start + 1;
        out.reserve(remaining);
        while remaining > 0 && fi < self.fragments.len() {
            let frag = &self.fragments[fi];
            let avail = frag.len() - off;
            let take = avail.min(remaining);
            out.extend_from_slice(&frag.as_slice()[off..off + take]);
            remaining -= take;
            fi += 1;
            off = 0;
        }
    }
}

/// The high-level edit operation (spec §4.I, "High-level edit"): replaces
/// the value reached by walking `path` from `source`'s root with the
/// verbatim JSON bytes in `replacement`, producing a piece-table whose text
/// is `prefix ∥ replacement ∥ suffix`.
///
/// The result can be re-parsed with [`crate::handle::Handle::root`]; it is
/// itself a [`ByteSource`], so it can be spliced again.
pub fn splice_value<S: ByteSource>(
    source: &S,
    path: &[PathComponent<'_>],
    replacement: &[u8],
) -> Result<PieceTable, ScanError> {
    let handle = path::resolve_from_root(source, path).map_err(|e| ScanError::from_kind(source, e))?;
    let (start, end) = handle.byte_range(source)?;
    let whole = PieceTable::whole(source);
    let repl = PieceTable::from_bytes(replacement.to_vec());
    Ok(whole.splice(start, end, &repl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_source::StaticSource;

    #[test]
    fn splice_replaces_array_element() {
        let src = StaticSource::new(b"{\"a\":1,\"b\":[1,2,3]}".to_vec());
        let result = splice_value(&src, &[PathComponent::Key(b"b"), PathComponent::Index(2)], b"7").unwrap();
        assert_eq!(result.to_bytes(), b"{\"a\":1,\"b\":[1,7,3]}");
    }

    #[test]
    fn splice_identity_is_idempotent() {
        let src = StaticSource::new(b"{\"a\":1,\"b\":[1,2,3]}".to_vec());
        let handle = path::resolve_from_root(&src, &[PathComponent::Key(b"b")]).unwrap();
        let text = handle.as_text(&src).unwrap();
        let result = splice_value(&src, &[PathComponent::Key(b"b")], text.as_bytes()).unwrap();
        assert_eq!(result.to_bytes(), src.as_bytes());
    }

    #[test]
    fn re_splicing_a_piece_table_shares_fragments() {
        let src = StaticSource::new(b"[1,2,3]".to_vec());
        let first = splice_value(&src, &[PathComponent::Index(1)], b"100").unwrap();
        assert_eq!(first.to_bytes(), b"[100,2,3]");
        let second = splice_value(&first, &[PathComponent::Index(3)], b"300").unwrap();
        assert_eq!(second.to_bytes(), b"[100,2,300]");
        assert!(second.fragment_count() >= 3);
    }

    #[test]
    fn splice_on_empty_array_suffix() {
        let src = StaticSource::new(b"[1]".to_vec());
        let result = splice_value(&src, &[PathComponent::Index(1)], b"\"x\"").unwrap();
        assert_eq!(result.to_bytes(), b"[\"x\"]");
    }
}
