//! The array view (spec §4.E): lazy indexed access over a JSON array
//! token, built on [`scanner::next_element`].

use crate::{
    byte_source::ByteSource,
    error::{ScanError, ScanErrorKind},
    handle::Handle,
    scanner,
};

/// A lazy view over a JSON array value. `offset` is the array's opening
/// `[`.
#[derive(Clone, Copy)]
pub struct ArrayHandle<'a, S: ByteSource> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: ByteSource> ArrayHandle<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Self { source, offset }
    }

    /// Offset of the opening `[`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Iterates the array's elements in source order. Each step scans
    /// forward from the previous element's end, so iteration overall is
    /// linear in the array's size regardless of how many elements are
    /// visited.
    #[must_use]
    pub fn iter(&self) -> ArrayIter<'a, S> {
        ArrayIter {
            source: self.source,
            cur: self.offset,
            done: false,
        }
    }

    /// Returns the element at the 1-based `index` (spec §4.D/§4.H), scanning
    /// from the start of the array. Callers that need several indices
    /// should prefer [`Self::iter`] to avoid rescanning the prefix for each
    /// lookup.
    pub fn get(&self, index: usize) -> Result<Handle<'a, S>, ScanError> {
        self.try_get(index).map_err(|e| ScanError::from_kind(self.source, e))
    }

    fn try_get(&self, index: usize) -> Result<Handle<'a, S>, ScanErrorKind> {
        let mut seen = 0usize;
        for item in self.iter() {
            let (start, _end) = item?;
            seen += 1;
            if seen == index {
                return Handle::at(self.source, start);
            }
        }
        Err(ScanErrorKind::IndexOutOfRange {
            index,
            length: seen,
        })
    }

    /// The number of elements, which requires scanning the entire array.
    pub fn len(&self) -> Result<usize, ScanError> {
        let mut count = 0usize;
        for item in self.iter() {
            item.map_err(|e| ScanError::from_kind(self.source, e))?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether the array has no elements. Unlike [`Self::len`], this only
    /// needs to look at the first token after `[`.
    pub fn is_empty(&self) -> Result<bool, ScanError> {
        scanner::next_element(self.source, self.offset)
            .map(|next| next.is_none())
            .map_err(|e| ScanError::from_kind(self.source, e))
    }
}

/// Iterates the elements of an array, yielding each element's `(start,
/// end)` byte range.
pub struct ArrayIter<'a, S: ByteSource> {
    source: &'a S,
    cur: usize,
    done: bool,
}

impl<S: ByteSource> Iterator for ArrayIter<'_, S> {
    type Item = Result<(usize, usize), ScanErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match scanner::next_element(self.source, self.cur) {
            Ok(Some((start, end))) => {
                self.cur = end;
                Some(Ok((start, end)))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
