//! The object view (spec §4.E): lazy keyed access over a JSON object
//! token, built on [`scanner::next_member`] and [`scanner::find_key_from`].

use crate::{
    byte_source::ByteSource,
    error::{ScanError, ScanErrorKind},
    handle::Handle,
    scanner,
    string::StringHandle,
};

/// A lazy view over a JSON object value. `offset` is the object's opening
/// `{`.
#[derive(Clone, Copy)]
pub struct ObjectHandle<'a, S: ByteSource> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: ByteSource> ObjectHandle<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Self { source, offset }
    }

    /// Offset of the opening `{`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Iterates the object's members in source order, including repeated
    /// keys. Callers that need "last key wins" semantics should use
    /// [`Self::get`]; this iterator reports every occurrence.
    #[must_use]
    pub fn iter(&self) -> ObjectIter<'a, S> {
        ObjectIter {
            source: self.source,
            cur: self.offset,
            done: false,
        }
    }

    /// Looks up `key`, scanning the whole object so that a repeated key
    /// correctly shadows earlier occurrences (the last one wins).
    pub fn get(&self, key: &[u8]) -> Result<Handle<'a, S>, ScanError> {
        self.try_get(key).map_err(|e| ScanError::from_kind(self.source, e))
    }

    fn try_get(&self, key: &[u8]) -> Result<Handle<'a, S>, ScanErrorKind> {
        let mut found = None;
        for member in self.iter() {
            let member = member?;
            if scanner::key_matches(self.source, &member.raw, key) {
                found = Some(member.value_start);
            }
        }
        match found {
            Some(start) => Handle::at(self.source, start),
            None => Err(ScanErrorKind::KeyNotFound(lossy_key(key))),
        }
    }

    /// Looks up `key` starting the scan from `start` (this object's `{` or
    /// a previously located member's value end) and stopping at the first
    /// match, per the amortised-positional-access contract: callers reading
    /// fields in roughly the order they were written can avoid rescanning
    /// the object from the top for every field.
    ///
    /// This does *not* honour "last key wins" if `key` repeats after
    /// `start`; use [`Self::get`] when shadowing correctness matters more
    /// than avoiding a rescan.
    pub fn get_from(&self, start: usize, key: &[u8]) -> Result<Handle<'a, S>, ScanError> {
        let found = scanner::find_key_from(self.source, start, key)
            .map_err(|e| ScanError::from_kind(self.source, e))?;
        match found {
            Some(value_start) => {
                Handle::at(self.source, value_start).map_err(|e| ScanError::from_kind(self.source, e))
            }
            None => Err(ScanError::from_kind(
                self.source,
                ScanErrorKind::KeyNotFound(lossy_key(key)),
            )),
        }
    }

    /// Whether the object has no members.
    pub fn is_empty(&self) -> Result<bool, ScanError> {
        scanner::next_member(self.source, self.offset)
            .map(|next| next.is_none())
            .map_err(|e| ScanError::from_kind(self.source, e))
    }
}

fn lossy_key(key: &[u8]) -> alloc::string::String {
    alloc::string::String::from_utf8_lossy(key).into_owned()
}

/// One member yielded by [`ObjectHandle::iter`].
pub struct MemberItem<'a, S: ByteSource> {
    source: &'a S,
    raw: scanner::Member,
}

impl<'a, S: ByteSource> MemberItem<'a, S> {
    /// The member's key as a lazy string view.
    #[must_use]
    pub fn key(&self) -> StringHandle<'a, S> {
        StringHandle::from_scanned(
            self.source,
            self.raw.key_quote_start,
            self.raw.key_quote_end,
            self.raw.key_has_escape,
        )
    }

    /// The member's value, dispatched to the appropriate handle variant.
    pub fn value(&self) -> Result<Handle<'a, S>, ScanError> {
        Handle::at(self.source, self.raw.value_start).map_err(|e| ScanError::from_kind(self.source, e))
    }

    /// Offset of the value's last byte, for resuming iteration manually.
    #[must_use]
    pub fn value_end(&self) -> usize {
        self.raw.value_end
    }
}

/// Iterates the members of an object in source order.
pub struct ObjectIter<'a, S: ByteSource> {
    source: &'a S,
    cur: usize,
    done: bool,
}

impl<'a, S: ByteSource> Iterator for ObjectIter<'a, S> {
    type Item = Result<MemberItem<'a, S>, ScanErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match scanner::next_member(self.source, self.cur) {
            Ok(Some(member)) => {
                self.cur = member.value_end;
                Some(Ok(MemberItem {
                    source: self.source,
                    raw: member,
                }))
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
