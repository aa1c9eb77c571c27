//! Path resolution (spec §4.D): walking a sequence of key/index steps down
//! from a document's root to reach a nested value without materialising
//! any value along the way other than the one finally requested.

use alloc::string::String;

use crate::{byte_source::ByteSource, error::ScanErrorKind, handle::Handle};

/// One step of a path: either an object key or an array index.
#[derive(Debug, Clone, Copy)]
pub enum PathComponent<'a> {
    /// A member key to look up in an object.
    Key(&'a [u8]),
    /// A 1-based element index to look up in an array, per spec §4.D ("array
    /// index, 1-based") — the first element is `Index(1)`.
    Index(usize),
}

impl<'a> From<&'a str> for PathComponent<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key.as_bytes())
    }
}

impl From<usize> for PathComponent<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Resolves `path` against `root`, returning the handle of the value it
/// points to.
///
/// A key step against an array, or an index step against an object, is a
/// type mismatch; per the lookup contract this is reported the same way an
/// absent key would be (`KeyNotFound`), since both describe "this path does
/// not resolve to a value".
pub fn resolve<'a, S: ByteSource>(
    source: &'a S,
    root: Handle<'a, S>,
    path: &[PathComponent<'_>],
) -> Result<Handle<'a, S>, ScanErrorKind> {
    let mut current = root;
    for component in path {
        current = step(source, &current, component)?;
    }
    Ok(current)
}

/// Resolves a path starting from the document root.
pub fn resolve_from_root<'a, S: ByteSource>(
    source: &'a S,
    path: &[PathComponent<'_>],
) -> Result<Handle<'a, S>, ScanErrorKind> {
    resolve(source, Handle::root(source)?, path)
}

fn step<'a, S: ByteSource>(
    source: &'a S,
    current: &Handle<'a, S>,
    component: &PathComponent<'_>,
) -> Result<Handle<'a, S>, ScanErrorKind> {
    match component {
        PathComponent::Key(key) => match current.as_object() {
            Some(obj) => obj.get(key).map_err(|e| e.kind),
            None => Err(ScanErrorKind::KeyNotFound(describe_key_mismatch(key))),
        },
        PathComponent::Index(index) => match current.as_array() {
            Some(arr) => arr.get(*index).map_err(|e| e.kind),
            None => Err(ScanErrorKind::KeyNotFound(describe_index_mismatch(*index))),
        },
    }
}

fn describe_key_mismatch(key: &[u8]) -> String {
    let mut s = String::from("key step ");
    s.push_str(&String::from_utf8_lossy(key));
    s.push_str(" does not apply to a non-object value");
    s
}

fn describe_index_mismatch(index: usize) -> String {
    use core::fmt::Write;
    let mut s = String::new();
    let _ = write!(s, "index step {index} does not apply to a non-array value");
    s
}
