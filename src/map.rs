//! The contract shared by every storage strategy.

use crate::error::MapError;

/// A map from owned string keys to `i32` values.
///
/// Implementations differ only in storage and complexity; every observable
/// behavior below holds for all of them.
///
/// - `put` copies the key; the caller keeps its buffer.
/// - A failing `put` leaves the map exactly as it was.
/// - `get` and `remove` report a missing key with `None`.
/// - Traversal order is unspecified.
pub trait StrIntMap {
    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Associates `value` with `key`, returning the previous value if the
    /// key was already present.
    fn put(&mut self, key: &str, value: i32) -> Result<Option<i32>, MapError>;

    fn get(&self, key: &str) -> Option<i32>;

    fn contains_key(&self, key: &str) -> bool;

    /// Removes `key`, returning its value; a missing key is a no-op.
    fn remove(&mut self, key: &str) -> Option<i32>;

    /// Calls `visit` once per entry.
    fn for_each<'a, F>(&'a self, visit: F)
    where
        F: FnMut(&'a str, i32);

    /// Every key, borrowed from the map's own copies.
    fn keys(&self) -> Result<Vec<&str>, MapError> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.len())?;
        self.for_each(|k, _| out.push(k));
        Ok(out)
    }
}

/// Entry count of a possibly absent map; `None` counts as empty.
pub fn size<M>(map: Option<&M>) -> usize
where
    M: StrIntMap,
{
    map.map_or(0, |m| m.len())
}

/// Fallible copy of a caller's key into a map-owned `String`.
pub(crate) fn copy_key(key: &str) -> Result<String, MapError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned)
}
