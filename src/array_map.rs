//! ArrayMap: unsorted flat storage with linear-scan lookup.
//!
//! Lookup is O(n). Each entry carries the hash of its key, computed once at
//! insert, and the scan compares hashes before bytes; the hash never selects
//! a slot. Growth multiplies the logical capacity by the configured factor
//! when the array is full, reserving the new room fallibly before anything
//! is stored.

use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash::{DefaultHash, KeyHash};
use crate::map::{copy_key, StrIntMap};
use core::fmt;
use log::{debug, warn};

#[derive(Debug)]
struct Entry {
    key: String,
    value: i32,
    hash: u64,
}

pub struct ArrayMap<H = DefaultHash> {
    hasher: H,
    entries: Vec<Entry>,
    // Logical slot count; `entries` always has at least this much room.
    capacity: usize,
    config: MapConfig,
}

impl ArrayMap<DefaultHash> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHash::new())
    }
}

impl Default for ArrayMap<DefaultHash> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs of an `ArrayMap`.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i32);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (e.key.as_str(), e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<H> ArrayMap<H>
where
    H: KeyHash,
{
    pub fn with_hasher(hasher: H) -> Self {
        let config = MapConfig::new();
        Self {
            hasher,
            entries: Vec::with_capacity(config.initial_capacity),
            capacity: config.initial_capacity,
            config,
        }
    }

    /// Creates an empty map, reporting invalid sizing or a failed initial
    /// allocation instead of aborting.
    pub fn try_with_config(config: MapConfig, hasher: H) -> Result<Self, MapError> {
        config.validate()?;
        let mut entries = Vec::new();
        entries.try_reserve_exact(config.initial_capacity)?;
        Ok(Self {
            hasher,
            entries,
            capacity: config.initial_capacity,
            config,
        })
    }

    /// Number of entries the map can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.entries.iter(),
        }
    }

    fn position(&self, hash: u64, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key == key)
    }

    fn grow(&mut self) -> Result<(), MapError> {
        let new_capacity = self.config.grown(self.capacity)?;
        let additional = new_capacity - self.entries.len();
        self.entries.try_reserve_exact(additional).map_err(|e| {
            warn!("array map growth to {new_capacity} slots failed: {e}");
            MapError::from(e)
        })?;
        debug!(
            "array map grew from {} to {} slots",
            self.capacity, new_capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<H> StrIntMap for ArrayMap<H>
where
    H: KeyHash,
{
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn put(&mut self, key: &str, value: i32) -> Result<Option<i32>, MapError> {
        let hash = self.hasher.hash_key(key);
        if let Some(i) = self.position(hash, key) {
            let old = core::mem::replace(&mut self.entries[i].value, value);
            return Ok(Some(old));
        }

        let key = copy_key(key)?;
        if self.entries.len() == self.capacity {
            self.grow()?;
        }
        self.entries.push(Entry { key, value, hash });
        Ok(None)
    }

    fn get(&self, key: &str) -> Option<i32> {
        let hash = self.hasher.hash_key(key);
        self.position(hash, key).map(|i| self.entries[i].value)
    }

    fn contains_key(&self, key: &str) -> bool {
        let hash = self.hasher.hash_key(key);
        self.position(hash, key).is_some()
    }

    fn remove(&mut self, key: &str) -> Option<i32> {
        let hash = self.hasher.hash_key(key);
        let i = self.position(hash, key)?;
        // Order is unspecified, so the last entry may fill the hole.
        Some(self.entries.swap_remove(i).value)
    }

    fn for_each<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a str, i32),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }
}

impl<H> fmt::Debug for ArrayMap<H>
where
    H: KeyHash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
