//! ChainedMap: separately chained hash table.
//!
//! Nodes live in a generational arena (`SlotMap`) and chains are singly
//! linked through arena keys, so a stale link can never resolve to a node
//! that replaced the one it pointed at. Each node stores the hash of its key;
//! rehashing relinks nodes using the stored value without calling the hash
//! adapter again.
//!
//! Load policy: before a new key is stored, if `len >= num_chains` the table
//! is rehashed into `num_chains * growth_factor` chains. Hence
//! `len <= num_chains` holds after every operation.

use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash::{DefaultHash, KeyHash};
use crate::map::{copy_key, StrIntMap};
use core::fmt;
use log::{debug, warn};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node {
    key: String,
    value: i32,
    hash: u64,
    next: Option<DefaultKey>,
}

pub struct ChainedMap<H = DefaultHash> {
    hasher: H,
    heads: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node>,
    config: MapConfig,
}

impl ChainedMap<DefaultHash> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHash::new())
    }
}

impl Default for ChainedMap<DefaultHash> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs, walking chains in bucket order.
pub struct Iter<'a, H> {
    map: &'a ChainedMap<H>,
    chain: usize,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, H> Iterator for Iter<'a, H> {
    type Item = (&'a str, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let node = self.map.nodes.get(k)?;
                self.cur = node.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((node.key.as_str(), node.value));
            }
            if self.chain >= self.map.heads.len() {
                return None;
            }
            self.cur = self.map.heads[self.chain];
            self.chain += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<H> ExactSizeIterator for Iter<'_, H> {}

fn empty_heads(n: usize) -> Result<Vec<Option<DefaultKey>>, MapError> {
    let mut heads = Vec::new();
    heads.try_reserve_exact(n)?;
    heads.resize(n, None);
    Ok(heads)
}

impl<H> ChainedMap<H>
where
    H: KeyHash,
{
    pub fn with_hasher(hasher: H) -> Self {
        let config = MapConfig::new();
        Self {
            hasher,
            heads: vec![None; config.initial_capacity],
            nodes: SlotMap::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// Creates an empty map, reporting invalid sizing or a failed initial
    /// allocation instead of aborting.
    pub fn try_with_config(config: MapConfig, hasher: H) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self {
            hasher,
            heads: empty_heads(config.initial_capacity)?,
            nodes: SlotMap::new(),
            config,
        })
    }

    pub fn num_chains(&self) -> usize {
        self.heads.len()
    }

    pub fn iter(&self) -> Iter<'_, H> {
        Iter {
            map: self,
            chain: 0,
            cur: None,
            remaining: self.nodes.len(),
        }
    }

    #[inline]
    fn chain_index(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    fn find(&self, hash: u64, key: &str) -> Option<DefaultKey> {
        let mut cur = self.heads[self.chain_index(hash)];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash && node.key == key {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Redistributes every node into a fresh head array. The array is
    /// allocated before any link changes, so failure leaves the table intact.
    fn rehash(&mut self) -> Result<(), MapError> {
        let old = self.heads.len();
        let new_chains = self.config.grown(old)?;
        let mut heads = empty_heads(new_chains).map_err(|e| {
            warn!("chained map rehash to {new_chains} chains failed: {e}");
            e
        })?;
        for (k, node) in self.nodes.iter_mut() {
            let i = (node.hash % new_chains as u64) as usize;
            node.next = heads[i];
            heads[i] = Some(k);
        }
        self.heads = heads;
        debug!(
            "chained map rehashed {} entries from {} to {} chains",
            self.nodes.len(),
            old,
            new_chains
        );
        Ok(())
    }
}

impl<H> StrIntMap for ChainedMap<H>
where
    H: KeyHash,
{
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn put(&mut self, key: &str, value: i32) -> Result<Option<i32>, MapError> {
        let hash = self.hasher.hash_key(key);
        if let Some(node) = self.find(hash, key).and_then(|k| self.nodes.get_mut(k)) {
            return Ok(Some(core::mem::replace(&mut node.value, value)));
        }

        let key = copy_key(key)?;
        // Arena room first: the insert below must not allocate.
        self.nodes.try_reserve(1)?;
        if self.nodes.len() >= self.heads.len() {
            self.rehash()?;
        }
        let i = self.chain_index(hash);
        let next = self.heads[i];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next,
        });
        self.heads[i] = Some(k);
        Ok(None)
    }

    fn get(&self, key: &str) -> Option<i32> {
        let hash = self.hasher.hash_key(key);
        let k = self.find(hash, key)?;
        self.nodes.get(k).map(|n| n.value)
    }

    fn contains_key(&self, key: &str) -> bool {
        let hash = self.hasher.hash_key(key);
        self.find(hash, key).is_some()
    }

    fn remove(&mut self, key: &str) -> Option<i32> {
        let hash = self.hasher.hash_key(key);
        let i = self.chain_index(hash);

        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.heads[i];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash && node.key == key {
                // Splice out before freeing the node.
                let next = node.next;
                match prev {
                    None => self.heads[i] = next,
                    Some(p) => self.nodes.get_mut(p)?.next = next,
                }
                return self.nodes.remove(k).map(|n| n.value);
            }
            prev = Some(k);
            cur = node.next;
        }
        None
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

impl<H> fmt::Debug for ChainedMap<H>
where
    H: KeyHash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<H> ChainedMap<H>
where
    H: KeyHash,
{
    /// Keys of one chain, head first.
    pub(crate) fn chain_keys(&self, chain: usize) -> Vec<&str> {
        let mut out = Vec::new();
        let mut cur = self.heads[chain];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            out.push(node.key.as_str());
            cur = node.next;
        }
        out
    }

    /// Panics unless every node sits in exactly the chain its hash selects
    /// and the load factor is at most one.
    pub(crate) fn assert_structure(&self) {
        let mut seen = 0usize;
        for chain in 0..self.heads.len() {
            let mut cur = self.heads[chain];
            while let Some(k) = cur {
                let node = self.nodes.get(k).expect("chain link resolves");
                assert_eq!(self.chain_index(node.hash), chain, "node in wrong chain");
                assert_eq!(node.hash, self.hasher.hash_key(&node.key), "stale stored hash");
                seen += 1;
                assert!(seen <= self.nodes.len(), "cycle or shared node in chains");
                cur = node.next;
            }
        }
        assert_eq!(seen, self.nodes.len(), "unreachable nodes");
        assert!(self.nodes.len() <= self.heads.len(), "load factor above one");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(_: &str) -> u64 {
        0
    }

    /// Invariant: a new map is empty with the default chain count.
    #[test]
    fn new_map_is_empty() {
        let m = ChainedMap::new();
        assert!(m.is_empty());
        assert_eq!(m.num_chains(), 100);
        assert_eq!(m.iter().len(), 0);
        m.assert_structure();
    }

    /// Invariant: inserts prepend to the chain the hash selects.
    #[test]
    fn insert_prepends_to_chain() {
        let mut m = ChainedMap::with_hasher(constant);
        m.put("a", 1).unwrap();
        m.put("b", 2).unwrap();
        m.put("c", 3).unwrap();
        assert_eq!(m.chain_keys(0), vec!["c", "b", "a"]);
        m.assert_structure();
    }

    /// Invariant: the table rehashes exactly when a new key arrives with
    /// `len == num_chains`, and every entry survives.
    #[test]
    fn rehash_at_load_factor_one() {
        let cfg = MapConfig::new().with_initial_capacity(4);
        let mut m = ChainedMap::try_with_config(cfg, DefaultHash::new()).unwrap();
        for i in 0..4 {
            m.put(&format!("k{i}"), i).unwrap();
        }
        assert_eq!(m.num_chains(), 4);
        // Overwrites never rehash.
        m.put("k0", 100).unwrap();
        assert_eq!(m.num_chains(), 4);
        m.put("k4", 4).unwrap();
        assert_eq!(m.num_chains(), 8);
        m.assert_structure();
        assert_eq!(m.get("k0"), Some(100));
        for i in 1..5 {
            assert_eq!(m.get(&format!("k{i}")), Some(i));
        }
    }

    /// Invariant: removal splices head, middle and tail nodes without
    /// orphaning the rest of the chain.
    #[test]
    fn remove_splices_head_middle_tail() {
        let mut m = ChainedMap::with_hasher(constant);
        for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            m.put(k, i as i32).unwrap();
        }
        assert_eq!(m.chain_keys(0), vec!["e", "d", "c", "b", "a"]);

        assert_eq!(m.remove("e"), Some(4)); // head
        assert_eq!(m.chain_keys(0), vec!["d", "c", "b", "a"]);
        assert_eq!(m.remove("c"), Some(2)); // middle
        assert_eq!(m.chain_keys(0), vec!["d", "b", "a"]);
        assert_eq!(m.remove("a"), Some(0)); // tail
        assert_eq!(m.chain_keys(0), vec!["d", "b"]);
        m.assert_structure();

        assert_eq!(m.remove("a"), None);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("d"), Some(3));
        assert_eq!(m.get("b"), Some(1));
    }

    /// Invariant: a slot freed by removal and reused by a new key is not
    /// reachable through the old key.
    #[test]
    fn reused_slot_does_not_alias_removed_key() {
        let mut m = ChainedMap::with_hasher(constant);
        m.put("old", 1).unwrap();
        m.remove("old");
        m.put("new", 2).unwrap();
        assert!(!m.contains_key("old"));
        assert_eq!(m.get("new"), Some(2));
        m.assert_structure();
    }

    /// Invariant: rehash failure (capacity overflow) leaves table and
    /// entries untouched.
    #[test]
    fn capacity_overflow_leaves_table_unchanged() {
        let cfg = MapConfig::new().with_initial_capacity(2).with_growth_factor(usize::MAX);
        let mut m = ChainedMap::try_with_config(cfg, DefaultHash::new()).unwrap();
        m.put("a", 1).unwrap();
        m.put("b", 2).unwrap();
        assert_eq!(
            m.put("c", 3),
            Err(MapError::CapacityOverflow { capacity: 2 })
        );
        assert_eq!(m.len(), 2);
        assert_eq!(m.num_chains(), 2);
        assert!(!m.contains_key("c"));
        m.assert_structure();
    }

    /// Invariant: a failed head-array reservation leaves the map unchanged.
    #[test]
    fn failed_reservation_leaves_table_unchanged() {
        let cfg = MapConfig::new()
            .with_initial_capacity(2)
            .with_growth_factor(usize::MAX / 2);
        let mut m = ChainedMap::try_with_config(cfg, DefaultHash::new()).unwrap();
        m.put("a", 1).unwrap();
        m.put("b", 2).unwrap();
        assert!(matches!(m.put("c", 3), Err(MapError::Alloc(_))));
        assert_eq!(m.len(), 2);
        assert_eq!(m.num_chains(), 2);
        assert_eq!(m.get("a"), Some(1));
        assert_eq!(m.get("b"), Some(2));
        m.assert_structure();
    }

    /// Invariant: node room is reserved fallibly before the table changes;
    /// a put that fails later (here in the rehash) keeps that room and
    /// stores nothing.
    #[test]
    fn node_room_reserved_before_rehash() {
        let cfg = MapConfig::new()
            .with_initial_capacity(1)
            .with_growth_factor(usize::MAX);
        let mut m = ChainedMap::try_with_config(cfg, DefaultHash::new()).unwrap();
        m.put("a", 1).unwrap();
        assert_eq!(
            m.put("b", 2),
            Err(MapError::CapacityOverflow { capacity: 1 })
        );
        assert_eq!(m.len(), 1);
        assert!(m.nodes.capacity() > m.nodes.len());
        assert!(!m.contains_key("b"));
        m.assert_structure();
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = MapConfig::new().with_initial_capacity(0);
        assert!(matches!(
            ChainedMap::try_with_config(cfg, DefaultHash::new()),
            Err(MapError::InvalidConfig(_))
        ));
    }

    /// Invariant: the iterator reports an exact length and visits every
    /// entry once across chains.
    #[test]
    fn iter_is_exact_across_chains() {
        let mut m = ChainedMap::with_hasher(|s: &str| s.len() as u64);
        for k in ["a", "bb", "cc", "ddd", "e"] {
            m.put(k, k.len() as i32).unwrap();
        }
        let it = m.iter();
        assert_eq!(it.len(), 5);
        let mut seen: Vec<&str> = it.map(|(k, _)| k).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "bb", "cc", "ddd", "e"]);
    }
}
