//! simap: a map from owned string keys to `i32` values with two
//! interchangeable storage strategies behind one contract.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one small, precise contract (`StrIntMap`) that a frequency
//!   counter or similar client can program against, with the storage
//!   strategy chosen at construction.
//! - Strategies:
//!   - ArrayMap<H>: unsorted flat array, linear-scan lookup (O(n)). Each
//!     entry keeps its key's hash, used only to skip byte comparisons.
//!   - ChainedMap<H>: separately chained hash table. Nodes live in a
//!     generational arena; chains link nodes by arena key. Rehashes into
//!     `growth_factor` times as many chains once `len >= num_chains`.
//!
//! Constraints
//! - Single-threaded; mutation requires `&mut self`, so callers serialize
//!   concurrent access themselves.
//! - `put` copies the key; the map owns every stored key and frees each
//!   exactly once on removal or drop.
//! - Growth is all-or-nothing: new storage is reserved fallibly before any
//!   entry moves, so a failing `put` leaves the map unchanged and reports
//!   `MapError`.
//! - `get`/`remove` return `None` for a missing key.
//! - Traversal order is unspecified.
//!
//! Hash adapters
//! - Any `Fn(&str) -> u64` is a `KeyHash`. `DefaultHash` (seeded) and
//!   `Hash29` (polynomial) are provided. Maps stay correct under a
//!   constant hash, only slower.
//! - The hash of a key is computed once at insert and stored; rehashing
//!   reuses the stored value.
//!
//! Notes and non-goals
//! - No ordering guarantees, no concurrent access, no shrinking.
//! - The `tally` module and the `bike_count` binary are thin clients of the
//!   contract, not part of it.

pub mod array_map;
pub mod chained_map;
mod chained_map_proptest;
pub mod config;
pub mod error;
pub mod hash;
pub mod map;
pub mod tally;

// Public surface
pub use array_map::ArrayMap;
pub use chained_map::ChainedMap;
pub use config::MapConfig;
pub use error::{MapError, TallyError};
pub use hash::{DefaultHash, Hash29, KeyHash};
pub use map::{size, StrIntMap};
