//! chain-hashmap: a single-threaded, separate-chaining hash map whose keys
//! and values are opaque byte strings.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: store values of arbitrary, non-uniform types by their raw byte
//!   representation, with amortized O(1) insert, lookup and removal.
//! - Layers:
//!   - `strategy`: `KeyHasher` (bytes -> u64) and `KeyEq` (bytes, bytes ->
//!     bool), defaulting to Jenkins' one-at-a-time hash and byte-wise
//!     comparison. Closures implement both traits.
//!   - `config`: default sizing constants, the substitution rules for
//!     "unset" parameters and the typed `MapBuilder`.
//!   - `chain_map`: the table itself. A bucket array of chain heads plus a
//!     `SlotMap` arena of entries linked through `next` handles.
//!
//! Constraints
//! - Single-threaded: no locking; wrap the whole map in one lock if it has
//!   to be shared.
//! - The map always copies. Callers keep ownership of the slices they pass
//!   in and own the `Vec<u8>` every successful `get` returns.
//! - Keys must be non-empty. Keys of different lengths never compare equal;
//!   `KeyEq` is only consulted for keys of the same length.
//!
//! Growth
//! - An insert that observes `len / capacity >= load_factor` doubles the
//!   bucket count before placing its key. Growth failure is not an error
//!   for the insert: it is logged with `tracing::warn!` and the insert
//!   continues on the current table with longer chains.
//! - Resizing relinks arena handles only. Entries, and the key and value
//!   buffers they own, are never reallocated or copied.
//! - Removal never shrinks the table.
//!
//! Lifecycle
//! - `destroy` releases every entry and the bucket array and leaves the map
//!   uninitialized; operations then fail with `Error::Uninitialized` until
//!   `init` is called. Dropping the map releases everything as well.
//!
//! Notes and non-goals
//! - No iteration, persistence or shrinking on removal.
//! - `OneAtATime` is unseeded: digests are identical across processes,
//!   which also means it offers no protection against crafted collisions.

pub mod chain_map;
mod chain_map_proptest;
pub mod config;
pub mod error;
pub mod strategy;

// Public surface
pub use chain_map::ChainMap;
pub use config::{MapBuilder, MapConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::{Buffer, Error, Result};
pub use strategy::{BytewiseEq, KeyEq, KeyHasher, OneAtATime};
