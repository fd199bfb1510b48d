//! ChainMap: separate-chaining table over byte-string keys and values.
//!
//! Entries live in a `SlotMap` arena; each bucket holds the handle of its
//! chain head and each entry holds the handle of its successor. Resizing
//! relinks handles and never touches the arena, so key and value buffers
//! keep their addresses for as long as the entry lives.

use crate::config::{MapConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::{Buffer, Error, Result};
use crate::strategy::{BytewiseEq, KeyEq, KeyHasher, OneAtATime};
use core::fmt;
use core::mem::size_of;
use slotmap::{DefaultKey, SlotMap};
use tracing::{debug, trace, warn};

#[derive(Debug)]
struct Entry {
    key: Box<[u8]>,
    value: Box<[u8]>,
    next: Option<DefaultKey>,
}

type Buckets = Vec<Option<DefaultKey>>;

pub struct ChainMap<H = OneAtATime, E = BytewiseEq> {
    hasher: H,
    equality: E,
    buckets: Buckets, // chain heads; empty when uninitialized
    entries: SlotMap<DefaultKey, Entry>, // every linked entry, nothing else
    load_factor: f32,
}

#[inline]
fn slot_for(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

// Largest bucket array `alloc_buckets` will hand out on this thread.
#[cfg(test)]
thread_local! {
    static BUCKET_LIMIT: core::cell::Cell<Option<usize>> = const { core::cell::Cell::new(None) };
}

/// Makes every bucket array larger than `max` fail to allocate until the
/// returned guard is dropped. Test threads are isolated from each other.
#[cfg(test)]
pub(crate) fn limit_buckets(max: usize) -> BucketLimitGuard {
    BUCKET_LIMIT.with(|l| l.set(Some(max)));
    BucketLimitGuard
}

#[cfg(test)]
pub(crate) struct BucketLimitGuard;

#[cfg(test)]
impl Drop for BucketLimitGuard {
    fn drop(&mut self) {
        BUCKET_LIMIT.with(|l| l.set(None));
    }
}

fn alloc_buckets(capacity: usize) -> Result<Buckets> {
    #[cfg(test)]
    let request = match BUCKET_LIMIT.with(|l| l.get()) {
        // An impossible reservation yields a genuine `TryReserveError`.
        Some(max) if capacity > max => usize::MAX,
        _ => capacity,
    };
    #[cfg(not(test))]
    let request = capacity;

    let mut buckets = Buckets::new();
    buckets
        .try_reserve_exact(request)
        .map_err(|source| Error::AllocationFailure {
            what: Buffer::Buckets,
            bytes: capacity.saturating_mul(size_of::<Option<DefaultKey>>()),
            source,
        })?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

fn copy_bytes(bytes: &[u8], what: Buffer) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())
        .map_err(|source| Error::AllocationFailure {
            what,
            bytes: bytes.len(),
            source,
        })?;
    buf.extend_from_slice(bytes);
    Ok(buf)
}

impl ChainMap {
    /// Map with 16 buckets, load factor 0.75 and the default strategies.
    pub fn new() -> Self {
        Self {
            hasher: OneAtATime,
            equality: BytewiseEq,
            buckets: vec![None; DEFAULT_CAPACITY],
            entries: SlotMap::new(),
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Map with `capacity` buckets (0 selects the default) and default
    /// strategies.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::from_parts(
            MapConfig::resolve(capacity, DEFAULT_LOAD_FACTOR)?,
            OneAtATime,
            BytewiseEq,
        )
    }
}

impl Default for ChainMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E> ChainMap<H, E>
where
    H: KeyHasher,
    E: KeyEq,
{
    pub(crate) fn from_parts(config: MapConfig, hasher: H, equality: E) -> Result<Self> {
        let buckets = alloc_buckets(config.capacity)?;
        trace!(
            capacity = config.capacity,
            load_factor = config.load_factor,
            "map initialized"
        );
        Ok(Self {
            hasher,
            equality,
            buckets,
            entries: SlotMap::new(),
            load_factor: config.load_factor,
        })
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bucket count; 0 once destroyed.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn is_initialized(&self) -> bool {
        !self.buckets.is_empty()
    }

    /// Release every entry and the bucket array. Afterwards every operation
    /// except `init`, `destroy` and the accessors fails with
    /// `Error::Uninitialized`. Calling it on a destroyed map does nothing.
    pub fn destroy(&mut self) {
        if !self.is_initialized() {
            return;
        }
        trace!(size = self.len(), capacity = self.capacity(), "map destroyed");
        self.entries = SlotMap::new();
        self.buckets = Buckets::new();
        self.load_factor = 0.0;
    }

    /// (Re)initialize in place, keeping the strategies. Prior contents are
    /// dropped. If the bucket array cannot be allocated the map is left
    /// uninitialized; a rejected load factor leaves it untouched.
    pub fn init(&mut self, capacity: usize, load_factor: f32) -> Result<()> {
        let config = MapConfig::resolve(capacity, load_factor)?;
        self.destroy();
        self.buckets = alloc_buckets(config.capacity)?;
        self.load_factor = config.load_factor;
        trace!(
            capacity = config.capacity,
            load_factor = config.load_factor,
            "map initialized"
        );
        Ok(())
    }

    fn check_key(&self, key: &[u8]) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::Uninitialized);
        }
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(())
    }

    fn bucket_index(&self, key: &[u8]) -> usize {
        slot_for(self.hasher.hash(key), self.buckets.len())
    }

    fn find_in_chain(&self, index: usize, key: &[u8]) -> Option<DefaultKey> {
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            if entry.key.len() == key.len() && self.equality.equal(&entry.key, key) {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    /// Insert `key -> value`, or replace the value if the key is present.
    ///
    /// When occupancy has reached the load factor the bucket count doubles
    /// first. A failed growth is logged and the insert proceeds on the
    /// current table.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.check_key(key)?;

        let occupancy = self.len() as f32 / self.capacity() as f32;
        if occupancy >= self.load_factor {
            if let Err(err) = self.resize(self.capacity().saturating_mul(2)) {
                warn!(
                    capacity = self.capacity(),
                    size = self.len(),
                    %err,
                    "growing the map failed, continuing with longer chains"
                );
            }
        }

        let index = self.bucket_index(key);
        match self.find_in_chain(index, key) {
            Some(k) => {
                let value = copy_bytes(value, Buffer::Value)?;
                self.entries[k].value = value.into_boxed_slice();
            }
            None => {
                let key = copy_bytes(key, Buffer::Key)?.into_boxed_slice();
                let value = copy_bytes(value, Buffer::Value)?.into_boxed_slice();
                let next = self.buckets[index];
                let k = self.entries.insert(Entry { key, value, next });
                self.buckets[index] = Some(k);
            }
        }
        Ok(())
    }

    /// Copy of the value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.check_key(key)?;
        match self.find_in_chain(self.bucket_index(key), key) {
            Some(k) => copy_bytes(&self.entries[k].value, Buffer::LookupCopy).map(Some),
            None => Ok(None),
        }
    }

    /// Presence check that skips the value copy `get` makes.
    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        self.check_key(key)?;
        Ok(self.find_in_chain(self.bucket_index(key), key).is_some())
    }

    /// Unlink and drop the entry for `key`. Returns whether one existed.
    /// The bucket count never shrinks here.
    pub fn remove(&mut self, key: &[u8]) -> Result<bool> {
        self.check_key(key)?;
        let index = self.bucket_index(key);

        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            let next = entry.next;
            if entry.key.len() == key.len() && self.equality.equal(&entry.key, key) {
                match prev {
                    Some(p) => self.entries[p].next = next,
                    None => self.buckets[index] = next,
                }
                self.entries.remove(k);
                return Ok(true);
            }
            prev = Some(k);
            cursor = next;
        }
        Ok(false)
    }

    /// Rehash every entry into a fresh array of `new_capacity` buckets.
    ///
    /// Old buckets are walked in index order and each chain head to tail;
    /// every entry is pushed onto the head of its new chain. On failure the
    /// map is unchanged.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::Uninitialized);
        }
        if new_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        let mut buckets = alloc_buckets(new_capacity)?;

        for &head in &self.buckets {
            let mut cursor = head;
            while let Some(k) = cursor {
                let entry = &mut self.entries[k];
                cursor = entry.next;
                let index = slot_for(self.hasher.hash(&entry.key), new_capacity);
                entry.next = buckets[index];
                buckets[index] = Some(k);
            }
        }

        let from = core::mem::replace(&mut self.buckets, buckets).len();
        debug!(from, to = new_capacity, size = self.len(), "map resized");
        Ok(())
    }

    /// Check the structural invariants: every entry reachable from bucket
    /// `i` hashes to `i`, and the chains hold exactly the arena's entries.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut linked = 0;
        for (i, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(k) = cursor {
                let entry = &self.entries[k];
                assert_eq!(
                    slot_for(self.hasher.hash(&entry.key), self.buckets.len()),
                    i,
                    "entry linked into the wrong bucket"
                );
                linked += 1;
                cursor = entry.next;
            }
        }
        assert_eq!(linked, self.entries.len(), "size does not match chains");
    }

    #[cfg(test)]
    fn chain(&self, index: usize) -> Vec<&[u8]> {
        let mut keys = Vec::new();
        let mut cursor = self.buckets[index];
        while let Some(k) = cursor {
            keys.push(&*self.entries[k].key);
            cursor = self.entries[k].next;
        }
        keys
    }
}

impl<H, E> fmt::Debug for ChainMap<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainMap")
            .field("len", &self.entries.len())
            .field("capacity", &self.buckets.len())
            .field("load_factor", &self.load_factor)
            .finish_non_exhaustive()
    }
}
