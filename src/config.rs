//! Construction-time configuration: defaults, substitution rules and the
//! typed builder.

use crate::chain_map::ChainMap;
use crate::error::{Error, Result};
use crate::strategy::{BytewiseEq, KeyEq, KeyHasher, OneAtATime};

/// Bucket count used when the caller asks for 0.
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor used when the caller passes a value `<= 0`.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Resolved sizing parameters of a map.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub capacity: usize,
    pub load_factor: f32,
}

impl MapConfig {
    /// Apply the substitution rules: a capacity of 0 becomes
    /// `DEFAULT_CAPACITY` and a load factor `<= 0` becomes
    /// `DEFAULT_LOAD_FACTOR`. NaN and infinite load factors are rejected.
    pub fn resolve(capacity: usize, load_factor: f32) -> Result<Self> {
        if !load_factor.is_finite() {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        Ok(Self {
            capacity: if capacity == 0 {
                DEFAULT_CAPACITY
            } else {
                capacity
            },
            load_factor: if load_factor <= 0.0 {
                DEFAULT_LOAD_FACTOR
            } else {
                load_factor
            },
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

/// Builder for `ChainMap`.
///
/// Strategies left unset fall back to `OneAtATime` and `BytewiseEq`:
///
/// ```
/// use chain_hashmap::MapBuilder;
///
/// let mut map = MapBuilder::new()
///     .capacity(4)
///     .load_factor(0.5)
///     .equality(|a: &[u8], b: &[u8]| a.eq_ignore_ascii_case(b))
///     .hasher(|k: &[u8]| k.iter().map(|b| u64::from(b.to_ascii_lowercase())).sum::<u64>())
///     .build()
///     .unwrap();
/// map.insert(b"Key", b"v").unwrap();
/// assert_eq!(map.get(b"KEY").unwrap().as_deref(), Some(&b"v"[..]));
/// ```
#[derive(Debug)]
pub struct MapBuilder<H = OneAtATime, E = BytewiseEq> {
    capacity: usize,
    load_factor: f32,
    hasher: H,
    equality: E,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            capacity: 0,
            load_factor: 0.0,
            hasher: OneAtATime,
            equality: BytewiseEq,
        }
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, E> MapBuilder<H, E>
where
    H: KeyHasher,
    E: KeyEq,
{
    /// Initial bucket count; 0 selects the default.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Occupancy ratio at which an insert doubles the bucket count; values
    /// `<= 0` select the default.
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn hasher<H2: KeyHasher>(self, hasher: H2) -> MapBuilder<H2, E> {
        MapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            hasher,
            equality: self.equality,
        }
    }

    pub fn equality<E2: KeyEq>(self, equality: E2) -> MapBuilder<H, E2> {
        MapBuilder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            hasher: self.hasher,
            equality,
        }
    }

    pub fn build(self) -> Result<ChainMap<H, E>> {
        let config = MapConfig::resolve(self.capacity, self.load_factor)?;
        ChainMap::from_parts(config, self.hasher, self.equality)
    }
}
