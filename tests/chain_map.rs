// ChainMap public-surface tests.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: get(K) returns a byte-identical copy of the last V put
//   under K, until K is removed.
// - Size: len() counts distinct keys; updates never double count.
// - Growth: crossing the load factor doubles the bucket count and loses
//   nothing.
// - Ownership: returned buffers are the caller's; mutating them never
//   reaches the map.
#![allow(clippy::approx_constant)]

use chain_hashmap::{ChainMap, Error, MapBuilder, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};

// Test: integer key to float value with defaults.
// Assumes: keys and values are stored as their native-endian bytes.
// Verifies: exact 8-byte round trip, removal, then not-found.
#[test]
fn int_key_float_value() {
    let mut m = MapBuilder::new().build().expect("defaults");
    assert_eq!(m.capacity(), DEFAULT_CAPACITY);
    assert_eq!(m.load_factor(), DEFAULT_LOAD_FACTOR);

    let key = 42i32.to_ne_bytes();
    let value = 3.14159f64.to_ne_bytes();
    m.insert(&key, &value).unwrap();

    let got = m.get(&key).unwrap().expect("present");
    assert_eq!(got.len(), 8);
    let got: [u8; 8] = got.as_slice().try_into().unwrap();
    assert_eq!(f64::from_ne_bytes(got), 3.14159);

    assert!(m.remove(&key).unwrap());
    assert_eq!(m.get(&key).unwrap(), None);
    assert!(m.is_empty());
}

// Test: NUL-terminated string key and value.
// Verifies: the terminator is part of the key; "hello" without it misses.
#[test]
fn string_key_string_value() {
    let mut m = ChainMap::new();
    m.insert(b"hello\0", b"world\0").unwrap();
    assert_eq!(m.get(b"hello\0").unwrap().as_deref(), Some(&b"world\0"[..]));
    assert_eq!(m.get(b"hello").unwrap(), None);
}

#[derive(Clone, Copy)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn to_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.x.to_ne_bytes());
        out[4..].copy_from_slice(&self.y.to_ne_bytes());
        out
    }
}

// Test: struct key.
// Assumes: the hasher puts every point in the same bucket, so only the
// equality check can tell keys apart.
// Verifies: identical bytes hit; different field values miss.
#[test]
fn struct_key_requires_equality_after_hash_match() {
    let mut m = MapBuilder::new()
        .hasher(|_: &[u8]| 0u64)
        .build()
        .unwrap();
    let p = Point { x: 10, y: 20 };
    m.insert(&p.to_bytes(), b"a point\0").unwrap();

    assert_eq!(
        m.get(&Point { x: 10, y: 20 }.to_bytes()).unwrap().as_deref(),
        Some(&b"a point\0"[..])
    );
    assert_eq!(m.get(&Point { x: 20, y: 10 }.to_bytes()).unwrap(), None);
    assert_eq!(m.get(&Point { x: 10, y: 21 }.to_bytes()).unwrap(), None);
}

// Test: natural growth.
// Assumes: 16 buckets and load factor 0.75 grow on the 13th insert.
// Verifies: capacity doubled (repeatedly) and every key still maps to its value.
#[test]
fn growth_keeps_all_keys() {
    let mut m = ChainMap::new();
    let n = 100u32;
    for i in 0..n {
        m.insert(&i.to_le_bytes(), &(i * 3).to_le_bytes()).unwrap();
        if i == 11 {
            assert_eq!(m.capacity(), 16);
        }
        if i == 12 {
            assert_eq!(m.capacity(), 32);
        }
    }
    assert_eq!(m.len(), n as usize);
    assert_eq!(m.capacity(), 256);
    for i in 0..n {
        assert_eq!(
            m.get(&i.to_le_bytes()).unwrap(),
            Some((i * 3).to_le_bytes().to_vec()),
            "key {i}"
        );
    }
}

// Test: heterogeneous keys and values in one map.
// Verifies: keys of different types and lengths coexist; sizes are exact.
#[test]
fn heterogeneous_entries() {
    let mut m = ChainMap::new();
    m.insert(&42i32.to_ne_bytes(), &3.14159f64.to_ne_bytes()).unwrap();
    m.insert(b"hello\0", b"world\0").unwrap();
    m.insert(&Point { x: 10, y: 20 }.to_bytes(), b"a point\0").unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(&42i32.to_ne_bytes()).unwrap().map(|v| v.len()), Some(8));
    assert_eq!(m.get(b"hello\0").unwrap().map(|v| v.len()), Some(6));
}

// Test: update semantics.
// Verifies: len unchanged by re-insert; only the latest value is visible,
// even when the new value has a different length.
#[test]
fn overwrite_keeps_size() {
    let mut m = ChainMap::new();
    m.insert(b"key", b"v1").unwrap();
    m.insert(b"key", b"a much longer second value").unwrap();
    m.insert(b"key", b"").unwrap();
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(b"key").unwrap(), Some(Vec::new()));
}

// Test: size accounting.
// Verifies: len == distinct inserts - successful removes; failed removes
// and duplicate inserts do not count.
#[test]
fn size_tracks_distinct_keys() {
    let mut m = ChainMap::new();
    for k in [&b"a"[..], b"b", b"a", b"c", b"b"] {
        m.insert(k, b"v").unwrap();
    }
    assert_eq!(m.len(), 3);
    assert!(m.remove(b"a").unwrap());
    assert!(!m.remove(b"a").unwrap());
    assert!(!m.remove(b"zzz").unwrap());
    assert_eq!(m.len(), 2);
}

// Test: ownership of returned buffers.
// Verifies: mutating the Vec from get() does not alter the stored value.
#[test]
fn returned_buffer_is_independent() {
    let mut m = ChainMap::new();
    m.insert(b"k", b"original").unwrap();
    let mut out = m.get(b"k").unwrap().unwrap();
    out[0] = b'X';
    out.push(b'!');
    assert_eq!(m.get(b"k").unwrap(), Some(b"original".to_vec()));
}

// Test: caller buffers are copied, not aliased.
// Verifies: changing the caller's key/value after insert changes nothing.
#[test]
fn inserted_buffers_are_copied() {
    let mut m = ChainMap::new();
    let mut key = b"key".to_vec();
    let mut value = b"value".to_vec();
    m.insert(&key, &value).unwrap();
    key[0] = b'K';
    value.clear();
    assert_eq!(m.get(b"key").unwrap(), Some(b"value".to_vec()));
    assert_eq!(m.get(&key).unwrap(), None);
}

// Test: error taxonomy at the public surface.
// Verifies: empty keys and destroyed maps are invalid arguments; not-found
// is Ok, never an error.
#[test]
fn invalid_arguments_and_not_found() {
    let mut m = ChainMap::new();
    let err = m.insert(b"", b"v").unwrap_err();
    assert!(matches!(err, Error::EmptyKey));
    assert!(err.is_invalid_argument());

    assert!(matches!(m.get(b"missing"), Ok(None)));
    assert!(matches!(m.remove(b"missing"), Ok(false)));

    m.destroy();
    assert!(matches!(m.get(b"k"), Err(Error::Uninitialized)));
}

// Test: lifecycle.
// Verifies: destroy empties and disables the map, init restores it with the
// same strategies.
#[test]
fn destroy_and_init_cycle() {
    let mut m = MapBuilder::new()
        .hasher(|k: &[u8]| u64::from(k[0]))
        .build()
        .unwrap();
    m.insert(b"k", b"v").unwrap();
    m.destroy();
    m.destroy();
    assert_eq!(m.capacity(), 0);
    assert!(matches!(m.insert(b"k", b"v"), Err(Error::Uninitialized)));

    m.init(8, 0.5).unwrap();
    assert_eq!((m.capacity(), m.load_factor()), (8, 0.5));
    m.insert(b"k", b"v2").unwrap();
    assert_eq!(m.get(b"k").unwrap(), Some(b"v2".to_vec()));
}

// Test: non-positive load factor and zero capacity take the defaults.
#[test]
fn builder_defaults_substituted() {
    let m = MapBuilder::new().capacity(0).load_factor(-3.0).build().unwrap();
    assert_eq!(m.capacity(), DEFAULT_CAPACITY);
    assert_eq!(m.load_factor(), DEFAULT_LOAD_FACTOR);
    assert!(matches!(
        MapBuilder::new().load_factor(f32::NAN).build(),
        Err(Error::InvalidLoadFactor(_))
    ));
}
