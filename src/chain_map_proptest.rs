#![cfg(test)]

// Property tests for ChainMap kept inside the crate so they can check the
// private structural invariants after every operation.

use crate::chain_map::ChainMap;
use crate::config::MapBuilder;
use crate::strategy::{KeyEq, KeyHasher};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, Vec<u8>),
    Get(usize),
    Contains(usize),
    Remove(usize),
    Resize(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<Op>)> {
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..=6), 1..=12).prop_flat_map(
        |pool| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                4 => (idx.clone(), proptest::collection::vec(any::<u8>(), 0..=8))
                    .prop_map(|(i, v)| Op::Insert(i, v)),
                2 => idx.clone().prop_map(Op::Get),
                1 => idx.clone().prop_map(Op::Contains),
                2 => idx.clone().prop_map(Op::Remove),
                1 => (1usize..=40).prop_map(Op::Resize),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
        },
    )
}

// Runs `ops` against the map and a std HashMap model.
// Invariants checked after every op:
// - bucket invariant: each entry sits in the bucket its hash selects;
// - size equals the number of linked entries and the model's key count;
// - get/contains/remove agree with the model;
// - an insert doubles the bucket count iff it observed len/capacity >=
//   load_factor, otherwise the bucket count is unchanged.
// Forced resizes are skipped unless `allow_resize` is set.
fn run<H: KeyHasher, E: KeyEq>(
    sut: &mut ChainMap<H, E>,
    pool: &[Vec<u8>],
    ops: Vec<Op>,
    allow_resize: bool,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = &pool[i];
                let cap_before = sut.capacity();
                let occupancy = sut.len() as f32 / cap_before as f32;
                sut.insert(k, &v).expect("insert");
                model.insert(k.clone(), v);
                if occupancy >= sut.load_factor() {
                    prop_assert_eq!(sut.capacity(), cap_before * 2);
                } else {
                    prop_assert_eq!(sut.capacity(), cap_before);
                }
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k).expect("get"), model.get(k).cloned());
            }
            Op::Contains(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.contains_key(k).expect("contains"), model.contains_key(k));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k).expect("remove"), model.remove(k).is_some());
            }
            Op::Resize(_) if !allow_resize => {}
            Op::Resize(cap) => {
                sut.resize(cap).expect("resize");
                prop_assert_eq!(sut.capacity(), cap);
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }

    // Everything the model holds is still reachable with its last value.
    for (k, v) in &model {
        let got = sut.get(k).expect("get");
        prop_assert_eq!(got.as_ref(), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut = MapBuilder::new().capacity(2).build().unwrap();
        run(&mut sut, &pool, ops, true)?;
    }

    // Growth rule only: without forced resizes the capacity is always the
    // initial one times a power of two.
    #[test]
    fn prop_natural_growth(
        (pool, ops) in arb_scenario(),
        cap in 1usize..=8,
        lf in prop_oneof![Just(0.25f32), Just(0.5f32), Just(0.75f32), Just(1.0f32), Just(2.0f32)],
    ) {
        let mut sut = MapBuilder::new().capacity(cap).load_factor(lf).build().unwrap();
        run(&mut sut, &pool, ops, false)?;
        let ratio = sut.capacity() / cap;
        prop_assert!(ratio.is_power_of_two() && sut.capacity() % cap == 0);
    }
}

// Every key collides, stressing chain walks, head unlinking and equality.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut = MapBuilder::new()
            .capacity(2)
            .hasher(|_: &[u8]| 7u64)
            .build()
            .unwrap();
        run(&mut sut, &pool, ops, true)?;
    }
}
