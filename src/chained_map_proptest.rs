#![cfg(test)]

// Structural property tests for ChainedMap kept inside the crate so they can
// inspect chains directly.

use crate::chained_map::ChainedMap;
use crate::config::MapConfig;
use crate::hash::{Hash29, KeyHash};
use crate::map::StrIntMap;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations shrink toward earlier keys and shorter lists.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            1 => idx.clone().prop_map(Op::Remove),
            1 => idx.prop_map(Op::Get),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run<H: KeyHash>(mut sut: ChainedMap<H>, pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let prev = sut.put(&pool[i], v).expect("small puts succeed");
                prop_assert_eq!(prev, model.insert(pool[i].clone(), v));
            }
            Op::Remove(i) => {
                prop_assert_eq!(sut.remove(&pool[i]), model.remove(&pool[i]));
            }
            Op::Get(i) => {
                prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]).copied());
            }
        }
        // Every node sits in the chain its hash selects; load factor <= 1.
        sut.assert_structure();
        prop_assert_eq!(sut.len(), model.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Starts at one chain so nearly every scenario rehashes several times.
    #[test]
    fn prop_chains_stay_consistent((pool, ops) in arb_scenario()) {
        let cfg = MapConfig::new().with_initial_capacity(1);
        let sut = ChainedMap::try_with_config(cfg, Hash29).unwrap();
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_chains_stay_consistent_with_collisions((pool, ops) in arb_scenario()) {
        let cfg = MapConfig::new().with_initial_capacity(2).with_growth_factor(3);
        let sut = ChainedMap::try_with_config(cfg, |_: &str| 42u64).unwrap();
        run(sut, &pool, ops)?;
    }
}
