#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// structural invariants that need access to the private table.

use crate::hash::KeyStrategy;
use crate::map::ChainedHashMap;
use core::cmp::Ordering;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Get(usize),
    Delete(usize),
    Traverse,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            idx.clone().prop_map(OpI::Get),
            idx.clone().prop_map(OpI::Delete),
            Just(OpI::Traverse),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives a random op sequence against the map and a std::collections
// model, asserting after every op:
// - get/delete parity with the model;
// - `len` equals the sum of all chain lengths (the entry counter never
//   drifts from the structure);
// - traverse visits exactly the model's key set.
fn check_against_model<S>(
    map: &mut ChainedHashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: KeyStrategy<String> + KeyStrategy<str>,
{
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let key = pool[i].clone();
                map.set(key.clone(), v)
                    .expect("allocation does not fail in tests");
                model.insert(key, v);
            }
            OpI::Get(i) => {
                let key = &pool[i];
                prop_assert_eq!(map.get(key.as_str()), model.get(key));
            }
            OpI::Delete(i) => {
                let key = &pool[i];
                prop_assert_eq!(map.delete(key.as_str()), model.remove(key));
            }
            OpI::Traverse => {
                let mut seen: HashMap<String, i32> = HashMap::new();
                map.traverse(|k, v| {
                    // Each live entry is visited exactly once.
                    prop_assert!(seen.insert(k.clone(), *v).is_none());
                    Ok(())
                })?;
                prop_assert_eq!(&seen, &model);
            }
        }

        prop_assert_eq!(map.len(), model.len());
        prop_assert_eq!(map.is_empty(), model.is_empty());
        let chain_sum: usize = map.chain_lengths().iter().sum();
        prop_assert_eq!(chain_sum, map.len(), "entry counter drifted from chains");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Property: model equivalence in default (fixed, built-in size) mode.
    #[test]
    fn prop_default_mode_matches_model((pool, ops) in arb_scenario()) {
        let mut map: ChainedHashMap<String, i32> = ChainedHashMap::new();
        check_against_model(&mut map, &pool, ops)?;
    }

    // Property: model equivalence with a tiny fixed table, which forces
    // heavy chaining through the modulo reduction alone.
    #[test]
    fn prop_static_mode_matches_model((pool, ops) in arb_scenario()) {
        let mut map: ChainedHashMap<String, i32> =
            ChainedHashMap::with_buckets(2).expect("nonzero bucket count");
        check_against_model(&mut map, &pool, ops)?;
        prop_assert_eq!(map.bucket_count(), 2);
    }

    // Property: model equivalence in dynamic mode, plus the growth
    // invariants: the table length is always `initial * 2^k` and the
    // load-factor bound holds whenever the map is quiescent after a set.
    #[test]
    fn prop_dynamic_mode_matches_model((pool, ops) in arb_scenario()) {
        let initial = 2usize;
        let factor = 0.75f64;
        let mut map: ChainedHashMap<String, i32> =
            ChainedHashMap::with_growth(initial, factor).expect("valid growth config");
        check_against_model(&mut map, &pool, ops)?;

        let count = map.bucket_count();
        prop_assert!(count % initial == 0 && (count / initial).is_power_of_two(),
            "bucket count {} is not a doubling of {}", count, initial);
        prop_assert!(map.len() as f64 <= count as f64 * factor);
    }
}

// Worst-case collision variant: a constant hash piles every key into one
// chain, so correctness rests entirely on key comparison and linear scan.
#[derive(Copy, Clone)]
struct ConstHash;

impl KeyStrategy<String> for ConstHash {
    fn hash(&self, _key: &String, _seed: u32) -> u32 {
        0
    }
    fn compare(&self, a: &String, b: &String) -> Ordering {
        a.cmp(b)
    }
}

impl KeyStrategy<str> for ConstHash {
    fn hash(&self, _key: &str, _seed: u32) -> u32 {
        0
    }
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Property: the same model equivalence holds under total collision.
    #[test]
    fn prop_collisions_match_model((pool, ops) in arb_scenario()) {
        let mut map: ChainedHashMap<String, i32, ConstHash> =
            ChainedHashMap::with_buckets_and_strategy(4, ConstHash).expect("nonzero bucket count");
        check_against_model(&mut map, &pool, ops)?;
    }
}
