// ChainedHashMap property tests against a std::collections model, driven
// through the public API only.
//
// Property: for any op sequence over a small key universe, the map agrees
// with std::collections::HashMap on every get, every delete result, len,
// and the full traversal contents; dynamic maps additionally keep the
// load-factor bound and only ever double their table.
use chained_hashmap::ChainedHashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

fn run_ops(
    map: &mut ChainedHashMap<String, i32>,
    ops: Vec<(u8, usize, i32)>,
    keys: usize,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for (op, raw_k, v) in ops {
        let key = format!("k{}", raw_k % keys);
        match op {
            // Set: both sides take the write.
            0 => {
                map.set(key.clone(), v).expect("allocation succeeds in tests");
                model.insert(key, v);
            }
            // Get: results agree, including misses.
            1 => {
                prop_assert_eq!(map.get(key.as_str()), model.get(&key));
            }
            // Delete: removed values agree, including double deletes.
            _ => {
                prop_assert_eq!(map.delete(key.as_str()), model.remove(&key));
            }
        }
        prop_assert_eq!(map.len(), model.len());
    }

    // Final traversal must reproduce the model exactly.
    let mut seen: HashMap<String, i32> = HashMap::new();
    map.traverse(|k, v| {
        prop_assert!(seen.insert(k.clone(), *v).is_none(), "entry visited twice");
        Ok(())
    })?;
    prop_assert_eq!(seen, model);
    Ok(())
}

proptest! {
    #[test]
    fn prop_default_map_matches_model(
        keys in 1usize..=6,
        ops in proptest::collection::vec((0u8..=2, 0usize..100, any::<i32>()), 1..120),
    ) {
        let mut map: ChainedHashMap<String, i32> = ChainedHashMap::new();
        run_ops(&mut map, ops, keys)?;
    }

    #[test]
    fn prop_static_map_matches_model(
        keys in 1usize..=6,
        ops in proptest::collection::vec((0u8..=2, 0usize..100, any::<i32>()), 1..120),
    ) {
        let mut map: ChainedHashMap<String, i32> =
            ChainedHashMap::with_buckets(3).expect("nonzero bucket count");
        run_ops(&mut map, ops, keys)?;
        // Static maps never resize, no matter the workload.
        prop_assert_eq!(map.bucket_count(), 3);
    }

    #[test]
    fn prop_dynamic_map_matches_model(
        keys in 1usize..=8,
        ops in proptest::collection::vec((0u8..=2, 0usize..100, any::<i32>()), 1..120),
    ) {
        let initial = 2usize;
        let factor = 1.0f64;
        let mut map: ChainedHashMap<String, i32> =
            ChainedHashMap::with_growth(initial, factor).expect("valid growth config");
        run_ops(&mut map, ops, keys)?;

        let count = map.bucket_count();
        prop_assert!(count % initial == 0 && (count / initial).is_power_of_two());
        prop_assert!(map.len() as f64 <= count as f64 * factor);
    }
}
