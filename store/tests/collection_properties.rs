//! Algebraic properties of the normalized collection.

use proptest::prelude::*;
use roster_store::{IdMap, Skill};
use std::collections::BTreeSet;

fn skill_strategy() -> impl Strategy<Value = Skill> {
    (0i64..32, 0i64..4, "[a-z]{1,8}")
        .prop_map(|(id, version, name)| Skill::new(0, name).persisted(id, version))
}

fn collection_strategy() -> impl Strategy<Value = IdMap<Skill>> {
    prop::collection::vec(skill_strategy(), 0..16)
        .prop_filter_map("list with ids", |records| IdMap::from_list(records).ok())
}

proptest! {
    #[test]
    fn insert_then_remove_equals_remove(map in collection_strategy(), record in skill_strategy()) {
        let inserted = map.with_element(record.clone())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(inserted.without_element(&record), map.without_element(&record));
    }

    #[test]
    fn insert_stores_record_and_keeps_others(map in collection_strategy(), record in skill_strategy()) {
        let id = record.id.unwrap_or_default();
        let inserted = map.with_element(record.clone())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(inserted.get(id), Some(&record));
        for other in map.ids().filter(|other| *other != id) {
            prop_assert_eq!(inserted.get(other), map.get(other));
        }
        let mut expected: Vec<_> = map.ids().collect();
        if !map.contains(id) {
            expected.push(id);
        }
        prop_assert_eq!(inserted.ids().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn from_list_keys_are_the_record_ids(records in prop::collection::vec(skill_strategy(), 0..16)) {
        let map = IdMap::from_list(records.clone())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let expected: BTreeSet<i64> = records.iter().filter_map(|r| r.id).collect();
        let keys: BTreeSet<i64> = map.ids().collect();
        prop_assert_eq!(keys, expected.clone());
        prop_assert_eq!(map.len(), expected.len());
    }

    #[test]
    fn from_list_ignores_input_order(records in prop::collection::vec(skill_strategy(), 0..16)) {
        // Reversing changes which duplicate wins, so compare distinct-id inputs only.
        let mut seen = BTreeSet::new();
        let distinct: Vec<_> = records
            .into_iter()
            .filter(|r| seen.insert(r.id))
            .collect();
        let reversed: Vec<_> = distinct.iter().rev().cloned().collect();

        let forward = IdMap::from_list(distinct).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let backward = IdMap::from_list(reversed).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn remove_is_idempotent(map in collection_strategy(), id in 0i64..32) {
        let once = map.without_id(id);
        prop_assert_eq!(once.without_id(id), once.clone());
        prop_assert!(!once.contains(id));
    }
}
