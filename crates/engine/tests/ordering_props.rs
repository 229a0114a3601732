//! Property tests for collection listing order

use proptest::prelude::*;
use schooldesk_engine::{fields, Direction, Store};
use serde_json::{json, Value};
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn listing_order_is_total_and_reversible(created in prop::collection::vec(0u64..5, 0..12)) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();
        let homework = store.homework();

        for (i, ts) in created.iter().enumerate() {
            let data = match json!({"title": "t", "createdAt": ts}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
            homework.doc(&format!("d{:02}", i)).unwrap().set(data).unwrap();
        }

        let desc = homework.order_by(fields::CREATED_AT, Direction::Descending).get();
        prop_assert_eq!(desc.len(), created.len());

        let keys: Vec<(u64, String)> = desc
            .iter()
            .map(|d| (d.data()[fields::CREATED_AT].as_u64().unwrap(), d.id().to_string()))
            .collect();
        for pair in keys.windows(2) {
            // Newest first; equal timestamps keep id order
            prop_assert!(pair[0].0 > pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }

        let asc = homework.order_by(fields::CREATED_AT, Direction::Ascending).get();
        let mut reversed = desc.ids();
        reversed.reverse();
        prop_assert_eq!(asc.ids(), reversed);
    }
}
