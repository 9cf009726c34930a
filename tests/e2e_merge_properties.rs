//! Property-based tests for the merge rules.
//!
//! Values are generated over scalars, typed lists, typed maps and shallow
//! bags; the Skip-Set is the production default.

use bi_ready::{merge_property, Bag, Error, List, Map, SkipSet, Value, ValueType};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        Just("id".to_string()),
        Just("speckle_type".to_string()),
        Just("elements".to_string()),
    ]
}

fn bag() -> impl Strategy<Value = Bag> {
    prop::collection::vec((key(), scalar()), 0..6).prop_map(|pairs| pairs.into_iter().collect::<Bag>())
}

fn string_list() -> impl Strategy<Value = List> {
    prop::collection::vec("[a-z]{0,4}", 0..5).prop_map(|items| List::of(ValueType::String, items))
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar(),
        string_list().prop_map(Value::List),
        bag().prop_map(Value::Bag),
        prop::collection::vec(("[a-z]{1,4}", scalar()), 0..4).prop_map(|entries| {
            let mut map = Map::new(ValueType::Any);
            for (k, v) in entries {
                map.upsert(k, v);
            }
            Value::Map(map)
        }),
    ]
}

proptest! {
    #[test]
    fn null_source_is_identity(target in value(), key in "[a-z]{1,6}") {
        let mut bag = Bag::new().with(key.clone(), target.clone());
        merge_property(&mut bag, &key, &Value::Null, &SkipSet::default()).unwrap();
        prop_assert_eq!(bag.get(&key), Some(&target));
    }

    #[test]
    fn absent_target_adopts_source(source in value(), key in "[a-z]{1,6}") {
        let skip = SkipSet::default();
        prop_assume!(!skip.contains(&key));
        let mut bag = Bag::new();
        merge_property(&mut bag, &key, &source, &skip).unwrap();
        prop_assert_eq!(bag.get(&key), Some(&source));
    }

    #[test]
    fn bag_merge_never_copies_skipped_keys(target in bag(), source in bag()) {
        let skip = SkipSet::default();
        let mut holder = Bag::new().with("nested", target.clone());
        merge_property(&mut holder, "nested", &Value::Bag(source.clone()), &skip).unwrap();

        let merged = holder.get("nested").and_then(Value::as_bag).unwrap();
        for (key, value) in merged.iter() {
            if skip.contains(key) {
                prop_assert_eq!(target.get(key), Some(value));
            } else if let Some(from_source) = source.get(key) {
                prop_assert_eq!(from_source, value);
            } else {
                prop_assert_eq!(target.get(key), Some(value));
            }
        }
        for key in target.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    #[test]
    fn string_lists_append_in_order(target in string_list(), source in string_list()) {
        let mut holder = Bag::new().with("l", target.clone());
        merge_property(&mut holder, "l", &Value::List(source.clone()), &SkipSet::default()).unwrap();

        let mut expected = target.items.clone();
        expected.extend(source.items.iter().cloned());
        prop_assert_eq!(holder.get("l").and_then(Value::as_list).map(|l| &l.items), Some(&expected));
    }

    #[test]
    fn reserved_keys_are_never_written(source in scalar()) {
        let skip = SkipSet::default();
        let mut bag = Bag::new().with("id", "original");
        let result = merge_property(&mut bag, "id", &source, &skip);
        prop_assert!(matches!(result, Err(Error::ReservedKey(_))));
        prop_assert_eq!(bag.get_str("id"), Some("original"));
    }
}
