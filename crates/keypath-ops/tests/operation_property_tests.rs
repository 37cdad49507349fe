use keypath_ops::{ErrorKind, OperationEngine};
use keypath_test_utils::{setup_test_engine, TestFile};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn key_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,3}", 1..4).prop_map(|segments| segments.join("."))
}

/// rename(old, new) reproduced as get + remove + add on a second copy
fn rename_by_hand(engine: &OperationEngine, file: &TestFile, old: &str, new: &str) -> Result<(), ErrorKind> {
    if old == new {
        return Err(ErrorKind::SameKey);
    }
    let value = engine.get_key(file.path(), old).map_err(|e| e.kind())?;
    if engine.key_exists(file.path(), new).map_err(|e| e.kind())? {
        return Err(ErrorKind::KeyExists);
    }
    let before = file.read_bytes();
    engine.remove_key(file.path(), old).map_err(|e| e.kind())?;
    if let Err(err) = engine.add_key(file.path(), new, value) {
        file.write_external(std::str::from_utf8(&before).unwrap());
        return Err(err.kind());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_then_get_returns_value(path in key_path(), v in value()) {
        let file = TestFile::with_json(&json!({}));
        let engine = setup_test_engine();

        engine.add_key(file.path(), &path, v.clone()).unwrap();
        prop_assert_eq!(engine.get_key(file.path(), &path).unwrap(), v);
    }

    #[test]
    fn add_on_existing_path_never_writes(path in key_path(), v in value()) {
        let file = TestFile::with_json(&json!({}));
        let engine = setup_test_engine();
        engine.add_key(file.path(), &path, json!("first")).unwrap();
        let before = file.read_bytes();

        let err = engine.add_key(file.path(), &path, v).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::KeyExists);
        prop_assert_eq!(file.read_bytes(), before);
    }

    #[test]
    fn rename_matches_get_remove_add(
        doc in prop::collection::btree_map("[a-c]{1,2}", value(), 1..5),
        old in key_path(),
        new in key_path(),
    ) {
        let doc = Value::Object(doc.into_iter().collect());
        let renamed = TestFile::with_json(&doc);
        let by_hand = TestFile::with_json(&doc);
        let engine = setup_test_engine();

        let outcome = engine
            .rename_key(renamed.path(), &old, &new)
            .map_err(|e| e.kind());
        let expected = rename_by_hand(&engine, &by_hand, &old, &new);

        prop_assert_eq!(outcome, expected);
        prop_assert_eq!(renamed.read_json(), by_hand.read_json());
    }

    #[test]
    fn list_keys_returns_object_keys(keys in prop::collection::btree_set("[a-z]{1,5}", 0..8)) {
        let object: serde_json::Map<String, Value> =
            keys.iter().map(|k| (k.clone(), json!(1))).collect();
        let file = TestFile::with_json(&json!({"target": object}));
        let engine = setup_test_engine();

        let mut listed = engine.list_keys(file.path(), Some("target")).unwrap();
        listed.sort();
        prop_assert_eq!(listed, keys.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn literal_root_key_wins_for_lookup_operations() {
    let file = TestFile::with_json(&json!({"a.b": "literal", "a": {"b": "nested"}}));
    let engine = setup_test_engine();

    assert_eq!(engine.get_key(file.path(), "a.b").unwrap(), json!("literal"));
    assert!(engine.key_exists(file.path(), "a.b").unwrap());

    engine.update_key(file.path(), "a.b", json!("changed")).unwrap();
    assert_eq!(
        file.read_json(),
        json!({"a.b": "changed", "a": {"b": "nested"}})
    );

    assert_eq!(engine.remove_key(file.path(), "a.b").unwrap(), json!("changed"));
    assert_eq!(file.read_json(), json!({"a": {"b": "nested"}}));
}

#[test]
fn literal_root_key_wins_for_listing() {
    let file = TestFile::with_json(&json!({"x.y": {"from": "literal"}, "x": {"y": {"from": "nested"}}}));
    let engine = setup_test_engine();

    assert_eq!(engine.list_keys(file.path(), Some("x.y")).unwrap(), vec!["from"]);
    assert_eq!(engine.get_key(file.path(), "x.y.from").unwrap(), json!("nested"));
}

#[test]
fn add_always_splits() {
    let file = TestFile::with_json(&json!({"a.b": 1}));
    let engine = setup_test_engine();

    // The literal key answers lookups, so the split path is reported as taken.
    let err = engine.add_key(file.path(), "a.b", json!(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExists);

    engine.add_key(file.path(), "c.d", json!(3)).unwrap();
    assert_eq!(file.read_json(), json!({"a.b": 1, "c": {"d": 3}}));
}

#[test]
fn rename_destination_always_splits() {
    let file = TestFile::with_json(&json!({"src": 1}));
    let engine = setup_test_engine();

    engine.rename_key(file.path(), "src", "p.q").unwrap();
    assert_eq!(file.read_json(), json!({"p": {"q": 1}}));
}

#[test]
fn nested_literal_keys_are_unreachable() {
    let file = TestFile::with_json(&json!({"a": {"b.c": 1}}));
    let engine = setup_test_engine();

    assert_eq!(
        engine.get_key(file.path(), "a.b.c").unwrap_err().kind(),
        ErrorKind::KeyNotFound
    );
    assert!(!engine.key_exists(file.path(), "a.b.c").unwrap());
}
