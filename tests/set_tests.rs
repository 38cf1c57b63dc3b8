// tests/set_tests.rs

use jpath::{compile, get, set, PathError, Value};
use serde_json::{json, Value as Json};

fn levels() -> Json {
    json!({
        "hi": "there",
        "level1": {
            "level2": [1, 2, 3]
        },
        "array2": [1, 2, 3]
    })
}

fn dogs() -> Json {
    json!({
        "name": "Tom",
        "color": "Black",
        "friends": [
            {"name": "Alice", "color": "White", "age": 10},
            {"name": "Tony", "color": "White", "age": 9, "wife": {"name": "Alice"}},
            {"name": "David", "color": "White", "age": 9}
        ]
    })
}

fn assert_ambiguous(doc: &mut Json, path: &str) {
    let err = set(doc, path, json!(null)).unwrap_err();
    assert!(
        matches!(err, PathError::AmbiguousSet(_)),
        "Expected AmbiguousSet for {}, got {:?}",
        path,
        err
    );
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_set_replaces_existing_key() {
    let mut doc = levels();
    compile("$.level1.level2").unwrap().set(&mut doc, json!(1)).unwrap();
    assert_eq!(get(&doc, "$.level1.level2").unwrap().0, json!(1));
}

#[test]
fn test_set_adds_missing_key() {
    let mut doc = levels();
    set(&mut doc, "$.level1.fresh", json!({"x": true})).unwrap();
    assert_eq!(doc["level1"]["fresh"], json!({"x": true}));
}

#[test]
fn test_set_missing_intermediate_key_fails() {
    let mut doc = levels();
    let err = set(&mut doc, "$.nope.fresh", json!(1)).unwrap_err();
    assert_eq!(err, PathError::KeyNotFound("nope".into()));
}

#[test]
fn test_set_final_key_on_array_sets_every_element() {
    let mut doc = dogs();
    set(&mut doc, "$.friends.seen", json!(true)).unwrap();
    assert_eq!(get(&doc, "$.friends[*].seen").unwrap().0, json!([true, true, true]));
}

#[test]
fn test_set_on_null_parent() {
    let mut doc = json!({"a": null});
    assert_eq!(set(&mut doc, "$.a.b", json!(1)).unwrap_err(), PathError::NullObject);
}

#[test]
fn test_set_on_scalar_parent() {
    let mut doc = levels();
    assert_eq!(
        set(&mut doc, "$.hi.there", json!(1)).unwrap_err(),
        PathError::NotObject("string")
    );
}

// ============================================================================
// Indices, Ranges and Filters
// ============================================================================

#[test]
fn test_set_index() {
    let mut doc = levels();
    compile("$.array2[1]").unwrap().set(&mut doc, json!("hello")).unwrap();
    assert_eq!(get(&doc, "$.array2[1]").unwrap().0, json!("hello"));
}

#[test]
fn test_set_negative_index() {
    let mut doc = levels();
    set(&mut doc, "$.level1.level2[-1]", json!(30)).unwrap();
    assert_eq!(doc["level1"]["level2"], json!([1, 2, 30]));
}

#[test]
fn test_set_index_out_of_range() {
    let mut doc = levels();
    assert_eq!(
        set(&mut doc, "$.array2[3]", json!(0)).unwrap_err(),
        PathError::IndexOutOfRange { len: 3, index: 3 }
    );
}

#[test]
fn test_set_through_index() {
    let mut doc = dogs();
    set(&mut doc, "$.friends[1].wife.name", json!("Alicia")).unwrap();
    assert_eq!(doc["friends"][1]["wife"]["name"], json!("Alicia"));
}

#[test]
fn test_set_through_single_match_filter() {
    let mut doc = dogs();
    set(
        &mut doc,
        "$.friends[?(@.color == 'White' && @.wife.name == 'Alice')].name",
        json!("George"),
    )
    .unwrap();
    assert_eq!(doc["friends"][1]["name"], json!("George"));
    assert_eq!(doc["friends"][0]["name"], json!("Alice"));
}

#[test]
fn test_set_replaces_filtered_element() {
    let mut doc = dogs();
    set(&mut doc, "$.friends[?(@.name == 'David')]", json!({"name": "Rex"})).unwrap();
    assert_eq!(doc["friends"][2], json!({"name": "Rex"}));
}

#[test]
fn test_set_through_single_element_range() {
    let mut doc = levels();
    set(&mut doc, "$.array2[-1:]", json!(99)).unwrap();
    assert_eq!(doc["array2"], json!([1, 2, 99]));
}

#[test]
fn test_set_filter_on_object_values() {
    let mut doc = json!({"servers": {"a": {"up": true}, "b": {"up": false}}});
    set(&mut doc, "$.servers[?(@.up == false)].up", json!(true)).unwrap();
    assert_eq!(doc["servers"]["b"]["up"], json!(true));
}

#[test]
fn test_set_on_root_array() {
    let mut doc = json!([[1, 2], [3, 4]]);
    set(&mut doc, "$[1].[0]", json!(30)).unwrap();
    assert_eq!(doc, json!([[1, 2], [30, 4]]));
}

// ============================================================================
// Ambiguity
// ============================================================================

#[test]
fn test_set_rejects_multi_valued_steps() {
    let mut doc = dogs();
    assert_ambiguous(&mut doc, "$.friends[0,1].name");
    assert_ambiguous(&mut doc, "$.friends[*].name");
    assert_ambiguous(&mut doc, "$.friends[0:1].name");
    assert_ambiguous(&mut doc, "$.friends[?(@.color == 'White')].name");
    assert_ambiguous(&mut doc, "$.friends[?(@.color == 'Green')].name");
    assert_ambiguous(&mut doc, "$..name");
    assert_ambiguous(&mut doc, "$.friends.wife.name");
    assert_ambiguous(&mut doc, "$.friends[0,1]");

    // nothing was written
    assert_eq!(doc, dogs());
}

#[test]
fn test_set_requires_a_step() {
    let mut doc = levels();
    assert!(matches!(
        set(&mut doc, "$", json!(1)),
        Err(PathError::MalformedPath(_))
    ));
}

// ============================================================================
// Native Values
// ============================================================================

#[test]
fn test_set_on_native_values() {
    let mut doc = Value::from(levels());
    set(&mut doc, "$.level1.level2[0]", Value::from("first")).unwrap();
    set(&mut doc, "$.hi", Value::Integer(5)).unwrap();
    assert_eq!(get(&doc, "$.level1.level2").unwrap().0, Value::from(json!(["first", 2, 3])));
    assert_eq!(get(&doc, "$.hi").unwrap().0, Value::Integer(5));
}
