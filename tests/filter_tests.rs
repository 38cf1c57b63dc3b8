// tests/filter_tests.rs

use jpath::{compare, eval_filter, get, parse_filter, PathError, Value};
use serde_json::{json, Value as Json};

fn bookstore() -> Json {
    json!({
        "store": {
            "book": [
                {
                    "category": "reference",
                    "author": "Nigel Rees",
                    "title": "Sayings of the Century",
                    "price": 8.95
                },
                {
                    "category": "fiction",
                    "author": "Evelyn Waugh",
                    "title": "Sword of Honour",
                    "price": 12.99
                },
                {
                    "category": "fiction",
                    "author": "Herman Melville",
                    "title": "Moby Dick",
                    "isbn": "0-553-21311-3",
                    "price": 8.99
                },
                {
                    "category": "fiction",
                    "author": "J. R. R. Tolkien",
                    "title": "The Lord of the Rings",
                    "isbn": "0-395-19395-8",
                    "price": 22.99
                }
            ],
            "bicycle": {
                "color": "red",
                "price": 19.95
            }
        },
        "expensive": 10
    })
}

fn select(path: &str) -> Json {
    get(&bookstore(), path).unwrap().0
}

// ============================================================================
// Filter Grammar
// ============================================================================

#[test]
fn test_parse_filter_cases() {
    let test_cases = vec![
        ("@.isbn", "@.isbn", "exists", ""),
        ("@.price < 10", "@.price", "<", "10"),
        ("@.price <= $.expensive", "@.price", "<=", "$.expensive"),
        ("@.author =~ /.*REES/i", "@.author", "=~", "/.*REES/i"),
        ("@.author == 'Nigel Rees'", "@.author", "==", "Nigel Rees"),
    ];

    for (filter, lhs, op, rhs) in test_cases {
        let exprs = parse_filter(filter).unwrap();
        assert_eq!(exprs.len(), 1, "Failed for filter: {}", filter);
        assert_eq!(exprs[0].lhs, lhs, "Failed for filter: {}", filter);
        assert_eq!(exprs[0].op, op, "Failed for filter: {}", filter);
        assert_eq!(exprs[0].rhs, rhs, "Failed for filter: {}", filter);
    }
}

#[test]
fn test_parse_filter_conjunction() {
    let exprs = parse_filter("@.color == 'White' && @.wife.name == 'Alice'").unwrap();
    assert_eq!(exprs.len(), 2);
    assert_eq!(exprs[0].rhs, "White");
    assert_eq!(exprs[1].lhs, "@.wife.name");
}

// ============================================================================
// Comparator
// ============================================================================

#[test]
fn test_compare_cases() {
    let test_cases = vec![
        (Value::Integer(1), Value::Integer(1), "==", true),
        (Value::Integer(1), Value::Integer(2), "==", false),
        (Value::Float(1.1), Value::Float(2.0), "<", true),
        (Value::from("1"), Value::from("2.0"), "<", true),
        (Value::from("1"), Value::from("2.0"), ">", false),
        (Value::from("haha"), Value::from("haha"), "==", true),
        (Value::from("ha ha"), Value::from("ha ha"), "==", true),
        (Value::Integer(20), Value::from("100"), ">", false),
        (Value::Integer(20), Value::from("100"), "<=", true),
    ];

    for (a, b, op, expected) in test_cases {
        assert_eq!(
            compare(&a, &b, op).unwrap(),
            expected,
            "Failed for: {} {} {}",
            a,
            op,
            b
        );
    }
}

#[test]
fn test_compare_rejects_regex_operator() {
    assert_eq!(
        compare(&Value::Integer(1), &Value::Integer(2), "=~").unwrap_err(),
        PathError::UnsupportedOperator("=~".into())
    );
}

// ============================================================================
// Conjunct Evaluation
// ============================================================================

#[test]
fn test_eval_filter_cases() {
    let test_cases = vec![
        (json!({"a": 1}), json!({}), "@.a", "exists", "", true),
        (json!({"a": 1}), json!({}), "@.b", "exists", "", false),
        (json!({"a": 1}), json!({"a": 1}), "$.a", "exists", "", true),
        (json!({"a": 1}), json!({"a": 1}), "$.b", "exists", "", false),
        (
            json!({"a": 1, "b": {"c": 2}}),
            json!({"a": 1, "b": {"c": 2}}),
            "$.b.c",
            "exists",
            "",
            true,
        ),
        (json!({"a": 1, "b": {"c": 2}}), json!({}), "$.b.a", "exists", "", false),
        (json!({"a": 3}), json!({"a": 3}), "$.a", ">", "1", true),
        (json!({"a": null}), json!({}), "@.a", "exists", "", false),
    ];

    for (element, root, lhs, op, rhs, expected) in test_cases {
        assert_eq!(
            eval_filter(&element, &root, lhs, op, rhs).unwrap(),
            expected,
            "Failed for: {} {} {} on {}",
            lhs,
            op,
            rhs,
            element
        );
    }
}

#[test]
fn test_eval_filter_regex_on_non_string() {
    let err = eval_filter(&json!({"a": 1}), &json!({}), "@.a", "=~", "/1/").unwrap_err();
    assert_eq!(err, PathError::NotAString("integer"));
}

#[test]
fn test_eval_filter_invalid_regex_literals() {
    for rule in ["", "xxx", "/xxx", "xxx/", "'/xxx/'", "\"/xxx/\""] {
        let err = eval_filter(&json!({"a": "xxx"}), &json!({}), "@.a", "=~", rule).unwrap_err();
        assert!(
            matches!(err, PathError::MalformedPath(_)),
            "Expected MalformedPath for {:?}, got {:?}",
            rule,
            err
        );
    }
}

// ============================================================================
// Filters in Paths
// ============================================================================

#[test]
fn test_filter_exists() {
    assert_eq!(
        select("$.store.book[?(@.isbn)].isbn"),
        json!(["0-553-21311-3", "0-395-19395-8"])
    );
}

#[test]
fn test_filter_numeric_comparison() {
    assert_eq!(
        select("$.store.book[?(@.price > 10)].title"),
        json!(["Sword of Honour", "The Lord of the Rings"])
    );
}

#[test]
fn test_filter_against_root() {
    assert_eq!(select("$.store.book[?(@.price > $.expensive)].price"), json!([12.99, 22.99]));
    assert_eq!(select("$.store.book[?(@.price < $.expensive)].price"), json!([8.95, 8.99]));
}

#[test]
fn test_filter_string_equality() {
    assert_eq!(select("$.store.book[?(@.author == 'Nigel Rees')].price"), json!([8.95]));
}

#[test]
fn test_filter_regex() {
    assert_eq!(
        select("$.store.book[?(@.author =~ /(?i).*REES/ )].author"),
        json!(["Nigel Rees"])
    );
    assert_eq!(select("$.store.book[?(@.author =~ /.*REES/i)].author"), json!(["Nigel Rees"]));
    assert_eq!(select("$.store.book[?(@.author =~ /^X/)].author"), json!([]));
}

#[test]
fn test_filter_regex_on_number_fails_lookup() {
    let err = get(&bookstore(), "$.store.book[?(@.price =~ /8/)]").unwrap_err();
    assert_eq!(err, PathError::NotAString("float"));
}

#[test]
fn test_regex_type_error_under_descent() {
    let err = get(&bookstore(), "$..book[?(@.price =~ /8/)]").unwrap_err();
    assert_eq!(err, PathError::NotAString("float"));

    let doc = json!({"groups": [[{"n": "1"}], [{"n": 1}]]});
    let err = get(&doc, "$.groups[*].[?(@.n =~ /1/)]").unwrap_err();
    assert_eq!(err, PathError::NotAString("integer"));
}

#[test]
fn test_filter_with_no_matches_is_empty() {
    let doc = json!({
        "books": [
            {"name": "My First Book", "price": 10},
            {"name": "My Second Book", "price": 20}
        ]
    });
    let (result, many) = get(&doc, "$.books[?(@.price > 100)].name").unwrap();
    assert_eq!(result, json!([]));
    assert!(many);
}

#[test]
fn test_filter_conjunction_with_nested_operand() {
    let doc = json!({
        "name": "Tom",
        "friends": [
            {"name": "Alice", "color": "White", "age": 10},
            {"name": "Tony", "color": "White", "age": 9, "wife": {"name": "Alice"}},
            {"name": "David", "color": "White", "age": 9}
        ]
    });
    let (result, _) = get(&doc, "$.friends[?(@.color == 'White' && @.wife.name == 'Alice')].name").unwrap();
    assert_eq!(result, json!(["Tony"]));
}

#[test]
fn test_filter_with_indexed_operand() {
    let doc = json!({"items": [{"tags": ["a", "b"]}, {"tags": ["c"]}, {"tags": []}]});
    let (result, _) = get(&doc, "$.items[?(@.tags[0] == 'c')]").unwrap();
    assert_eq!(result, json!([{"tags": ["c"]}]));
}

#[test]
fn test_keyless_filter_on_root_array() {
    let doc = json!([{"n": 1}, {"n": 5}, {"n": 3}]);
    let (result, _) = get(&doc, "$[?(@.n >= 3)].n").unwrap();
    assert_eq!(result, json!([5, 3]));
}

#[test]
fn test_filter_on_object_values() {
    let doc = json!({"servers": {"a": {"up": true}, "b": {"up": false}, "c": {"up": true}}});
    let (result, _) = get(&doc, "$.servers[?(@.up == true)].up").unwrap();
    assert_eq!(result, json!([true, true]));
}
