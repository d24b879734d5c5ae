// Integration tests for filtering, projection and query errors

mod common;

use campusql::{Error, ErrorCategory, Value};
use common::{column, engine, text_column};
use serde_json::json;

#[test]
fn test_gt_filter() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"GT": {"sections_avg": 85}},
            "OPTIONS": {"COLUMNS": ["sections_uuid", "sections_avg"]}
        }))
        .unwrap();

    assert_eq!(text_column(&rows, "sections_uuid"), ["1001", "1006"]);
    assert_eq!(
        column(&rows, "sections_avg"),
        [Value::Number(85.5), Value::Number(96.0)]
    );
}

#[test]
fn test_eq_filter() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"EQ": {"sections_year": 1900}},
            "OPTIONS": {"COLUMNS": ["sections_uuid"]}
        }))
        .unwrap();
    assert_eq!(text_column(&rows, "sections_uuid"), ["1004"]);
}

#[test]
fn test_and_with_prefix_match() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"AND": [
                {"GT": {"sections_avg": 80}},
                {"IS": {"sections_dept": "cp*"}}
            ]},
            "OPTIONS": {"COLUMNS": ["sections_uuid"]}
        }))
        .unwrap();
    assert_eq!(text_column(&rows, "sections_uuid"), ["1001", "1003", "1004"]);
}

#[test]
fn test_or_keeps_input_order() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"OR": [
                {"LT": {"sections_avg": 65}},
                {"EQ": {"sections_year": 2016}}
            ]},
            "OPTIONS": {"COLUMNS": ["sections_uuid"]}
        }))
        .unwrap();
    assert_eq!(text_column(&rows, "sections_uuid"), ["1002", "1006", "1007"]);
}

#[test]
fn test_not_filter() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"NOT": {"IS": {"sections_dept": "cpsc"}}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .unwrap();
    assert_eq!(text_column(&rows, "sections_dept"), ["math", "math", "biol"]);
}

#[test]
fn test_wildcard_shapes() {
    let engine = engine();
    let count = |pattern: &str| {
        engine
            .perform_query(&json!({
                "WHERE": {"IS": {"sections_instructor": pattern}},
                "OPTIONS": {"COLUMNS": ["sections_uuid"]}
            }))
            .unwrap()
            .len()
    };

    assert_eq!(count("*, *"), 6);
    assert_eq!(count("*reid"), 1);
    assert_eq!(count("k*"), 1);
    assert_eq!(count(""), 1);
    assert_eq!(count("*"), 7);
    assert_eq!(count("Adams, carl"), 1);
    assert_eq!(count("adams, carl"), 0);
}

#[test]
fn test_rooms_use_prefixed_storage_keys() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"GT": {"rooms_seats": 150}},
            "OPTIONS": {"COLUMNS": ["rooms_name", "rooms_number", "rooms_seats"]}
        }))
        .unwrap();

    assert_eq!(text_column(&rows, "rooms_name"), ["DMP_310", "ANGU_098"]);
    assert_eq!(text_column(&rows, "rooms_number"), ["310", "098"]);
}

#[test]
fn test_empty_result_is_not_an_error() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"GT": {"sections_avg": 100}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_rows_serialize_like_result_objects() {
    let rows = engine()
        .perform_query(&json!({
            "WHERE": {"IS": {"sections_uuid": "1006"}},
            "OPTIONS": {"COLUMNS": ["sections_dept", "sections_avg"]}
        }))
        .unwrap();
    assert_eq!(
        serde_json::to_string(&rows).unwrap(),
        r#"[{"sections_dept":"math","sections_avg":96.0}]"#
    );
}

#[test]
fn test_malformed_queries() {
    let engine = engine();
    let bad = [
        json!({"OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {"GT": {"sections_dept": 1}}, "OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {"IS": {"sections_dept": "c*s"}}, "OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {"AND": []}, "OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": []}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_dept"], "ORDER": "sections_avg"}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_grade"]}}),
    ];

    for query in bad {
        let err = engine.perform_query(&query).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)), "{} gave {}", query, err);
        assert_eq!(err.category(), ErrorCategory::Insight);
    }
}

#[test]
fn test_invalid_json_text() {
    let err = engine().perform_query_str("{\"WHERE\": {}").unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
}

#[test]
fn test_two_datasets_in_one_query() {
    let err = engine()
        .perform_query(&json!({
            "WHERE": {"GT": {"sections_avg": 90}},
            "OPTIONS": {"COLUMNS": ["rooms_shortname"]}
        }))
        .unwrap_err();
    assert!(matches!(err, Error::AmbiguousOrMissingDataset(_)));
}

#[test]
fn test_unknown_dataset() {
    let err = engine()
        .perform_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["ubc_dept"]}
        }))
        .unwrap_err();
    assert!(matches!(err, Error::DatasetNotFound(_)));
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn test_kind_mismatch() {
    let err = engine()
        .perform_query(&json!({
            "WHERE": {"GT": {"sections_seats": 10}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .unwrap_err();
    assert!(matches!(err, Error::KindMismatch(_)));
}
