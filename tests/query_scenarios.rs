//! End-to-end query tests through the facade
//!
//! Datasets are ingested from archives, then queried with the JSON
//! grammar exactly as a client would send it.

mod common;

use common::{courses_archive, section, small_courses};
use insightdb::{DatasetKind, InsightError, InsightFacade};
use serde_json::{json, Value};

fn facade() -> InsightFacade {
    let mut facade = InsightFacade::in_memory();
    facade
        .add_dataset("courses", &small_courses(), DatasetKind::Courses)
        .unwrap();
    facade
}

fn avgs(rows: &[Value]) -> Vec<f64> {
    rows.iter()
        .map(|r| r["courses_avg"].as_f64().unwrap())
        .collect()
}

#[test]
fn test_empty_where_projects_every_record() {
    let rows = facade()
        .perform_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["courses_dept", "courses_id"]}
        }))
        .unwrap();

    assert_eq!(
        rows,
        vec![
            json!({"courses_dept": "cpsc", "courses_id": "310"}),
            json!({"courses_dept": "cpsc", "courses_id": "110"}),
            json!({"courses_dept": "math", "courses_id": "100"}),
        ]
    );
}

#[test]
fn test_greater_than_with_order() {
    let rows = facade()
        .perform_query(&json!({
            "WHERE": {"GT": {"courses_avg": 90}},
            "OPTIONS": {"COLUMNS": ["courses_dept", "courses_avg"], "ORDER": "courses_avg"}
        }))
        .unwrap();

    assert_eq!(avgs(&rows), vec![92.25, 95.5]);
}

#[test]
fn test_negated_less_than() {
    let rows = facade()
        .perform_query(&json!({
            "WHERE": {"NOT": {"LT": {"courses_avg": 92.25}}},
            "OPTIONS": {
                "COLUMNS": ["courses_avg"],
                "ORDER": {"dir": "DOWN", "keys": ["courses_avg"]}
            }
        }))
        .unwrap();

    assert_eq!(avgs(&rows), vec![95.5, 92.25]);
}

#[test]
fn test_group_and_average() {
    let rows = facade()
        .perform_query(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["courses_dept", "overall"], "ORDER": "courses_dept"},
            "TRANSFORMATIONS": {
                "GROUP": ["courses_dept"],
                "APPLY": [{"overall": {"AVG": "courses_avg"}}]
            }
        }))
        .unwrap();

    assert_eq!(
        rows,
        vec![
            json!({"courses_dept": "cpsc", "overall": 91.75}),
            json!({"courses_dept": "math", "overall": 92.25}),
        ]
    );
}

#[test]
fn test_aggregate_operators() {
    let rows = facade()
        .perform_query(&json!({
            "WHERE": {"IS": {"courses_dept": "cp*"}},
            "OPTIONS": {"COLUMNS": ["courses_dept", "hi", "lo", "total", "n"]},
            "TRANSFORMATIONS": {
                "GROUP": ["courses_dept"],
                "APPLY": [
                    {"hi": {"MAX": "courses_avg"}},
                    {"lo": {"MIN": "courses_avg"}},
                    {"total": {"SUM": "courses_avg"}},
                    {"n": {"COUNT": "courses_id"}}
                ]
            }
        }))
        .unwrap();

    assert_eq!(
        rows,
        vec![json!({"courses_dept": "cpsc", "hi": 95.5, "lo": 88, "total": 183.5, "n": 2})]
    );
}

#[test]
fn test_wildcards_and_boolean_operators() {
    let facade = facade();
    let count = |filter: Value| {
        facade
            .perform_query(&json!({"WHERE": filter, "OPTIONS": {"COLUMNS": ["courses_uuid"]}}))
            .unwrap()
            .len()
    };

    assert_eq!(count(json!({"IS": {"courses_dept": "*"}})), 3);
    assert_eq!(count(json!({"IS": {"courses_dept": "*at*"}})), 1);
    assert_eq!(count(json!({"IS": {"courses_dept": "CPSC"}})), 2);
    assert_eq!(
        count(json!({"OR": [
            {"EQ": {"courses_avg": 88}},
            {"IS": {"courses_id": "*10"}}
        ]})),
        2
    );
    assert_eq!(
        count(json!({"AND": [
            {"GT": {"courses_avg": 80}},
            {"NOT": {"IS": {"courses_dept": "math"}}}
        ]})),
        2
    );
}

#[test]
fn test_dataset_id_rules() {
    let mut facade = InsightFacade::in_memory();

    let err = facade
        .add_dataset("c_1", &small_courses(), DatasetKind::Courses)
        .unwrap_err();
    assert!(matches!(err, InsightError::Malformed(_)));

    let err = facade
        .add_dataset("", &small_courses(), DatasetKind::Courses)
        .unwrap_err();
    assert!(matches!(err, InsightError::Malformed(_)));

    let err = facade.remove_dataset("ghost").unwrap_err();
    assert_eq!(err, InsightError::NotFound("ghost".to_string()));

    assert!(facade.list_datasets().is_empty());
}

#[test]
fn test_rejected_queries() {
    let facade = facade();
    let rejected = |query: Value| {
        assert!(matches!(
            facade.perform_query(&query),
            Err(InsightError::Malformed(_))
        ));
    };

    rejected(json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_seats"]}}));
    rejected(json!({"WHERE": {"GT": {"courses_avg": "90"}}, "OPTIONS": {"COLUMNS": ["courses_avg"]}}));
    rejected(json!({"WHERE": {"IS": {"courses_dept": "c*p*"}}, "OPTIONS": {"COLUMNS": ["courses_avg"]}}));
    rejected(json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["courses_avg"], "ORDER": "courses_dept"}}));
    rejected(json!("not a query"));
}

#[test]
fn test_archive_without_valid_records_is_rejected() {
    let mut facade = InsightFacade::in_memory();
    let archive = courses_archive(vec![json!({"Subject": "cpsc"})]);
    assert!(facade
        .add_dataset("empty", &archive, DatasetKind::Courses)
        .is_err());

    assert!(facade
        .add_dataset("rooms", &small_courses(), DatasetKind::Rooms)
        .is_err());
    assert!(facade
        .add_dataset("garbage", b"definitely not a tar", DatasetKind::Courses)
        .is_err());

    let ok = courses_archive(vec![section("biol", "200", 71.0, 9)]);
    assert_eq!(
        facade.add_dataset("ok", &ok, DatasetKind::Courses).unwrap(),
        vec!["ok"]
    );
}
