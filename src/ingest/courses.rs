//! Course section parsing
//!
//! Each file under `courses/` holds `{"result": [section, ...]}`. Sections
//! missing a required field, or carrying a field of the wrong type, are
//! dropped.

use serde_json::{Map, Value};

use crate::dataset::Course;

/// Source keys every section must carry
const REQUIRED_KEYS: [&str; 11] = [
    "Subject",
    "Course",
    "Avg",
    "Professor",
    "Title",
    "Pass",
    "Fail",
    "Audit",
    "id",
    "Year",
    "Section",
];

/// Parses every valid section of one file
pub fn parse_course_file(file: &Value) -> Vec<Course> {
    file.get("result")
        .and_then(Value::as_array)
        .map(|sections| {
            sections
                .iter()
                .filter_map(Value::as_object)
                .filter_map(parse_section)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_section(section: &Map<String, Value>) -> Option<Course> {
    if !REQUIRED_KEYS.iter().all(|k| section.contains_key(*k)) {
        return None;
    }

    Some(Course {
        dept: text(section, "Subject")?,
        id: text(section, "Course")?,
        avg: number(section, "Avg")?,
        instructor: text(section, "Professor")?,
        title: text(section, "Title")?,
        pass: number(section, "Pass")?,
        fail: number(section, "Fail")?,
        audit: number(section, "Audit")?,
        uuid: text_or_number(section, "id")?,
        year: numeric_text(section, "Year")?,
        section: text_or_number(section, "Section")?,
    })
}

fn text(section: &Map<String, Value>, key: &str) -> Option<String> {
    section.get(key)?.as_str().map(str::to_string)
}

fn number(section: &Map<String, Value>, key: &str) -> Option<f64> {
    section.get(key)?.as_f64()
}

/// Strings as-is; numbers in their JSON text form
fn text_or_number(section: &Map<String, Value>, key: &str) -> Option<String> {
    match section.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers, or strings that parse as numbers
fn numeric_text(section: &Map<String, Value>, key: &str) -> Option<f64> {
    match section.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section() -> Value {
        json!({
            "Subject": "cpsc", "Course": "310", "Avg": 78.5, "Professor": "holmes, reid",
            "Title": "intr sftwr eng", "Pass": 100, "Fail": 3, "Audit": 1,
            "id": 12345, "Year": "2015", "Section": "101"
        })
    }

    #[test]
    fn test_parse_section() {
        let courses = parse_course_file(&json!({"result": [section()]}));
        assert_eq!(courses.len(), 1);
        let c = &courses[0];
        assert_eq!(c.dept, "cpsc");
        assert_eq!(c.uuid, "12345");
        assert_eq!(c.year, 2015.0);
        assert_eq!(c.avg, 78.5);
        assert_eq!(c.section, "101");
    }

    #[test]
    fn test_incomplete_sections_dropped() {
        let mut missing = section();
        missing.as_object_mut().unwrap().remove("Professor");
        let mut wrong_type = section();
        wrong_type["Avg"] = json!("high");

        let courses = parse_course_file(&json!({"result": [missing, section(), wrong_type, 7]}));
        assert_eq!(courses.len(), 1);
    }

    #[test]
    fn test_file_without_result() {
        assert!(parse_course_file(&json!({"rank": 1})).is_empty());
        assert!(parse_course_file(&json!([section()])).is_empty());
        assert!(parse_course_file(&json!({"result": []})).is_empty());
    }
}
