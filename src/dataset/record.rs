//! Typed dataset records
//!
//! Records are immutable once stored. Query code reads them through the
//! [`Record`] accessor, keyed by [`Field`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kind::{DatasetKind, Field};

/// Year reported for aggregate "overall" course sections
pub const OVERALL_SECTION_YEAR: f64 = 1900.0;

/// Borrowed scalar read from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> FieldValue<'a> {
    /// Returns the numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Returns the string value, if any
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }

    /// Converts to a JSON value; integral numbers become JSON integers
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Text(s) => Value::String((*s).to_string()),
        }
    }
}

/// Converts a number to JSON, keeping integral values as integers
pub fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Field access shared by all record types
pub trait Record {
    /// Kind of dataset holding records of this type
    const KIND: DatasetKind;

    /// Reads a field; `None` when the field belongs to the other kind
    fn get(&self, field: Field) -> Option<FieldValue<'_>>;
}

/// One course section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub dept: String,
    pub id: String,
    pub avg: f64,
    pub instructor: String,
    pub title: String,
    pub pass: f64,
    pub fail: f64,
    pub audit: f64,
    pub uuid: String,
    pub year: f64,
    /// Section marker; "overall" for aggregate sections
    pub section: String,
}

impl Course {
    /// Year as seen by queries
    pub fn effective_year(&self) -> f64 {
        if self.section == "overall" {
            OVERALL_SECTION_YEAR
        } else {
            self.year
        }
    }
}

impl Record for Course {
    const KIND: DatasetKind = DatasetKind::Courses;

    fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Avg => FieldValue::Number(self.avg),
            Field::Pass => FieldValue::Number(self.pass),
            Field::Fail => FieldValue::Number(self.fail),
            Field::Audit => FieldValue::Number(self.audit),
            Field::Year => FieldValue::Number(self.effective_year()),
            Field::Dept => FieldValue::Text(&self.dept),
            Field::Id => FieldValue::Text(&self.id),
            Field::Instructor => FieldValue::Text(&self.instructor),
            Field::Title => FieldValue::Text(&self.title),
            Field::Uuid => FieldValue::Text(&self.uuid),
            _ => return None,
        };
        Some(value)
    }
}

/// One campus room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub fullname: String,
    pub shortname: String,
    pub number: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub seats: f64,
    #[serde(rename = "type")]
    pub room_type: String,
    pub furniture: String,
    pub href: String,
}

impl Record for Room {
    const KIND: DatasetKind = DatasetKind::Rooms;

    fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Lat => FieldValue::Number(self.lat),
            Field::Lon => FieldValue::Number(self.lon),
            Field::Seats => FieldValue::Number(self.seats),
            Field::Fullname => FieldValue::Text(&self.fullname),
            Field::Shortname => FieldValue::Text(&self.shortname),
            Field::Number => FieldValue::Text(&self.number),
            Field::Name => FieldValue::Text(&self.name),
            Field::Address => FieldValue::Text(&self.address),
            Field::Type => FieldValue::Text(&self.room_type),
            Field::Furniture => FieldValue::Text(&self.furniture),
            Field::Href => FieldValue::Text(&self.href),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn course(dept: &str, id: &str, avg: f64, year: f64) -> Course {
        Course {
            dept: dept.to_string(),
            id: id.to_string(),
            avg,
            instructor: "smith, jane".to_string(),
            title: format!("{} {}", dept, id),
            pass: 10.0,
            fail: 1.0,
            audit: 0.0,
            uuid: format!("{}-{}-{}", dept, id, avg),
            year,
            section: "001".to_string(),
        }
    }

    pub fn room(shortname: &str, number: &str, seats: f64) -> Room {
        Room {
            fullname: format!("{} Building", shortname),
            shortname: shortname.to_string(),
            number: number.to_string(),
            name: format!("{}_{}", shortname, number),
            address: "2211 Wesbrook Mall".to_string(),
            lat: 49.26,
            lon: -123.25,
            seats,
            room_type: "Small Group".to_string(),
            furniture: "Classroom-Movable Tables & Chairs".to_string(),
            href: format!("http://rooms/{}-{}", shortname, number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{course, room};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_accessor() {
        let c = course("cpsc", "310", 85.5, 2015.0);
        assert_eq!(c.get(Field::Avg), Some(FieldValue::Number(85.5)));
        assert_eq!(c.get(Field::Dept), Some(FieldValue::Text("cpsc")));
        assert_eq!(c.get(Field::Seats), None);
    }

    #[test]
    fn test_overall_section_year() {
        let mut c = course("cpsc", "310", 85.5, 2015.0);
        assert_eq!(c.get(Field::Year), Some(FieldValue::Number(2015.0)));
        c.section = "overall".to_string();
        assert_eq!(c.get(Field::Year), Some(FieldValue::Number(1900.0)));
    }

    #[test]
    fn test_room_accessor() {
        let r = room("DMP", "110", 120.0);
        assert_eq!(r.get(Field::Type), Some(FieldValue::Text("Small Group")));
        assert_eq!(r.get(Field::Seats).and_then(|v| v.as_number()), Some(120.0));
        assert_eq!(r.get(Field::Avg), None);
    }

    #[test]
    fn test_number_to_json() {
        assert_eq!(number_to_json(120.0), json!(120));
        assert_eq!(number_to_json(85.25), json!(85.25));
        assert_eq!(number_to_json(-3.0), json!(-3));
    }
}
