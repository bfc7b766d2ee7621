//! Dataset kinds and their field tables
//!
//! Each kind fixes a closed set of queryable fields, split into numeric
//! fields (LT/GT/EQ, MAX/MIN/AVG/SUM) and string fields (IS).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dataset kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Course sections
    Courses,
    /// Campus rooms
    Rooms,
}

impl DatasetKind {
    /// Returns the wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Courses => "courses",
            DatasetKind::Rooms => "rooms",
        }
    }

    /// Returns the archive folder holding records of this kind
    pub fn root_folder(&self) -> &'static str {
        self.as_str()
    }

    /// Returns every field belonging to this kind, numeric fields first
    pub fn fields(&self) -> &'static [Field] {
        match self {
            DatasetKind::Courses => &COURSE_FIELDS,
            DatasetKind::Rooms => &ROOM_FIELDS,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "courses" => Ok(DatasetKind::Courses),
            "rooms" => Ok(DatasetKind::Rooms),
            other => Err(format!("unknown dataset kind '{}'", other)),
        }
    }
}

/// A queryable field of either dataset kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Courses, numeric
    Avg,
    Pass,
    Fail,
    Audit,
    Year,
    // Courses, string
    Dept,
    Id,
    Instructor,
    Title,
    Uuid,
    // Rooms, numeric
    Lat,
    Lon,
    Seats,
    // Rooms, string
    Fullname,
    Shortname,
    Number,
    Name,
    Address,
    Type,
    Furniture,
    Href,
}

const COURSE_FIELDS: [Field; 10] = [
    Field::Avg,
    Field::Pass,
    Field::Fail,
    Field::Audit,
    Field::Year,
    Field::Dept,
    Field::Id,
    Field::Instructor,
    Field::Title,
    Field::Uuid,
];

const ROOM_FIELDS: [Field; 11] = [
    Field::Lat,
    Field::Lon,
    Field::Seats,
    Field::Fullname,
    Field::Shortname,
    Field::Number,
    Field::Name,
    Field::Address,
    Field::Type,
    Field::Furniture,
    Field::Href,
];

impl Field {
    /// Parses a query field name (the part after the underscore)
    pub fn parse(name: &str) -> Option<Field> {
        COURSE_FIELDS
            .iter()
            .chain(ROOM_FIELDS.iter())
            .copied()
            .find(|f| f.name() == name)
    }

    /// Returns the query field name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Avg => "avg",
            Field::Pass => "pass",
            Field::Fail => "fail",
            Field::Audit => "audit",
            Field::Year => "year",
            Field::Dept => "dept",
            Field::Id => "id",
            Field::Instructor => "instructor",
            Field::Title => "title",
            Field::Uuid => "uuid",
            Field::Lat => "lat",
            Field::Lon => "lon",
            Field::Seats => "seats",
            Field::Fullname => "fullname",
            Field::Shortname => "shortname",
            Field::Number => "number",
            Field::Name => "name",
            Field::Address => "address",
            Field::Type => "type",
            Field::Furniture => "furniture",
            Field::Href => "href",
        }
    }

    /// Returns the name of the field in the source archive records
    pub fn source_name(&self) -> &'static str {
        match self {
            Field::Avg => "Avg",
            Field::Pass => "Pass",
            Field::Fail => "Fail",
            Field::Audit => "Audit",
            Field::Year => "Year",
            Field::Dept => "Subject",
            Field::Id => "Course",
            Field::Instructor => "Professor",
            Field::Title => "Title",
            Field::Uuid => "id",
            other => other.name(),
        }
    }

    /// Returns the kind this field belongs to
    pub fn kind(&self) -> DatasetKind {
        if COURSE_FIELDS.contains(self) {
            DatasetKind::Courses
        } else {
            DatasetKind::Rooms
        }
    }

    /// Returns true for fields compared with LT/GT/EQ
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Field::Avg
                | Field::Pass
                | Field::Fail
                | Field::Audit
                | Field::Year
                | Field::Lat
                | Field::Lon
                | Field::Seats
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip_names() {
        for field in COURSE_FIELDS.iter().chain(ROOM_FIELDS.iter()) {
            assert_eq!(Field::parse(field.name()), Some(*field));
        }
        assert_eq!(Field::parse("Avg"), None);
        assert_eq!(Field::parse(""), None);
    }

    #[test]
    fn test_field_classification() {
        assert_eq!(Field::Avg.kind(), DatasetKind::Courses);
        assert_eq!(Field::Seats.kind(), DatasetKind::Rooms);
        assert!(Field::Year.is_numeric());
        assert!(!Field::Uuid.is_numeric());
        assert!(Field::Lat.is_numeric());
        assert!(!Field::Furniture.is_numeric());

        let numeric: Vec<_> = DatasetKind::Rooms
            .fields()
            .iter()
            .filter(|f| f.is_numeric())
            .collect();
        assert_eq!(numeric.len(), 3);
    }

    #[test]
    fn test_source_names() {
        assert_eq!(Field::Dept.source_name(), "Subject");
        assert_eq!(Field::Instructor.source_name(), "Professor");
        assert_eq!(Field::Uuid.source_name(), "id");
        assert_eq!(Field::Href.source_name(), "href");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("courses".parse::<DatasetKind>(), Ok(DatasetKind::Courses));
        assert_eq!("rooms".parse::<DatasetKind>(), Ok(DatasetKind::Rooms));
        assert!("Courses".parse::<DatasetKind>().is_err());
    }
}
