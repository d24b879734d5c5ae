//! Schema registry
//!
//! The two dataset kinds, the closed set of queryable fields, and each
//! field's value domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which record shape a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Course-section records
    Sections,
    /// Room records
    Rooms,
}

impl Kind {
    /// All fields that belong to this kind, numeric fields first.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Kind::Sections => &[
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
            ],
            Kind::Rooms => &[
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
            ],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Sections => write!(f, "sections"),
            Kind::Rooms => write!(f, "rooms"),
        }
    }
}

/// Value domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Compared with LT/GT/EQ, aggregated with MAX/MIN/AVG/SUM
    Numeric,
    /// Matched with IS
    Textual,
}

/// A queryable field name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Avg,
    Pass,
    Fail,
    Audit,
    Year,
    Lat,
    Lon,
    Seats,
    Dept,
    Id,
    Instructor,
    Title,
    Uuid,
    Fullname,
    Shortname,
    Number,
    Name,
    Address,
    Type,
    Furniture,
    Href,
}

impl Field {
    /// Resolves a field name as written in a query key.
    pub fn parse(name: &str) -> Option<Field> {
        let field = match name {
            "avg" => Field::Avg,
            "pass" => Field::Pass,
            "fail" => Field::Fail,
            "audit" => Field::Audit,
            "year" => Field::Year,
            "lat" => Field::Lat,
            "lon" => Field::Lon,
            "seats" => Field::Seats,
            "dept" => Field::Dept,
            "id" => Field::Id,
            "instructor" => Field::Instructor,
            "title" => Field::Title,
            "uuid" => Field::Uuid,
            "fullname" => Field::Fullname,
            "shortname" => Field::Shortname,
            "number" => Field::Number,
            "name" => Field::Name,
            "address" => Field::Address,
            "type" => Field::Type,
            "furniture" => Field::Furniture,
            "href" => Field::Href,
            _ => return None,
        };
        Some(field)
    }

    /// The name used in query keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Avg => "avg",
            Field::Pass => "pass",
            Field::Fail => "fail",
            Field::Audit => "audit",
            Field::Year => "year",
            Field::Lat => "lat",
            Field::Lon => "lon",
            Field::Seats => "seats",
            Field::Dept => "dept",
            Field::Id => "id",
            Field::Instructor => "instructor",
            Field::Title => "title",
            Field::Uuid => "uuid",
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

    /// The key under which records store this field.
    ///
    /// Room numbers and names are stored with a `room_` prefix so they
    /// never clash with section fields of the same spelling.
    pub fn storage_key(self) -> &'static str {
        match self {
            Field::Number => "room_number",
            Field::Name => "room_name",
            other => other.as_str(),
        }
    }

    /// Numeric or textual, independent of dataset kind.
    pub fn field_type(self) -> FieldType {
        match self {
            Field::Avg
            | Field::Pass
            | Field::Fail
            | Field::Audit
            | Field::Year
            | Field::Lat
            | Field::Lon
            | Field::Seats => FieldType::Numeric,
            Field::Dept
            | Field::Id
            | Field::Instructor
            | Field::Title
            | Field::Uuid
            | Field::Fullname
            | Field::Shortname
            | Field::Number
            | Field::Name
            | Field::Address
            | Field::Type
            | Field::Furniture
            | Field::Href => FieldType::Textual,
        }
    }

    /// Returns true for numeric fields.
    pub fn is_numeric(self) -> bool {
        self.field_type() == FieldType::Numeric
    }

    /// The single kind this field belongs to.
    pub fn kind(self) -> Kind {
        match self {
            Field::Avg
            | Field::Pass
            | Field::Fail
            | Field::Audit
            | Field::Year
            | Field::Dept
            | Field::Id
            | Field::Instructor
            | Field::Title
            | Field::Uuid => Kind::Sections,
            Field::Lat
            | Field::Lon
            | Field::Seats
            | Field::Fullname
            | Field::Shortname
            | Field::Number
            | Field::Name
            | Field::Address
            | Field::Type
            | Field::Furniture
            | Field::Href => Kind::Rooms,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_field() {
        for kind in [Kind::Sections, Kind::Rooms] {
            for field in kind.fields() {
                assert_eq!(Field::parse(field.as_str()), Some(*field));
                assert_eq!(field.kind(), kind);
            }
        }
        assert_eq!(Field::parse("seat"), None);
        assert_eq!(Field::parse("AVG"), None);
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(Kind::Sections.fields().len(), 10);
        assert_eq!(Kind::Rooms.fields().len(), 11);
        let numeric = Kind::Sections
            .fields()
            .iter()
            .chain(Kind::Rooms.fields())
            .filter(|f| f.is_numeric())
            .count();
        assert_eq!(numeric, 8);
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(Field::Number.storage_key(), "room_number");
        assert_eq!(Field::Name.storage_key(), "room_name");
        assert_eq!(Field::Dept.storage_key(), "dept");
    }
}
