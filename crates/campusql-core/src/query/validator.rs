/// Kind validator
///
/// Checks that a compiled query only names fields of the dataset kind it
/// runs against. The query is never modified.
use super::ast::Query;
use crate::error::{Error, Result};
use crate::schema::Kind;

/// Rejects the first key whose field belongs to the other kind.
pub fn validate_kind(query: &Query, kind: Kind) -> Result<()> {
    match query.keys().into_iter().find(|key| key.field.kind() != kind) {
        Some(key) => Err(Error::KindMismatch(format!(
            "key {} is not a field of a {} dataset",
            key, kind
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compiler::compile;
    use serde_json::json;

    #[test]
    fn test_sections_query_on_sections() {
        let query = compile(&json!({
            "WHERE": {"IS": {"ubc_instructor": "*smith*"}},
            "OPTIONS": {"COLUMNS": ["ubc_dept", "ubc_avg"]}
        }))
        .unwrap();
        assert!(validate_kind(&query, Kind::Sections).is_ok());
        assert!(matches!(
            validate_kind(&query, Kind::Rooms),
            Err(Error::KindMismatch(_))
        ));
    }

    #[test]
    fn test_mismatch_found_in_apply_keys() {
        let query = compile(&json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["rooms_shortname", "cap"]},
            "TRANSFORMATIONS": {
                "GROUP": ["rooms_shortname"],
                "APPLY": [{"cap": {"MAX": "rooms_avg"}}]
            }
        }))
        .unwrap();
        assert!(matches!(
            validate_kind(&query, Kind::Rooms),
            Err(Error::KindMismatch(_))
        ));
    }

    #[test]
    fn test_rooms_query_on_rooms() {
        let query = compile(&json!({
            "WHERE": {"GT": {"rooms_seats": 100}},
            "OPTIONS": {"COLUMNS": ["rooms_name", "rooms_number"], "ORDER": "rooms_name"}
        }))
        .unwrap();
        assert!(validate_kind(&query, Kind::Rooms).is_ok());
    }
}
