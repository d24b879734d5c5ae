/// Key parser
///
/// Turns `"<datasetId>_<field>"` strings into typed keys and tells keys
/// apart from bare applykeys.
use super::ast::{AnyKey, Key};
use crate::error::{Error, Result};
use crate::schema::{Field, FieldType};

/// Whether `id` may name a dataset: non-empty, not only whitespace, no `_`.
pub fn is_valid_dataset_id(id: &str) -> bool {
    !id.contains('_') && !id.trim().is_empty()
}

/// Whether `name` may name an APPLY column: non-empty, no `_`.
pub fn is_valid_apply_key(name: &str) -> bool {
    !name.is_empty() && !name.contains('_')
}

/// Parses a `datasetId_field` string.
pub fn parse_key(raw: &str) -> Result<Key> {
    let parts: Vec<&str> = raw.split('_').collect();
    if parts.len() != 2 {
        return Err(Error::malformed(format!("invalid key format: {:?}", raw)));
    }

    let (dataset_id, field_name) = (parts[0], parts[1]);
    if !is_valid_dataset_id(dataset_id) {
        return Err(Error::malformed(format!(
            "invalid dataset id in key {:?}",
            raw
        )));
    }

    let field = Field::parse(field_name)
        .ok_or_else(|| Error::malformed(format!("unknown field {:?} in key {:?}", field_name, raw)))?;

    Ok(Key::new(dataset_id, field))
}

/// Parses a key and requires its field to have the given value domain.
pub fn parse_typed_key(raw: &str, expected: FieldType) -> Result<Key> {
    let key = parse_key(raw)?;
    if key.field.field_type() != expected {
        let wanted = match expected {
            FieldType::Numeric => "numeric",
            FieldType::Textual => "textual",
        };
        return Err(Error::malformed(format!(
            "key {:?} does not refer to a {} field",
            raw, wanted
        )));
    }
    Ok(key)
}

/// Parses a COLUMNS / ORDER entry: a key if it contains `_`, else an applykey.
pub fn parse_any_key(raw: &str) -> Result<AnyKey> {
    if raw.contains('_') {
        parse_key(raw).map(AnyKey::Key)
    } else if raw.is_empty() {
        Err(Error::malformed("empty column name"))
    } else {
        Ok(AnyKey::Apply(raw.to_string()))
    }
}
