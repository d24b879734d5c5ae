/// Filter compiler
///
/// Compiles the WHERE clause into a [`Filter`] tree.
use super::ast::{Comparator, Filter, LogicOperator, Pattern};
use super::keys::parse_typed_key;
use crate::error::{Error, Result};
use crate::schema::FieldType;
use serde_json::{Map, Value as JsonValue};

/// Compiles the value of `WHERE`. An empty object yields [`Filter::Empty`].
pub fn compile_where(node: &JsonValue) -> Result<Filter> {
    let body = node
        .as_object()
        .ok_or_else(|| Error::malformed("WHERE must be an object"))?;

    match body.len() {
        0 => Ok(Filter::Empty),
        1 => compile_filter(body),
        n => Err(Error::malformed(format!(
            "WHERE should only have 1 key, has {}",
            n
        ))),
    }
}

/// Compiles one filter object; exactly one key is required.
pub fn compile_filter(node: &Map<String, JsonValue>) -> Result<Filter> {
    let (clause, value) = single_entry(node, "filter")?;

    match clause.as_str() {
        "AND" => compile_logic(LogicOperator::And, clause, value),
        "OR" => compile_logic(LogicOperator::Or, clause, value),
        "LT" => compile_compare(Comparator::Lt, clause, value),
        "GT" => compile_compare(Comparator::Gt, clause, value),
        "EQ" => compile_compare(Comparator::Eq, clause, value),
        "IS" => compile_match(value),
        "NOT" => {
            let inner = value
                .as_object()
                .ok_or_else(|| Error::malformed("NOT must be an object"))?;
            Ok(Filter::Not(Box::new(compile_filter(inner)?)))
        }
        other => Err(Error::malformed(format!("invalid filter key: {}", other))),
    }
}

fn compile_logic(op: LogicOperator, clause: &str, value: &JsonValue) -> Result<Filter> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::malformed(format!("{} must be an array", clause)))?;

    if items.is_empty() {
        return Err(Error::malformed(format!(
            "{} must be a non-empty array",
            clause
        )));
    }

    let mut operands = Vec::with_capacity(items.len());
    for item in items {
        let node = item.as_object().ok_or_else(|| {
            Error::malformed(format!("filter in {} must be an object", clause))
        })?;
        operands.push(compile_filter(node)?);
    }

    Ok(Filter::Logic { op, operands })
}

fn compile_compare(op: Comparator, clause: &str, value: &JsonValue) -> Result<Filter> {
    let body = value
        .as_object()
        .ok_or_else(|| Error::malformed(format!("{} must be an object", clause)))?;
    let (raw_key, operand) = single_entry(body, clause)?;

    let key = parse_typed_key(raw_key, FieldType::Numeric)?;
    let value = operand.as_f64().ok_or_else(|| {
        Error::malformed(format!(
            "{} expects a number, got {}",
            clause,
            json_type_name(operand)
        ))
    })?;

    Ok(Filter::Compare { op, key, value })
}

fn compile_match(value: &JsonValue) -> Result<Filter> {
    let body = value
        .as_object()
        .ok_or_else(|| Error::malformed("IS must be an object"))?;
    let (raw_key, operand) = single_entry(body, "IS")?;

    let key = parse_typed_key(raw_key, FieldType::Textual)?;
    let input = operand.as_str().ok_or_else(|| {
        Error::malformed(format!(
            "IS expects a string, got {}",
            json_type_name(operand)
        ))
    })?;
    let pattern = Pattern::parse(input).ok_or_else(|| {
        Error::malformed(format!(
            "invalid input string {:?}: asterisk (*) can only be the first or last character",
            input
        ))
    })?;

    Ok(Filter::Match { key, pattern })
}

fn single_entry<'a>(
    node: &'a Map<String, JsonValue>,
    what: &str,
) -> Result<(&'a String, &'a JsonValue)> {
    let mut entries = node.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(Error::malformed(format!(
            "{} must have exactly 1 key, has {}",
            what,
            node.len()
        ))),
    }
}

pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
