/// Options compiler
///
/// Compiles OPTIONS (COLUMNS, ORDER) and TRANSFORMATIONS (GROUP, APPLY).
use super::ast::{ApplyRule, ApplyToken, Direction, Key, Options, Order, Transformations};
use super::filter::json_type_name;
use super::keys::{is_valid_apply_key, parse_any_key, parse_key};
use crate::error::{Error, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

const OPTIONS_CLAUSES: [&str; 2] = ["COLUMNS", "ORDER"];
const ORDER_CLAUSES: [&str; 2] = ["dir", "keys"];

/// Compiles the value of `OPTIONS`.
pub fn compile_options(node: &JsonValue) -> Result<Options> {
    let body = node
        .as_object()
        .ok_or_else(|| Error::malformed("OPTIONS must be an object"))?;

    if let Some(unexpected) = body.keys().find(|k| !OPTIONS_CLAUSES.contains(&k.as_str())) {
        return Err(Error::malformed(format!(
            "invalid clause in OPTIONS: {}",
            unexpected
        )));
    }

    let raw_columns = body
        .get("COLUMNS")
        .ok_or_else(|| Error::malformed("OPTIONS missing COLUMNS"))?;
    let column_names = string_list(raw_columns, "COLUMNS")?;
    if column_names.is_empty() {
        return Err(Error::malformed("COLUMNS must be a non-empty array"));
    }

    // a repeated column is projected once, at its first position
    let mut seen = HashSet::new();
    let columns = column_names
        .iter()
        .filter(|name| seen.insert(**name))
        .map(|name| parse_any_key(name))
        .collect::<Result<Vec<_>>>()?;

    let order = match body.get("ORDER") {
        Some(raw_order) => Some(compile_order(raw_order, &column_names)?),
        None => None,
    };

    Ok(Options { columns, order })
}

fn compile_order(node: &JsonValue, columns: &[&str]) -> Result<Order> {
    match node {
        JsonValue::String(name) => {
            require_in_columns(name, columns)?;
            Ok(Order::Single(parse_any_key(name)?))
        }
        JsonValue::Object(body) if body.len() == ORDER_CLAUSES.len() => {
            if let Some(unexpected) = body.keys().find(|k| !ORDER_CLAUSES.contains(&k.as_str())) {
                return Err(Error::malformed(format!(
                    "invalid ORDER clause: {}",
                    unexpected
                )));
            }

            let direction = match body.get("dir").and_then(JsonValue::as_str) {
                Some("UP") => Direction::Up,
                Some("DOWN") => Direction::Down,
                _ => return Err(Error::malformed("invalid ORDER direction")),
            };

            let names = body
                .get("keys")
                .ok_or_else(|| Error::malformed("ORDER missing keys"))
                .and_then(|raw| string_list(raw, "ORDER keys"))?;
            if names.is_empty() {
                return Err(Error::malformed("ORDER keys must be a non-empty array"));
            }

            let mut keys = Vec::with_capacity(names.len());
            for name in names {
                require_in_columns(name, columns)?;
                keys.push(parse_any_key(name)?);
            }

            Ok(Order::Multi { direction, keys })
        }
        _ => Err(Error::malformed("invalid ORDER format")),
    }
}

fn require_in_columns(name: &str, columns: &[&str]) -> Result<()> {
    if columns.contains(&name) {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "ORDER key {:?} must be in COLUMNS",
            name
        )))
    }
}

/// Compiles the value of `TRANSFORMATIONS`.
pub fn compile_transformations(node: &JsonValue) -> Result<Transformations> {
    let body = node
        .as_object()
        .ok_or_else(|| Error::malformed("TRANSFORMATIONS must be an object"))?;

    if let Some(unexpected) = body.keys().find(|k| *k != "GROUP" && *k != "APPLY") {
        return Err(Error::malformed(format!(
            "unexpected key in TRANSFORMATIONS: {}",
            unexpected
        )));
    }

    let group = body
        .get("GROUP")
        .ok_or_else(|| Error::malformed("TRANSFORMATIONS missing GROUP"))
        .and_then(compile_group)?;
    let apply = body
        .get("APPLY")
        .ok_or_else(|| Error::malformed("TRANSFORMATIONS missing APPLY"))
        .and_then(compile_apply)?;

    Ok(Transformations { group, apply })
}

fn compile_group(node: &JsonValue) -> Result<Vec<Key>> {
    let names = string_list(node, "GROUP")?;
    if names.is_empty() {
        return Err(Error::malformed("GROUP must be a non-empty array"));
    }

    names
        .into_iter()
        .map(|name| {
            if !name.contains('_') {
                return Err(Error::malformed(format!(
                    "GROUP keys must be dataset keys, got {:?}",
                    name
                )));
            }
            parse_key(name)
        })
        .collect()
}

fn compile_apply(node: &JsonValue) -> Result<Vec<ApplyRule>> {
    let items = node
        .as_array()
        .ok_or_else(|| Error::malformed("APPLY must be an array"))?;

    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(items.len());
    for item in items {
        let rule = item
            .as_object()
            .ok_or_else(|| Error::malformed("APPLYRULE must be an object"))
            .and_then(compile_apply_rule)?;

        if !seen.insert(rule.name.clone()) {
            return Err(Error::malformed(format!(
                "duplicate applykey in APPLY: {}",
                rule.name
            )));
        }
        rules.push(rule);
    }

    Ok(rules)
}

fn compile_apply_rule(node: &Map<String, JsonValue>) -> Result<ApplyRule> {
    if node.len() != 1 {
        return Err(Error::malformed(format!(
            "APPLYRULE must have 1 key, has {}",
            node.len()
        )));
    }
    let Some((name, body)) = node.iter().next() else {
        return Err(Error::malformed("APPLYRULE must have 1 key"));
    };

    if !is_valid_apply_key(name) {
        return Err(Error::malformed(format!("invalid applykey: {:?}", name)));
    }

    let body = body
        .as_object()
        .ok_or_else(|| Error::malformed(format!("APPLYRULE {} must map to an object", name)))?;
    if body.len() != 1 {
        return Err(Error::malformed(format!(
            "APPLYRULE {} must have 1 token, has {}",
            name,
            body.len()
        )));
    }
    let Some((raw_token, target)) = body.iter().next() else {
        return Err(Error::malformed("APPLYRULE must have 1 token"));
    };

    let token = ApplyToken::parse(raw_token)
        .ok_or_else(|| Error::malformed(format!("invalid APPLYTOKEN: {}", raw_token)))?;
    let target = target.as_str().ok_or_else(|| {
        Error::malformed(format!(
            "APPLY target must be a key string, got {}",
            json_type_name(target)
        ))
    })?;

    Ok(ApplyRule {
        name: name.clone(),
        token,
        key: parse_key(target)?,
    })
}

fn string_list<'a>(node: &'a JsonValue, what: &str) -> Result<Vec<&'a str>> {
    let items = node
        .as_array()
        .ok_or_else(|| Error::malformed(format!("{} must be an array", what)))?;

    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| {
                Error::malformed(format!(
                    "{} entries must be strings, got {}",
                    what,
                    json_type_name(item)
                ))
            })
        })
        .collect()
}
