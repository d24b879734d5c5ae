/// Query compiler
///
/// Validates the query envelope, delegates each clause to its compiler and
/// resolves the single dataset the query targets.
use super::ast::{collect_keys, AnyKey, Filter, Options, Query, Transformations};
use super::filter::compile_where;
use super::options::{compile_options, compile_transformations};
use crate::error::{Error, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use tracing::trace;

const QUERY_CLAUSES: [&str; 3] = ["WHERE", "OPTIONS", "TRANSFORMATIONS"];

/// Compiler for JSON query documents
pub struct Compiler<'a> {
    document: &'a JsonValue,
}

impl<'a> Compiler<'a> {
    /// Wraps an already-decoded query document
    pub fn new(document: &'a JsonValue) -> Self {
        Self { document }
    }

    /// Compile the document into a [`Query`]
    pub fn compile(&self) -> Result<Query> {
        let envelope = self
            .document
            .as_object()
            .ok_or_else(|| Error::malformed("query must be a JSON object"))?;

        let (Some(raw_where), Some(raw_options)) = (envelope.get("WHERE"), envelope.get("OPTIONS"))
        else {
            return Err(Error::malformed("missing WHERE or OPTIONS"));
        };

        if let Some(unexpected) = envelope
            .keys()
            .find(|k| !QUERY_CLAUSES.contains(&k.as_str()))
        {
            return Err(Error::malformed(format!(
                "unexpected clause in query: {}",
                unexpected
            )));
        }

        let filter = compile_where(raw_where)?;
        let options = compile_options(raw_options)?;
        let transformations = envelope
            .get("TRANSFORMATIONS")
            .map(compile_transformations)
            .transpose()?;

        check_addressable_columns(&options, transformations.as_ref())?;
        let dataset_id = resolve_dataset_id(&filter, &options, transformations.as_ref())?;

        trace!(dataset = %dataset_id, grouped = transformations.is_some(), "compiled query");
        Ok(Query::new(filter, options, transformations, dataset_id))
    }
}

/// Compile a decoded query document.
pub fn compile(document: &JsonValue) -> Result<Query> {
    Compiler::new(document).compile()
}

/// Decode and compile query text. Undecodable text is reported as malformed.
pub fn compile_str(text: &str) -> Result<Query> {
    let document: JsonValue = serde_json::from_str(text)
        .map_err(|e| Error::malformed(format!("invalid JSON: {}", e)))?;
    compile(&document)
}

fn check_addressable_columns(
    options: &Options,
    transformations: Option<&Transformations>,
) -> Result<()> {
    for column in &options.columns {
        match (transformations, column) {
            (Some(t), _) if !t.provides(column) => {
                return Err(Error::malformed(format!(
                    "COLUMNS key {} must be a GROUP key or an APPLY name",
                    column
                )));
            }
            (None, AnyKey::Apply(name)) => {
                return Err(Error::malformed(format!(
                    "COLUMNS key {} requires TRANSFORMATIONS",
                    name
                )));
            }
            _ => {}
        }
    }
    // ORDER keys are already known to be columns
    Ok(())
}

fn resolve_dataset_id(
    filter: &Filter,
    options: &Options,
    transformations: Option<&Transformations>,
) -> Result<String> {
    let ids: BTreeSet<&str> = collect_keys(filter, options, transformations)
        .into_iter()
        .map(|key| key.dataset_id.as_str())
        .collect();

    let mut ids = ids.into_iter();
    match (ids.next(), ids.next()) {
        (Some(id), None) => Ok(id.to_string()),
        (None, _) => Err(Error::AmbiguousOrMissingDataset(
            "query does not reference any dataset".to_string(),
        )),
        (Some(first), Some(second)) => Err(Error::AmbiguousOrMissingDataset(format!(
            "query references more than one dataset: {}, {}",
            first, second
        ))),
    }
}
