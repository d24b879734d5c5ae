//! Query entry point

use crate::config::EngineConfig;
use campusql_core::query::{compile, compile_str, execute, validate_kind, Query, ResultRow};
use campusql_core::{DatasetProvider, Error, Result};
use serde_json::Value as JsonValue;
use tracing::{debug, info_span, warn};

/// Runs JSON queries against the datasets of a provider.
///
/// Compile errors and kind mismatches are reported before any record is
/// read; a runtime error yields no rows at all.
///
/// # Examples
///
/// ```rust
/// use campusql::{Catalog, Kind, QueryEngine, Record};
///
/// let catalog = Catalog::new();
/// catalog.add_dataset(
///     "ubc",
///     Kind::Sections,
///     vec![Record::new().with("dept", "cpsc").with("avg", 91.0)],
/// )?;
///
/// let engine = QueryEngine::new(catalog);
/// let rows = engine.perform_query_str(
///     r#"{"WHERE": {"GT": {"ubc_avg": 90}}, "OPTIONS": {"COLUMNS": ["ubc_dept"]}}"#,
/// )?;
/// assert_eq!(rows.len(), 1);
/// # Ok::<(), campusql::Error>(())
/// ```
pub struct QueryEngine<P> {
    provider: P,
    config: EngineConfig,
}

impl<P: DatasetProvider> QueryEngine<P> {
    /// Engine with the default configuration
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, EngineConfig::default())
    }

    /// Engine with a custom configuration
    pub fn with_config(provider: P, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The dataset provider queries resolve against
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs a decoded query document.
    pub fn perform_query(&self, document: &JsonValue) -> Result<Vec<ResultRow>> {
        let query = compile(document)?;
        self.run(&query)
    }

    /// Decodes and runs query text.
    pub fn perform_query_str(&self, text: &str) -> Result<Vec<ResultRow>> {
        let query = compile_str(text)?;
        self.run(&query)
    }

    /// Runs an already compiled query.
    pub fn run(&self, query: &Query) -> Result<Vec<ResultRow>> {
        let span = info_span!("query", dataset = query.dataset_id());
        let _enter = span.enter();

        let dataset = self.provider.require(query.dataset_id())?;
        validate_kind(query, dataset.kind())?;

        let rows = execute(query, &dataset)?;
        let limit = self.config.max_result_rows;
        if rows.len() > limit {
            warn!(rows = rows.len(), limit, "result too large");
            return Err(Error::ResultTooLarge {
                rows: rows.len(),
                limit,
            });
        }

        debug!(rows = rows.len(), "query complete");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;
    use campusql_core::{Kind, Record};
    use serde_json::json;

    fn engine(limit: usize) -> QueryEngine<Catalog> {
        let catalog = Catalog::new();
        let records = (0..10)
            .map(|i| Record::new().with("seats", i as f64).with("shortname", "DMP"))
            .collect();
        catalog.add_dataset("rooms", Kind::Rooms, records).unwrap();
        QueryEngine::with_config(catalog, EngineConfig::default().with_max_result_rows(limit))
    }

    #[test]
    fn test_result_cap() {
        let query = json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_seats"]}});
        assert_eq!(engine(10).perform_query(&query).unwrap().len(), 10);
        assert!(matches!(
            engine(9).perform_query(&query),
            Err(Error::ResultTooLarge { rows: 10, limit: 9 })
        ));
    }

    #[test]
    fn test_unknown_dataset() {
        let err = engine(10)
            .perform_query(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["ubc_dept"]}}))
            .unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound(_)));
    }

    #[test]
    fn test_kind_mismatch_before_execution() {
        let err = engine(10)
            .perform_query(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_avg"]}}))
            .unwrap_err();
        assert!(matches!(err, Error::KindMismatch(_)));
    }
}
