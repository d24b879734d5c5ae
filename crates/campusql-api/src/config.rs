//! Engine configuration

use campusql_core::Result;
use serde::Deserialize;
use std::path::Path;

/// Default cap on the number of rows a query may return
pub const DEFAULT_MAX_RESULT_ROWS: usize = 5000;

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Queries producing more rows than this fail with `ResultTooLarge`
    pub max_result_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_result_rows: DEFAULT_MAX_RESULT_ROWS,
        }
    }
}

impl EngineConfig {
    /// Set the result row cap
    pub fn with_max_result_rows(mut self, rows: usize) -> Self {
        self.max_result_rows = rows;
        self
    }

    /// Reads a JSON config file; missing fields keep their defaults.
    ///
    /// ```rust,no_run
    /// use campusql::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_json_file("campusql.json")?;
    /// # Ok::<(), campusql::Error>(())
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(EngineConfig::default().max_result_rows, 5000);
        assert_eq!(
            EngineConfig::default().with_max_result_rows(10).max_result_rows,
            10
        );
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig = serde_json::from_str(r#"{"max_result_rows": 7}"#).unwrap();
        assert_eq!(config.max_result_rows, 7);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{"max_rows": 7}"#).is_err());
    }
}
