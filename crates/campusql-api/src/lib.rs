//! # CampusQL
//!
//! A JSON query engine over course-section and room datasets.
//!
//! ## Quick Start
//!
//! ```rust
//! use campusql::{Catalog, Kind, QueryEngine, Record};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::new();
//!     catalog.add_dataset(
//!         "ubc",
//!         Kind::Sections,
//!         vec![
//!             Record::new().with("dept", "cpsc").with("avg", 88.5),
//!             Record::new().with("dept", "cpsc").with("avg", 72.0),
//!             Record::new().with("dept", "math").with("avg", 91.0),
//!         ],
//!     )?;
//!
//!     let engine = QueryEngine::new(catalog);
//!     let rows = engine.perform_query(&json!({
//!         "WHERE": {},
//!         "OPTIONS": {"COLUMNS": ["ubc_dept", "overall"], "ORDER": "ubc_dept"},
//!         "TRANSFORMATIONS": {
//!             "GROUP": ["ubc_dept"],
//!             "APPLY": [{"overall": {"AVG": "ubc_avg"}}]
//!         }
//!     }))?;
//!
//!     assert_eq!(rows.len(), 2);
//!     println!("{}", serde_json::to_string(&rows)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! ```rust,no_run
//! use campusql::logging::LogConfig;
//!
//! let _guard = LogConfig::debug().init();
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod logging;

// Re-export core types
pub use campusql_core::query::{compile, compile_str, Query, ResultRow};
pub use campusql_core::{
    Dataset, DatasetInfo, DatasetProvider, Error, ErrorCategory, Field, FieldType, Kind, Record,
    Result, Value,
};

pub use catalog::Catalog;
pub use config::EngineConfig;
pub use engine::QueryEngine;
pub use logging::{LogConfig, LogFormat, LogOutput};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
