//! # CampusQL Core
//!
//! Schema, records, datasets and the JSON query engine for CampusQL.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod error;
pub mod query;
pub mod record;
pub mod schema;

pub use dataset::{Dataset, DatasetInfo, DatasetProvider};
pub use error::{Error, ErrorCategory, Result};
pub use record::{Record, Value};
pub use schema::{Field, FieldType, Kind};
