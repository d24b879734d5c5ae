//! Datasets and the provider contract the engine reads them through.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::Kind;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable, kind-tagged collection of records.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: String,
    kind: Kind,
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from already-decoded records.
    pub fn new(id: impl Into<String>, kind: Kind, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            kind,
            records,
        }
    }

    /// Decodes records from a JSON array of flat objects.
    pub fn from_json(id: impl Into<String>, kind: Kind, json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::new(id, kind, records))
    }

    /// Dataset id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record shape held by this dataset.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Records in storage order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Summary row for listings.
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            kind: self.kind,
            num_rows: self.records.len(),
        }
    }
}

/// Listing entry for a stored dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    /// Dataset id
    pub id: String,
    /// Record shape
    pub kind: Kind,
    /// Number of records
    #[serde(rename = "numRows")]
    pub num_rows: usize,
}

/// Resolves dataset ids to snapshots.
///
/// Implementations hand out `Arc` snapshots so a query keeps reading the
/// same records even if the dataset is replaced mid-flight.
pub trait DatasetProvider {
    /// Returns the dataset registered under `id`, if any.
    fn get(&self, id: &str) -> Option<Arc<Dataset>>;

    /// Like [`DatasetProvider::get`] but reports a missing id as an error.
    fn require(&self, id: &str) -> Result<Arc<Dataset>> {
        self.get(id)
            .ok_or_else(|| Error::DatasetNotFound(id.to_string()))
    }
}

impl DatasetProvider for HashMap<String, Arc<Dataset>> {
    fn get(&self, id: &str) -> Option<Arc<Dataset>> {
        HashMap::get(self, id).cloned()
    }
}

impl<P: DatasetProvider + ?Sized> DatasetProvider for Arc<P> {
    fn get(&self, id: &str) -> Option<Arc<Dataset>> {
        (**self).get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn test_from_json() {
        let dataset = Dataset::from_json(
            "rooms",
            Kind::Rooms,
            r#"[{"shortname":"DMP","seats":120},{"shortname":"ANGU","seats":40}]"#,
        )
        .unwrap();
        assert_eq!(dataset.records().len(), 2);
        assert_eq!(dataset.info().num_rows, 2);
        assert!(dataset.records()[0].get(Field::Seats).is_some());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        let err = Dataset::from_json("x", Kind::Sections, r#"{"dept":"cpsc"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_hashmap_provider() {
        let mut map = HashMap::new();
        map.insert(
            "ubc".to_string(),
            Arc::new(Dataset::new("ubc", Kind::Sections, vec![])),
        );
        assert!(map.require("ubc").is_ok());
        assert!(matches!(map.require("sfu"), Err(Error::DatasetNotFound(_))));
    }
}
