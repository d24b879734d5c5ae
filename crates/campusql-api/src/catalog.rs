//! In-memory dataset catalog

use campusql_core::query::keys::is_valid_dataset_id;
use campusql_core::{Dataset, DatasetInfo, DatasetProvider, Error, Kind, Record, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Registry of named datasets.
///
/// Cloning hands out another handle to the same registry. Readers get
/// `Arc` snapshots, so a running query is unaffected by later removals.
///
/// # Examples
///
/// ```rust
/// use campusql::{Catalog, Kind, Record};
///
/// let catalog = Catalog::new();
/// let ids = catalog.add_dataset(
///     "rooms",
///     Kind::Rooms,
///     vec![Record::new().with("shortname", "DMP").with("seats", 120.0)],
/// )?;
/// assert_eq!(ids, ["rooms"]);
/// # Ok::<(), campusql::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<HashMap<String, Arc<Dataset>>>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset and returns every registered id, sorted.
    ///
    /// Fails with `InvalidDataset` if the id is empty, whitespace only,
    /// contains `_`, or is already taken.
    pub fn add_dataset(&self, id: &str, kind: Kind, records: Vec<Record>) -> Result<Vec<String>> {
        check_id(id)?;

        let mut datasets = self.inner.write().map_err(|_| Error::LockPoisoned)?;
        if datasets.contains_key(id) {
            return Err(Error::InvalidDataset(format!(
                "dataset {:?} already added",
                id
            )));
        }

        let num_rows = records.len();
        datasets.insert(id.to_string(), Arc::new(Dataset::new(id, kind, records)));
        info!(dataset = id, %kind, num_rows, "dataset added");

        let mut ids: Vec<String> = datasets.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Like [`Catalog::add_dataset`], with records decoded from a JSON array
    /// of flat objects.
    pub fn add_dataset_json(&self, id: &str, kind: Kind, json: &str) -> Result<Vec<String>> {
        check_id(id)?;
        let records: Vec<Record> = serde_json::from_str(json)?;
        debug!(dataset = id, records = records.len(), "decoded dataset");
        self.add_dataset(id, kind, records)
    }

    /// Unregisters a dataset and returns its id.
    pub fn remove_dataset(&self, id: &str) -> Result<String> {
        check_id(id)?;

        let mut datasets = self.inner.write().map_err(|_| Error::LockPoisoned)?;
        match datasets.remove(id) {
            Some(_) => {
                info!(dataset = id, "dataset removed");
                Ok(id.to_string())
            }
            None => Err(Error::DatasetNotFound(id.to_string())),
        }
    }

    /// Summaries of every registered dataset, ordered by id.
    pub fn list_datasets(&self) -> Result<Vec<DatasetInfo>> {
        let datasets = self.inner.read().map_err(|_| Error::LockPoisoned)?;
        let mut listing: Vec<DatasetInfo> = datasets.values().map(|d| d.info()).collect();
        listing.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(listing)
    }
}

impl DatasetProvider for Catalog {
    fn get(&self, id: &str) -> Option<Arc<Dataset>> {
        self.inner.read().ok()?.get(id).cloned()
    }
}

fn check_id(id: &str) -> Result<()> {
    if is_valid_dataset_id(id) {
        Ok(())
    } else {
        Err(Error::InvalidDataset(format!("invalid dataset id {:?}", id)))
    }
}
