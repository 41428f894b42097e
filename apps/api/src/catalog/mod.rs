//! Bundled plant-care reference dataset: normalization, local search, and
//! guide resolution. Loaded once at startup and read-only afterwards.

pub mod guides;
pub mod handlers;
pub mod normalize;
pub mod search;
pub mod sources;
pub mod text;

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::catalog::guides::MatchKey;
use crate::catalog::normalize::normalize_records;
use crate::catalog::search::SearchKey;
use crate::models::catalog::PlantRecord;

const BUNDLED_DATASET: &str = include_str!("../../data/plants_local.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset must be a JSON array of plant records")]
    NotAnArray,
}

/// The normalized dataset plus the folded keys search and matching use.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<PlantRecord>,
    by_id: HashMap<String, usize>,
    search_keys: Vec<SearchKey>,
    match_keys: Vec<MatchKey>,
}

impl Catalog {
    pub fn from_raw(raw: &[Value], image_root: &str) -> Self {
        let records = normalize_records(raw, image_root);
        let by_id = records
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();
        let search_keys = records.iter().map(SearchKey::for_record).collect();
        let match_keys = records.iter().map(MatchKey::for_record).collect();
        Self {
            records,
            by_id,
            search_keys,
            match_keys,
        }
    }

    pub fn from_json(json: &str, image_root: &str) -> Result<Self, CatalogError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(rows) => Ok(Self::from_raw(&rows, image_root)),
            _ => Err(CatalogError::NotAnArray),
        }
    }

    /// Loads the dataset from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>, image_root: &str) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json, image_root)?;
        info!(
            "Loaded {} plant records from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The dataset compiled into the binary.
    pub fn bundled(image_root: &str) -> Result<Self, CatalogError> {
        let catalog = Self::from_json(BUNDLED_DATASET, image_root)?;
        info!("Loaded {} bundled plant records", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&PlantRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
