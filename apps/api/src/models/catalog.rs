use serde::{Deserialize, Serialize};

/// A reference link attached to a dataset record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Per-species care cadence in days, as carried by the bundled dataset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CadenceDays {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertilizer: Option<u32>,
}

impl CadenceDays {
    pub fn is_empty(&self) -> bool {
        self.water.is_none() && self.fertilizer.is_none()
    }
}

/// Advisory care text. No field has numeric meaning except `cadence_days`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertilizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_days: Option<CadenceDays>,
}

/// A normalized entry of the bundled plant dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub guide: Guide,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
