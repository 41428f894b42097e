use serde::Serialize;

use crate::catalog::text::fold_for_match;
use crate::catalog::Catalog;
use crate::models::catalog::{Guide, PlantRecord, Source};

/// Used whenever no dataset record matches.
pub fn generic_guide() -> Guide {
    Guide {
        water: Some("Water when the top inch of soil feels dry. Ensure drainage.".to_string()),
        light: Some("Bright, indirect light is ideal; avoid harsh direct sun.".to_string()),
        fertilizer: Some("Diluted balanced fertilizer monthly in growing season.".to_string()),
        notes: Some("Adjust care based on season and your home\u{2019}s humidity/light.".to_string()),
        cadence_days: None,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResolution<'a> {
    pub guide: Guide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<&'a [Source]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_record: Option<&'a PlantRecord>,
}

impl GuideResolution<'_> {
    fn fallback() -> Self {
        Self {
            guide: generic_guide(),
            sources: None,
            matched_record: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Exact,
    Contains,
    Genus,
}

impl Catalog {
    /// Finds the best dataset guide for a plant's name and species.
    ///
    /// Three passes over the whole dataset, first hit wins: exact equality,
    /// containment in either direction, then genus (first word of the record
    /// name) as a prefix of the query. Species is tried before name within
    /// each pass. Always returns a guide.
    pub fn resolve_guide(&self, name: Option<&str>, species: Option<&str>) -> GuideResolution<'_> {
        let keys: Vec<String> = [species, name]
            .into_iter()
            .flatten()
            .map(fold_for_match)
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            return GuideResolution::fallback();
        }

        for pass in [Pass::Exact, Pass::Contains, Pass::Genus] {
            for key in &keys {
                let hit = self
                    .records
                    .iter()
                    .zip(&self.match_keys)
                    .find(|(_, mk)| mk.matches(pass, key));
                if let Some((record, _)) = hit {
                    return GuideResolution {
                        guide: record.guide.clone(),
                        sources: Some(record.sources.as_slice()),
                        matched_record: Some(record),
                    };
                }
            }
        }

        GuideResolution::fallback()
    }
}

/// Folded name/species/genus of one record, computed once at load.
#[derive(Debug, Clone)]
pub(crate) struct MatchKey {
    name: String,
    species: String,
    genus: String,
}

impl MatchKey {
    pub(crate) fn for_record(record: &PlantRecord) -> Self {
        let name = fold_for_match(&record.name);
        let genus = name.split(' ').next().unwrap_or_default().to_string();
        Self {
            species: record.species.as_deref().map(fold_for_match).unwrap_or_default(),
            genus,
            name,
        }
    }

    fn matches(&self, pass: Pass, key: &str) -> bool {
        let fields = [self.name.as_str(), self.species.as_str()];
        let mut present = fields.iter().filter(|f| !f.is_empty());
        match pass {
            Pass::Exact => present.any(|f| *f == key),
            Pass::Contains => present.any(|f| f.contains(key) || key.contains(f)),
            Pass::Genus => !self.genus.is_empty() && key.starts_with(&self.genus),
        }
    }
}
