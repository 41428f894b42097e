//! Dataset normalization.
//!
//! The bundled dataset grew by hand and by script, so rows disagree on shape:
//! guide text may be nested under `guide` or flat on the row, ids may be
//! missing or numeric, images may be bare filenames. `normalize_records`
//! turns every row into a [`PlantRecord`] and never fails; a malformed field
//! simply ends up absent.

use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::catalog::text::slugify;
use crate::models::catalog::{CadenceDays, Guide, PlantRecord, Source};

const PLACEHOLDER_IMAGE: &str = "placeholder.jpg";

pub fn normalize_records(raw: &[Value], image_root: &str) -> Vec<PlantRecord> {
    let mut seen = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut record = normalize_row(row, idx, image_root);
            let unique = unique_id(&record.id, &seen);
            if unique != record.id {
                warn!(
                    "Duplicate dataset id '{}' at row {idx}; renamed to '{unique}'",
                    record.id
                );
                record.id = unique;
            }
            seen.insert(record.id.clone());
            record
        })
        .collect()
}

fn normalize_row(row: &Value, idx: usize, image_root: &str) -> PlantRecord {
    let name = text_field(row.get("name"));
    let species = text_field(row.get("species"));

    let id = text_field(row.get("id"))
        .or_else(|| name.as_deref().map(slugify).filter(|s| !s.is_empty()))
        .or_else(|| species.as_deref().map(slugify).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| format!("plant-{idx}"));

    let display_name = name
        .or_else(|| species.clone())
        .unwrap_or_else(|| format!("Plant {}", idx + 1));

    let image = resolve_image(row.get("image"), &id, image_root);

    PlantRecord {
        guide: read_guide(row),
        sources: read_sources(row.get("sources")),
        id,
        name: display_name,
        species,
        image: Some(image),
    }
}

/// Reads each guide field from `row.guide` first, then from the row itself.
fn read_guide(row: &Value) -> Guide {
    let nested = row.get("guide").filter(|g| g.is_object());
    let field = |key: &str| {
        text_field(nested.and_then(|g| g.get(key))).or_else(|| text_field(row.get(key)))
    };

    let cadence = nested
        .and_then(|g| g.get("cadenceDays"))
        .or_else(|| row.get("cadenceDays"))
        .map(|c| CadenceDays {
            water: positive_days(c.get("water")),
            fertilizer: positive_days(c.get("fertilizer")),
        })
        .filter(|c| !c.is_empty());

    Guide {
        water: field("water"),
        light: field("light"),
        fertilizer: field("fertilizer"),
        notes: field("notes"),
        cadence_days: cadence,
    }
}

fn read_sources(value: Option<&Value>) -> Vec<Source> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|s| Source {
            title: text_field(s.get("title")),
            url: text_field(s.get("url")),
        })
        .filter(|s| s.title.is_some() || s.url.is_some())
        .collect()
}

fn resolve_image(value: Option<&Value>, id: &str, image_root: &str) -> String {
    let provided = value.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty());
    match provided {
        Some(path) if path.starts_with('/') || path.contains("://") => path.to_string(),
        Some(file) => format!("/{}/{id}/{file}", image_root.trim_matches('/')),
        None => format!("/{}/{id}/{PLACEHOLDER_IMAGE}", image_root.trim_matches('/')),
    }
}

fn unique_id(candidate: &str, seen: &HashSet<String>) -> String {
    if !seen.contains(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{candidate}-{n}"))
        .find(|id| !seen.contains(id))
        .unwrap_or_else(|| candidate.to_string())
}

/// Trimmed, non-empty text from a string or number value.
fn text_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn positive_days(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite() && *d >= 1.0 && *d <= f64::from(u32::MAX))
        .map(|d| d.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "plants_local_examples";

    #[test]
    fn test_full_row_is_kept() {
        let rows = vec![json!({
            "id": "monstera",
            "name": " Monstera ",
            "species": "Monstera deliciosa",
            "guide": {"water": "Weekly", "light": "Bright, indirect"},
            "sources": [{"title": "RHS", "url": "https://www.rhs.org.uk"}],
            "image": "/img/monstera.jpg"
        })];
        let records = normalize_records(&rows, ROOT);
        let r = &records[0];
        assert_eq!(r.id, "monstera");
        assert_eq!(r.name, "Monstera");
        assert_eq!(r.species.as_deref(), Some("Monstera deliciosa"));
        assert_eq!(r.guide.water.as_deref(), Some("Weekly"));
        assert_eq!(r.sources.len(), 1);
        assert_eq!(r.image.as_deref(), Some("/img/monstera.jpg"));
    }

    #[test]
    fn test_id_and_name_fallbacks() {
        let rows = vec![
            json!({"name": "Snake Plant"}),
            json!({"species": "Ficus lyrata"}),
            json!({}),
        ];
        let records = normalize_records(&rows, ROOT);
        assert_eq!(records[0].id, "snake-plant");
        assert_eq!(records[1].id, "ficus-lyrata");
        assert_eq!(records[1].name, "Ficus lyrata");
        assert_eq!(records[2].id, "plant-2");
        assert_eq!(records[2].name, "Plant 3");
    }

    #[test]
    fn test_flat_guide_fields_and_nested_precedence() {
        let rows = vec![json!({
            "name": "Pothos",
            "water": "flat water",
            "notes": "flat notes",
            "guide": {"water": "nested water"}
        })];
        let guide = &normalize_records(&rows, ROOT)[0].guide;
        assert_eq!(guide.water.as_deref(), Some("nested water"));
        assert_eq!(guide.notes.as_deref(), Some("flat notes"));
        assert!(guide.light.is_none());
    }

    #[test]
    fn test_cadence_days_read_and_validated() {
        let rows = vec![
            json!({"name": "Aloe", "guide": {"cadenceDays": {"water": 20, "fertilizer": 60}}}),
            json!({"name": "Bad", "guide": {"cadenceDays": {"water": 0, "fertilizer": "x"}}}),
        ];
        let records = normalize_records(&rows, ROOT);
        assert_eq!(
            records[0].guide.cadence_days,
            Some(CadenceDays {
                water: Some(20),
                fertilizer: Some(60)
            })
        );
        assert_eq!(records[1].guide.cadence_days, None);
    }

    #[test]
    fn test_empty_sources_dropped() {
        let rows = vec![json!({
            "name": "Fern",
            "sources": [{"title": ""}, {"url": "https://example.org"}, "junk"]
        })];
        let sources = &normalize_records(&rows, ROOT)[0].sources;
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].url.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_image_path_synthesis() {
        let rows = vec![
            json!({"id": "zz", "image": "zz.jpg"}),
            json!({"id": "aloe"}),
            json!({"id": "cdn", "image": "https://cdn.example.org/a.jpg"}),
        ];
        let records = normalize_records(&rows, ROOT);
        assert_eq!(
            records[0].image.as_deref(),
            Some("/plants_local_examples/zz/zz.jpg")
        );
        assert_eq!(
            records[1].image.as_deref(),
            Some("/plants_local_examples/aloe/placeholder.jpg")
        );
        assert_eq!(
            records[2].image.as_deref(),
            Some("https://cdn.example.org/a.jpg")
        );
    }

    #[test]
    fn test_numeric_id_and_duplicates() {
        let rows = vec![
            json!({"id": 7, "name": "A"}),
            json!({"id": "7", "name": "B"}),
            json!({"name": "A"}),
            json!({"name": "A"}),
        ];
        let ids: Vec<_> = normalize_records(&rows, ROOT)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["7", "7-2", "a", "a-2"]);
    }

    #[test]
    fn test_non_object_rows_degrade() {
        let rows = vec![json!("not a record"), json!(null)];
        let records = normalize_records(&rows, ROOT);
        assert_eq!(records[0].name, "Plant 1");
        assert_eq!(records[1].id, "plant-1");
    }
}
