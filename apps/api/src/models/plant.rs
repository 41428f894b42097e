use serde::{Deserialize, Serialize};

use crate::care::timestamp::Timestamp;

/// A user-owned houseplant as stored by the external document store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_care_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Kind of care performed. `sun` and `note` are legacy spellings; anything
/// unrecognised is filed as `general`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CareType {
    Water,
    Sunlight,
    Fertilizer,
    General,
}

impl CareType {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "water" => CareType::Water,
            "sunlight" | "sun" => CareType::Sunlight,
            "fertilizer" => CareType::Fertilizer,
            _ => CareType::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CareType::Water => "water",
            CareType::Sunlight => "sunlight",
            CareType::Fertilizer => "fertilizer",
            CareType::General => "general",
        }
    }
}

impl From<String> for CareType {
    fn from(raw: String) -> Self {
        CareType::from_raw(&raw)
    }
}

/// A single care event. `created_at` is when the care happened, not when
/// the record was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub care_type: CareType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_care_type_aliases() {
        assert_eq!(CareType::from_raw("sun"), CareType::Sunlight);
        assert_eq!(CareType::from_raw("note"), CareType::General);
        assert_eq!(CareType::from_raw(" Water "), CareType::Water);
        assert_eq!(CareType::from_raw("repot"), CareType::General);
    }

    #[test]
    fn test_care_log_deserializes_legacy_type() {
        let log: CareLog =
            serde_json::from_str(r#"{"type": "sun", "createdAt": 1700000000000}"#).unwrap();
        assert_eq!(log.care_type, CareType::Sunlight);
        assert!(log.created_at.is_some());
    }

    #[test]
    fn test_care_type_serializes_canonical_name() {
        let json = serde_json::to_string(&CareType::Fertilizer).unwrap();
        assert_eq!(json, "\"fertilizer\"");
    }
}
