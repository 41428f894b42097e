use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::care::timestamp::{opt_epoch_millis, to_epoch_millis, Timestamp};
use crate::models::plant::{CareLog, CareType};

#[derive(Debug, Error, PartialEq)]
pub enum CareLogError {
    #[error("Care log requires a date")]
    MissingDate,

    #[error("Care log date could not be read: {0}")]
    InvalidDate(String),
}

/// A care log as submitted by a client, before normalization. The event
/// time may arrive under several field names; the first present wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCareLog {
    #[serde(rename = "type", default)]
    pub care_type: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub when: Option<Timestamp>,
    #[serde(default)]
    pub datetime: Option<Timestamp>,
    #[serde(default)]
    pub at: Option<Timestamp>,
    /// The parent plant's current `lastCareAt`, if the caller has it.
    #[serde(default)]
    pub plant_last_care_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedCareLog {
    pub care_log: CareLog,
    /// Value the caller should write to the parent plant's `lastCareAt`.
    pub last_care_at: i64,
}

/// Normalizes a submitted care log for persistence.
///
/// Unknown care types are filed as `general`. A backdated log never moves
/// the plant's `lastCareAt` backwards.
pub fn prepare_care_log(new: NewCareLog) -> Result<PreparedCareLog, CareLogError> {
    let raw_date = [&new.date, &new.created_at, &new.when, &new.datetime, &new.at]
        .into_iter()
        .find_map(Option::as_ref)
        .ok_or(CareLogError::MissingDate)?;

    let event_ms = to_epoch_millis(raw_date)
        .ok_or_else(|| CareLogError::InvalidDate(describe(raw_date)))?;

    let last_care_at = opt_epoch_millis(new.plant_last_care_at.as_ref())
        .map_or(event_ms, |existing| existing.max(event_ms));

    Ok(PreparedCareLog {
        care_log: CareLog {
            id: None,
            care_type: CareType::from_raw(&new.care_type),
            notes: new.notes.filter(|n| !n.trim().is_empty()),
            photo_url: new.photo_url.filter(|u| !u.trim().is_empty()),
            created_at: Some(Timestamp::from(event_ms)),
        },
        last_care_at,
    })
}

fn describe(value: &Timestamp) -> String {
    match value {
        Timestamp::Text(s) => s.clone(),
        other => format!("{other:?}"),
    }
}
