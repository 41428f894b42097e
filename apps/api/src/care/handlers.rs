use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::care::format::format_next_care;
use crate::care::logs::{prepare_care_log, NewCareLog, PreparedCareLog};
use crate::care::schedule::{compute_next_care, Cadence, NextCareEstimate};
use crate::care::timestamp::{opt_epoch_millis, Timestamp};
use crate::errors::AppError;
use crate::models::plant::{CareLog, Plant};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCareRequest {
    pub plant: Plant,
    #[serde(default)]
    pub care_logs: Vec<CareLog>,
    /// Evaluate as of this instant instead of the server clock.
    #[serde(default)]
    pub as_of: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCareResponse {
    pub estimate: NextCareEstimate,
    pub display: String,
    pub cadence: Cadence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_record_id: Option<String>,
}

/// POST /api/v1/care/next
pub async fn handle_next_care(
    State(state): State<AppState>,
    Json(req): Json<NextCareRequest>,
) -> Result<Json<NextCareResponse>, AppError> {
    let now_ms = match &req.as_of {
        Some(ts) => opt_epoch_millis(Some(ts))
            .ok_or_else(|| AppError::Validation("asOf is not a readable timestamp".into()))?,
        None => Utc::now().timestamp_millis(),
    };

    let mut cadence = state.config.default_cadence;
    let mut guide_record_id = None;
    if state.config.species_cadence {
        let resolution = state
            .catalog
            .resolve_guide(Some(req.plant.name.as_str()), req.plant.species.as_deref());
        cadence = cadence.with_overrides(resolution.guide.cadence_days.as_ref());
        guide_record_id = resolution.matched_record.map(|r| r.id.clone());
    }

    let estimate = compute_next_care(&req.plant, &req.care_logs, &cadence, now_ms);
    let display = format_next_care(Some(&estimate));

    Ok(Json(NextCareResponse {
        estimate,
        display,
        cadence,
        guide_record_id,
    }))
}

/// POST /api/v1/care/logs
pub async fn handle_prepare_care_log(
    Json(req): Json<NewCareLog>,
) -> Result<Json<PreparedCareLog>, AppError> {
    let prepared = prepare_care_log(req).map_err(|e| AppError::Validation(e.to_string()))?;
    tracing::debug!(
        "Prepared {} care log, lastCareAt={}",
        prepared.care_log.care_type.as_str(),
        prepared.last_care_at
    );
    Ok(Json(prepared))
}
