//! Next-care estimate.
//!
//! Given a plant and its care logs, picks the single care action that comes
//! due soonest. Only watering and fertilizing recur; sunlight and general
//! notes never produce a due date.

use serde::{Deserialize, Serialize};

use crate::care::timestamp::{opt_epoch_millis, to_epoch_millis};
use crate::models::catalog::CadenceDays;
use crate::models::plant::{CareLog, CareType, Plant};

pub const DAY_MS: i64 = 86_400_000;

pub const DEFAULT_WATER_DAYS: u32 = 7;
pub const DEFAULT_FERTILIZER_DAYS: u32 = 30;

pub const ONBOARDING_LABEL: &str = "Start with a light watering";

/// Days between recurring care actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cadence {
    pub water_days: u32,
    pub fertilizer_days: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            water_days: DEFAULT_WATER_DAYS,
            fertilizer_days: DEFAULT_FERTILIZER_DAYS,
        }
    }
}

impl Cadence {
    /// Applies per-species overrides; missing or zero entries keep `self`.
    pub fn with_overrides(self, overrides: Option<&CadenceDays>) -> Self {
        let Some(o) = overrides else {
            return self;
        };
        Self {
            water_days: o.water.filter(|d| *d > 0).unwrap_or(self.water_days),
            fertilizer_days: o
                .fertilizer
                .filter(|d| *d > 0)
                .unwrap_or(self.fertilizer_days),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueCare {
    // Declaration order is the tie-break order.
    Water,
    Fertilizer,
}

impl DueCare {
    pub fn base_label(&self) -> &'static str {
        match self {
            DueCare::Water => "Water",
            DueCare::Fertilizer => "Fertilize",
        }
    }
}

/// The next care action and when it is due. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCareEstimate {
    #[serde(rename = "type")]
    pub care_type: DueCare,
    /// Epoch milliseconds. Absent only on estimates built by callers.
    #[serde(default)]
    pub due_at: Option<i64>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrased_label: Option<String>,
}

/// Computes the next care action for `plant` as of `now_ms`.
///
/// `logs` may arrive in any order; the latest event of each type is used.
pub fn compute_next_care(
    plant: &Plant,
    logs: &[CareLog],
    cadence: &Cadence,
    now_ms: i64,
) -> NextCareEstimate {
    let last_water = latest_of_type(logs, CareType::Water)
        .or_else(|| opt_epoch_millis(plant.last_care_at.as_ref()))
        .or_else(|| opt_epoch_millis(plant.created_at.as_ref()));
    let last_fertilizer = latest_of_type(logs, CareType::Fertilizer);

    let candidates = [
        (DueCare::Water, last_water, cadence.water_days),
        (DueCare::Fertilizer, last_fertilizer, cadence.fertilizer_days),
    ];

    let next = candidates
        .into_iter()
        .filter_map(|(care, last, days)| {
            let offset = i64::from(days).checked_mul(DAY_MS)?;
            Some((last?.checked_add(offset)?, care))
        })
        .min();

    let Some((due_at, care)) = next else {
        return NextCareEstimate {
            care_type: DueCare::Water,
            due_at: Some(now_ms),
            label: ONBOARDING_LABEL.to_string(),
            phrased_label: None,
        };
    };

    let label = care.base_label();
    NextCareEstimate {
        care_type: care,
        due_at: Some(due_at),
        label: label.to_string(),
        phrased_label: Some(phrase(label, days_until(due_at, now_ms))),
    }
}

/// Event time of the most recent log of `care_type`, ignoring logs whose
/// timestamp cannot be read.
fn latest_of_type(logs: &[CareLog], care_type: CareType) -> Option<i64> {
    logs.iter()
        .filter(|l| l.care_type == care_type)
        .filter_map(|l| l.created_at.as_ref().and_then(to_epoch_millis))
        .max()
}

/// Whole days from `now_ms` to `due_at`, rounding halves upward.
pub fn days_until(due_at: i64, now_ms: i64) -> i64 {
    let days = (due_at as f64 - now_ms as f64) / DAY_MS as f64;
    (days + 0.5).floor() as i64
}

fn phrase(label: &str, days: i64) -> String {
    match days {
        d if d < 0 => {
            let n = d.unsigned_abs();
            let unit = if n == 1 { "day" } else { "days" };
            format!("{label} overdue by {n} {unit}")
        }
        0 => format!("{label} today"),
        1 => format!("{label} tomorrow"),
        2..=5 => format!("{label} in {days} days"),
        _ => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::care::timestamp::Timestamp;

    const NOW: i64 = 1_760_000_000_000;

    fn log(care_type: CareType, at: i64) -> CareLog {
        CareLog {
            id: None,
            care_type,
            notes: None,
            photo_url: None,
            created_at: Some(Timestamp::from(at)),
        }
    }

    fn plant_created(at: Option<i64>) -> Plant {
        Plant {
            name: "Fern".into(),
            created_at: at.map(Timestamp::from),
            ..Plant::default()
        }
    }

    #[test]
    fn test_no_history_gives_onboarding_nudge() {
        let est = compute_next_care(&plant_created(None), &[], &Cadence::default(), NOW);
        assert_eq!(est.care_type, DueCare::Water);
        assert_eq!(est.due_at, Some(NOW));
        assert_eq!(est.label, ONBOARDING_LABEL);
        assert!(est.phrased_label.is_none());
    }

    #[test]
    fn test_created_at_only_gives_water_in_seven_days() {
        let est = compute_next_care(&plant_created(Some(NOW)), &[], &Cadence::default(), NOW);
        assert_eq!(est.care_type, DueCare::Water);
        assert_eq!(est.due_at, Some(NOW + 7 * DAY_MS));
        assert_eq!(est.label, "Water");
        assert_eq!(est.phrased_label.as_deref(), Some("Water"));
    }

    #[test]
    fn test_last_care_at_preferred_over_created_at() {
        let plant = Plant {
            last_care_at: Some(Timestamp::from(NOW - 3 * DAY_MS)),
            ..plant_created(Some(NOW - 100 * DAY_MS))
        };
        let est = compute_next_care(&plant, &[], &Cadence::default(), NOW);
        assert_eq!(est.due_at, Some(NOW + 4 * DAY_MS));
        assert_eq!(est.phrased_label.as_deref(), Some("Water in 4 days"));
    }

    #[test]
    fn test_soonest_overdue_wins() {
        let logs = vec![
            log(CareType::Water, NOW - 8 * DAY_MS),
            log(CareType::Fertilizer, NOW - 40 * DAY_MS),
        ];
        let est = compute_next_care(&plant_created(None), &logs, &Cadence::default(), NOW);
        assert_eq!(est.care_type, DueCare::Fertilizer);
        assert_eq!(est.due_at, Some(NOW - 10 * DAY_MS));
        assert_eq!(est.phrased_label.as_deref(), Some("Fertilize overdue by 10 days"));
    }

    #[test]
    fn test_latest_log_used_regardless_of_order() {
        // Oldest first; a first-match lookup would pick the 20-day-old entry.
        let logs = vec![
            log(CareType::Water, NOW - 20 * DAY_MS),
            log(CareType::Sunlight, NOW),
            log(CareType::Water, NOW - 6 * DAY_MS),
        ];
        let est = compute_next_care(&plant_created(None), &logs, &Cadence::default(), NOW);
        assert_eq!(est.due_at, Some(NOW + DAY_MS));
        assert_eq!(est.phrased_label.as_deref(), Some("Water tomorrow"));
    }

    #[test]
    fn test_unreadable_log_timestamps_fall_back_to_plant() {
        let mut bad = log(CareType::Water, 0);
        bad.created_at = Some(Timestamp::Text("not a date".into()));
        let est = compute_next_care(
            &plant_created(Some(NOW - 7 * DAY_MS)),
            &[bad],
            &Cadence::default(),
            NOW,
        );
        assert_eq!(est.phrased_label.as_deref(), Some("Water today"));
    }

    #[test]
    fn test_fertilizer_has_no_plant_fallback() {
        let logs = vec![log(CareType::Water, NOW)];
        let est = compute_next_care(&plant_created(Some(NOW - 400 * DAY_MS)), &logs, &Cadence::default(), NOW);
        assert_eq!(est.care_type, DueCare::Water);
    }

    #[test]
    fn test_tie_goes_to_water() {
        let cadence = Cadence {
            water_days: 30,
            fertilizer_days: 30,
        };
        let logs = vec![
            log(CareType::Fertilizer, NOW - 10 * DAY_MS),
            log(CareType::Water, NOW - 10 * DAY_MS),
        ];
        let est = compute_next_care(&plant_created(None), &logs, &cadence, NOW);
        assert_eq!(est.care_type, DueCare::Water);
    }

    #[test]
    fn test_overdue_by_one_day_is_singular() {
        let logs = vec![log(CareType::Water, NOW - 8 * DAY_MS)];
        let est = compute_next_care(&plant_created(None), &logs, &Cadence::default(), NOW);
        assert_eq!(est.phrased_label.as_deref(), Some("Water overdue by 1 day"));
    }

    #[test]
    fn test_species_cadence_override() {
        let overrides = CadenceDays {
            water: Some(17),
            fertilizer: Some(0),
        };
        let cadence = Cadence::default().with_overrides(Some(&overrides));
        assert_eq!(cadence.water_days, 17);
        assert_eq!(cadence.fertilizer_days, DEFAULT_FERTILIZER_DAYS);

        let logs = vec![log(CareType::Water, NOW - 14 * DAY_MS)];
        let est = compute_next_care(&plant_created(None), &logs, &cadence, NOW);
        assert_eq!(est.phrased_label.as_deref(), Some("Water in 3 days"));
    }

    #[test]
    fn test_days_until_rounds_half_up() {
        assert_eq!(days_until(NOW + DAY_MS / 2, NOW), 1);
        assert_eq!(days_until(NOW - DAY_MS / 2, NOW), 0);
        assert_eq!(days_until(NOW - DAY_MS / 2 - 1, NOW), -1);
        assert_eq!(days_until(NOW + 6 * DAY_MS, NOW), 6);
    }

    #[test]
    fn test_phrasing_bands() {
        assert_eq!(phrase("Water", 5), "Water in 5 days");
        assert_eq!(phrase("Water", 2), "Water in 2 days");
        assert_eq!(phrase("Water", 6), "Water");
        assert_eq!(phrase("Fertilize", -3), "Fertilize overdue by 3 days");
    }
}
