use chrono::{DateTime, Utc};

use crate::care::schedule::NextCareEstimate;

const PLACEHOLDER: &str = "\u{2014}";

/// One-line display form: `"<label> • <Mon D>"`, or just the label when the
/// due date is missing or out of range.
pub fn format_next_care(estimate: Option<&NextCareEstimate>) -> String {
    let Some(estimate) = estimate else {
        return PLACEHOLDER.to_string();
    };

    let label = estimate
        .phrased_label
        .as_deref()
        .filter(|l| !l.is_empty())
        .or_else(|| Some(estimate.label.as_str()).filter(|l| !l.is_empty()))
        .unwrap_or(PLACEHOLDER);

    match estimate.due_at.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(when) => format!("{label} \u{2022} {}", when.format("%b %-d")),
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::care::schedule::DueCare;
    use chrono::TimeZone;

    fn estimate(due_at: Option<i64>, phrased: Option<&str>) -> NextCareEstimate {
        NextCareEstimate {
            care_type: DueCare::Water,
            due_at,
            label: "Water".to_string(),
            phrased_label: phrased.map(str::to_string),
        }
    }

    #[test]
    fn test_absent_estimate_is_placeholder() {
        assert_eq!(format_next_care(None), "\u{2014}");
    }

    #[test]
    fn test_label_and_date() {
        let due = Utc.with_ymd_and_hms(2025, 10, 18, 9, 30, 0).unwrap();
        let est = estimate(Some(due.timestamp_millis()), Some("Water tomorrow"));
        assert_eq!(format_next_care(Some(&est)), "Water tomorrow \u{2022} Oct 18");
    }

    #[test]
    fn test_falls_back_to_base_label() {
        let due = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let est = estimate(Some(due.timestamp_millis()), None);
        assert_eq!(format_next_care(Some(&est)), "Water \u{2022} Mar 2");
    }

    #[test]
    fn test_missing_or_invalid_due_date_renders_label_only() {
        assert_eq!(
            format_next_care(Some(&estimate(None, Some("Water today")))),
            "Water today"
        );
        assert_eq!(
            format_next_care(Some(&estimate(Some(i64::MAX), None))),
            "Water"
        );
    }
}
