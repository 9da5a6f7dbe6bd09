//! Portal timestamp handling.
//!
//! The portal serves naive `YYYY-MM-DD HH:MM:SS` timestamps in the campus
//! local time; everything here localizes them through the configured
//! timezone and compares in UTC.

use chrono::{DateTime, Days, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::IntraError;
use crate::types::Event;

const PORTAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a portal timestamp in the campus timezone.
pub fn parse_portal_time(value: &str, tz: Tz) -> Result<DateTime<Tz>, IntraError> {
    let naive = NaiveDateTime::parse_from_str(value, PORTAL_FORMAT)
        .map_err(|_| IntraError::InvalidTimestamp(value.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(IntraError::InvalidTimestamp(value.to_string())),
    }
}

/// Split an appointment slot of the form `"start|end"`.
pub fn split_slot(slot: &str) -> Option<(&str, &str)> {
    slot.split_once('|')
}

/// Start and end of a planning event, preferring a booked appointment slot
/// (group first, then individual) over the activity-wide window.
pub fn event_times(event: &Event, tz: Tz) -> Result<(DateTime<Tz>, DateTime<Tz>), IntraError> {
    let slot = [
        event.rdv_group_registered.as_deref(),
        event.rdv_indiv_registered.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty());

    if let Some(slot) = slot {
        let (start, end) = split_slot(slot)
            .ok_or_else(|| IntraError::InvalidTimestamp(slot.to_string()))?;
        return Ok((parse_portal_time(start, tz)?, parse_portal_time(end, tz)?));
    }

    Ok((
        parse_portal_time(&event.start, tz)?,
        parse_portal_time(&event.end, tz)?,
    ))
}

/// Planning query window: tomorrow through two months from now.
pub fn planning_window(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    let start = today + Days::new(1);
    let end = today.checked_add_months(Months::new(2)).unwrap_or(start);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn event(start: &str, end: &str) -> Event {
        serde_json::from_str(&format!(
            r#"{{
                "codeacti": "acti-1",
                "acti_title": "Workshop",
                "start": "{start}",
                "end": "{end}"
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn parses_portal_timestamp_in_campus_timezone() {
        let dt = parse_portal_time("2026-01-15 09:00:00", Paris).unwrap();
        // Paris is UTC+1 in January.
        assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2026-01-15T08:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let err = parse_portal_time("2026-01-15T09:00:00Z", Paris).unwrap_err();
        assert!(matches!(err, IntraError::InvalidTimestamp(_)));
    }

    #[test]
    fn event_times_use_activity_window_by_default() {
        let ev = event("2026-03-02 09:00:00", "2026-03-02 11:00:00");
        let (start, end) = event_times(&ev, Paris).unwrap();
        assert!(start < end);
        assert_eq!(start.to_rfc3339(), "2026-03-02T09:00:00+01:00");
    }

    #[test]
    fn event_times_prefer_group_slot() {
        let mut ev = event("2026-03-02 09:00:00", "2026-03-02 18:00:00");
        ev.rdv_group_registered = Some("2026-03-02 10:15:00|2026-03-02 10:30:00".into());
        ev.rdv_indiv_registered = Some("2026-03-02 14:00:00|2026-03-02 14:15:00".into());

        let (start, end) = event_times(&ev, Paris).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-02T10:15:00+01:00");
        assert_eq!(end.to_rfc3339(), "2026-03-02T10:30:00+01:00");
    }

    #[test]
    fn event_times_fall_back_to_individual_slot() {
        let mut ev = event("2026-03-02 09:00:00", "2026-03-02 18:00:00");
        ev.rdv_group_registered = Some(String::new());
        ev.rdv_indiv_registered = Some("2026-03-02 14:00:00|2026-03-02 14:15:00".into());

        let (start, _) = event_times(&ev, Paris).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-02T14:00:00+01:00");
    }

    #[test]
    fn planning_window_spans_two_months_from_tomorrow() {
        let now = "2026-01-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let (start, end) = planning_window(now);
        assert_eq!(start.to_string(), "2026-01-16");
        assert_eq!(end.to_string(), "2026-03-15");
    }
}
