//! Single-pass filters over the fetched lists.
//!
//! Every pass is a `Vec::retain`; re-running a pass on an already filtered
//! list is a no-op. Order is irrelevant downstream.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::IntraError;
use crate::time;
use crate::types::{Activity, Event, Module};

/// Activity types that actually are projects. The feed flags some
/// non-project activities with `is_projet`, so the type title is checked
/// as well.
const PROJECT_TYPES: [&str; 2] = ["Project", "Mini-project"];

/// Drop events the user is not registered to. The planning query already
/// asks for registered events only, but some still get through.
pub fn retain_registered_events(events: &mut Vec<Event>) {
    events.retain(Event::is_registered);
}

/// Drop events that already started. Fails on a malformed start timestamp,
/// which would poison every later comparison.
pub fn retain_upcoming_events(
    events: &mut Vec<Event>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<(), IntraError> {
    let mut bad = None;
    events.retain(|ev| match time::parse_portal_time(&ev.start, tz) {
        Ok(start) => start.with_timezone(&Utc) >= now,
        Err(e) => {
            bad.get_or_insert(e);
            false
        }
    });

    match bad {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Drop modules outside the configured semesters and modules the user is
/// not enrolled in.
pub fn retain_configured_modules(modules: &mut Vec<Module>, semesters: &[u32]) {
    modules.retain(|m| semesters.contains(&m.semester) && m.status != "notregistered");
}

/// Drop activities that are not project-type.
pub fn retain_project_activities(activities: &mut Vec<Activity>) {
    activities.retain(|a| a.is_project && PROJECT_TYPES.contains(&a.type_title.as_str()));
}

/// Drop projects that ended before `now`. A project with an unparseable
/// end time is dropped too.
pub fn retain_active_projects(projects: &mut Vec<Activity>, now: DateTime<Utc>, tz: Tz) {
    projects.retain(|p| match time::parse_portal_time(&p.end, tz) {
        Ok(end) => end.with_timezone(&Utc) >= now,
        Err(_) => {
            tracing::warn!(acti = %p.code_acti, end = %p.end, "Dropping project with unparseable end time");
            false
        }
    });
}

/// Reduce each event's room code to the configured capture group.
/// Events without a room, or with a code the regex does not match, keep
/// their code untouched.
pub fn clean_room_names(events: &mut [Event], regex: &Regex) {
    for event in events.iter_mut() {
        let Some(room) = event.room.as_mut() else {
            continue;
        };
        if room.code.is_empty() {
            continue;
        }
        if let Some(name) = regex.captures(&room.code).and_then(|c| c.get(1)) {
            room.code = name.as_str().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn event(code_acti: &str, start: &str, registered: &str) -> Event {
        serde_json::from_str(&format!(
            r#"{{
                "codeacti": "{code_acti}",
                "acti_title": "Workshop",
                "start": "{start}",
                "end": "2099-01-01 12:00:00",
                "event_registered": {registered},
                "room": {{"code": "FR/TLS/Marquette/Platon", "type": "classroom", "seats": 40}}
            }}"#
        ))
        .unwrap()
    }

    fn module(semester: u32, status: &str) -> Module {
        serde_json::from_str(&format!(
            r#"{{
                "id": 1,
                "semester": {semester},
                "scolaryear": 2025,
                "code": "B-CPE-200",
                "codeinstance": "TLS-5-1",
                "title": "Unit tests",
                "status": "{status}"
            }}"#
        ))
        .unwrap()
    }

    fn activity(type_title: &str, is_project: bool, end: &str) -> Activity {
        serde_json::from_str(&format!(
            r#"{{
                "title": "Some activity",
                "begin": "2026-01-05 00:00:00",
                "end": "{end}",
                "type_title": "{type_title}",
                "is_projet": {is_project},
                "codeacti": "acti-1"
            }}"#
        ))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2026-02-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn drops_unregistered_events() {
        let mut events = vec![
            event("a", "2099-01-01 09:00:00", "\"registered\""),
            event("b", "2099-01-01 09:00:00", "false"),
        ];
        retain_registered_events(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code_acti, "a");
    }

    #[test]
    fn drops_started_events_and_is_idempotent() {
        let mut events = vec![
            event("past", "2026-01-31 09:00:00", "\"registered\""),
            event("future", "2026-02-02 09:00:00", "\"registered\""),
        ];
        retain_upcoming_events(&mut events, now(), Paris).unwrap();
        assert_eq!(events.len(), 1);

        let before = events.len();
        retain_upcoming_events(&mut events, now(), Paris).unwrap();
        assert_eq!(events.len(), before);
    }

    #[test]
    fn malformed_start_is_an_error() {
        let mut events = vec![event("bad", "not a timestamp", "\"registered\"")];
        assert!(retain_upcoming_events(&mut events, now(), Paris).is_err());
    }

    #[test]
    fn keeps_enrolled_modules_in_configured_semesters() {
        let mut modules = vec![
            module(5, "ongoing"),
            module(3, "ongoing"),
            module(5, "notregistered"),
        ];
        retain_configured_modules(&mut modules, &[5, 6]);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].semester, 5);
    }

    #[test]
    fn keeps_only_project_type_activities() {
        let mut activities = vec![
            activity("Project", true, "2099-01-01 00:00:00"),
            activity("Mini-project", true, "2099-01-01 00:00:00"),
            // is_projet set on a kickoff: the flag lies sometimes.
            activity("Kick-off", true, "2099-01-01 00:00:00"),
            activity("Project", false, "2099-01-01 00:00:00"),
        ];
        retain_project_activities(&mut activities);
        assert_eq!(activities.len(), 2);
    }

    #[test]
    fn drops_ended_projects() {
        let mut projects = vec![
            activity("Project", true, "2026-01-20 23:59:59"),
            activity("Project", true, "2026-03-01 23:59:59"),
        ];
        retain_active_projects(&mut projects, now(), Paris);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].end, "2026-03-01 23:59:59");
    }

    #[test]
    fn room_cleanup_extracts_capture_group() {
        let regex = Regex::new("FR/TLS/Marquette/(.*)").unwrap();
        let mut events = vec![event("a", "2099-01-01 09:00:00", "\"registered\"")];
        clean_room_names(&mut events, &regex);
        assert_eq!(events[0].room_code(), Some("Platon"));
    }

    #[test]
    fn room_cleanup_leaves_unmatched_codes_alone() {
        let regex = Regex::new("FR/LYN/Tower/(.*)").unwrap();
        let mut events = vec![event("a", "2099-01-01 09:00:00", "\"registered\"")];
        clean_room_names(&mut events, &regex);
        assert_eq!(events[0].room_code(), Some("FR/TLS/Marquette/Platon"));
    }
}
