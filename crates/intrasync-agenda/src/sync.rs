//! Reconciliation between portal state and the calendars.
//!
//! Planning events are keyed by acti code (written into the calendar
//! description on insert); project events are keyed by title. Individual
//! insert/update failures are logged and skipped.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use intrasync_core::Config;
use intrasync_intra::time as intra_time;
use intrasync_intra::{Activity, Event, IntraError};

use crate::client::CalendarClient;
use crate::error::CalendarError;
use crate::types::{
    ApiEvent, AttendeePayload, EventDateTime, EventPayload, ReminderOverride, Reminders,
};

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// What to do with one source project.
enum ProjectAction {
    Insert(Activity),
    /// The calendar event exists but its roster does: attach attendees.
    Update {
        event_id: String,
        activity: Activity,
    },
}

/// Drop source events already represented in the calendar, matching the
/// acti code against existing descriptions.
fn plan_events(events: Vec<Event>, existing: &[ApiEvent]) -> Vec<Event> {
    let known: std::collections::HashSet<&str> = existing
        .iter()
        .filter_map(|e| e.description.as_deref())
        .collect();

    events
        .into_iter()
        .filter(|ev| !known.contains(ev.code_acti.as_str()))
        .collect()
}

/// Decide insert/update/skip per source project, matching titles against
/// existing summaries. The update case fires when the calendar event was
/// created before the group existed and the roster is now known.
fn plan_projects(
    projects: Vec<Activity>,
    existing: &[ApiEvent],
    with_participants: bool,
) -> (Vec<ProjectAction>, usize) {
    let mut actions = Vec::new();
    let mut skipped = 0;

    for activity in projects {
        let matched = existing
            .iter()
            .find(|e| e.summary.as_deref() == Some(activity.title.as_str()));

        match matched {
            None => actions.push(ProjectAction::Insert(activity)),
            Some(event)
                if with_participants
                    && !activity.participants.is_empty()
                    && event.attendees.is_empty() =>
            {
                actions.push(ProjectAction::Update {
                    event_id: event.id.clone(),
                    activity,
                });
            }
            Some(_) => skipped += 1,
        }
    }

    (actions, skipped)
}

fn to_event_date_time(dt: DateTime<Tz>, timezone: &str) -> EventDateTime {
    EventDateTime {
        date_time: dt.to_rfc3339(),
        time_zone: timezone.to_string(),
    }
}

fn reminder_overrides(minutes: &[u32]) -> Reminders {
    Reminders {
        use_default: false,
        overrides: minutes.iter().copied().map(ReminderOverride::popup).collect(),
    }
}

fn event_payload(event: &Event, config: &Config, tz: Tz) -> Result<EventPayload, IntraError> {
    let (start, end) = intra_time::event_times(event, tz)?;

    Ok(EventPayload {
        summary: event.acti_title.clone(),
        description: Some(event.code_acti.clone()),
        location: event.room_code().map(str::to_string),
        start: to_event_date_time(start, &config.timezone),
        end: to_event_date_time(end, &config.timezone),
        color_id: Some(config.event_color.clone()),
        reminders: Some(reminder_overrides(&config.reminder_minutes)),
        attendees: Vec::new(),
    })
}

fn project_payload(activity: &Activity, config: &Config, tz: Tz) -> Result<EventPayload, IntraError> {
    let start = intra_time::parse_portal_time(&activity.begin, tz)?;
    let end = intra_time::parse_portal_time(&activity.end, tz)?;

    let attendees = activity
        .participants
        .iter()
        .map(|p| AttendeePayload {
            email: p.login.clone(),
            display_name: Some(p.name.clone()),
        })
        .collect();

    Ok(EventPayload {
        summary: activity.title.clone(),
        description: activity.description.clone(),
        location: None,
        start: to_event_date_time(start, &config.timezone),
        end: to_event_date_time(end, &config.timezone),
        color_id: Some(config.project_color.clone()),
        reminders: None,
        attendees,
    })
}

/// Mirror the planning events into the events calendar.
pub async fn sync_events(
    client: &CalendarClient,
    config: &Config,
    tz: Tz,
    events: Vec<Event>,
) -> Result<SyncStats, CalendarError> {
    let existing = client
        .list_events(&config.google_calendar_events, Utc::now())
        .await?;

    let total = events.len();
    let todo = plan_events(events, &existing);
    let mut stats = SyncStats {
        skipped: total - todo.len(),
        ..SyncStats::default()
    };

    for event in todo {
        let payload = match event_payload(&event, config, tz) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(acti = %event.code_acti, "Skipping event with bad times: {}", e);
                continue;
            }
        };

        match client
            .insert_event(&config.google_calendar_events, &payload)
            .await
        {
            Ok(_) => stats.created += 1,
            Err(e) => tracing::warn!(acti = %event.code_acti, "Unable to create event: {}", e),
        }
    }

    Ok(stats)
}

/// Mirror the project activities into the projects calendar.
pub async fn sync_projects(
    client: &CalendarClient,
    config: &Config,
    tz: Tz,
    projects: Vec<Activity>,
) -> Result<SyncStats, CalendarError> {
    let existing = client
        .list_events(&config.google_calendar_projects, Utc::now())
        .await?;

    let (actions, skipped) =
        plan_projects(projects, &existing, config.add_participants_to_project);
    let mut stats = SyncStats {
        skipped,
        ..SyncStats::default()
    };

    for action in actions {
        match action {
            ProjectAction::Insert(activity) => {
                let payload = match project_payload(&activity, config, tz) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(acti = %activity.code_acti, "Skipping project with bad times: {}", e);
                        continue;
                    }
                };
                match client
                    .insert_event(&config.google_calendar_projects, &payload)
                    .await
                {
                    Ok(_) => stats.created += 1,
                    Err(e) => {
                        tracing::warn!(acti = %activity.code_acti, "Unable to create project event: {}", e)
                    }
                }
            }
            ProjectAction::Update { event_id, activity } => {
                let payload = match project_payload(&activity, config, tz) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(acti = %activity.code_acti, "Skipping project with bad times: {}", e);
                        continue;
                    }
                };
                match client
                    .update_event(&config.google_calendar_projects, &event_id, &payload)
                    .await
                {
                    Ok(_) => stats.updated += 1,
                    Err(e) => {
                        tracing::warn!(acti = %activity.code_acti, "Unable to update project event: {}", e)
                    }
                }
            }
        }
    }

    Ok(stats)
}
