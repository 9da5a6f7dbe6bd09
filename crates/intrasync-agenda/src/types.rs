//! Calendar API wire types.

use serde::{Deserialize, Serialize};

/// An event as returned by the Calendar API. Only the fields the
/// reconciliation pass reads are modeled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<ApiAttendee>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAttendee {
    pub email: String,
    pub display_name: Option<String>,
}

/// API response for an event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// Body of an insert or update call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Reminders>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<AttendeePayload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Reminder overrides. `use_default` is always serialized so the API
/// actually switches the default reminders off.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

impl ReminderOverride {
    pub fn popup(minutes: u32) -> Self {
        Self {
            method: "popup".to_string(),
            minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeePayload {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_camel_case_and_skips_empties() {
        let payload = EventPayload {
            summary: "Workshop".into(),
            description: Some("acti-1".into()),
            location: None,
            start: EventDateTime {
                date_time: "2026-03-02T09:00:00+01:00".into(),
                time_zone: "Europe/Paris".into(),
            },
            end: EventDateTime {
                date_time: "2026-03-02T11:00:00+01:00".into(),
                time_zone: "Europe/Paris".into(),
            },
            color_id: Some("9".into()),
            reminders: Some(Reminders {
                use_default: false,
                overrides: vec![ReminderOverride::popup(10)],
            }),
            attendees: Vec::new(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["colorId"], "9");
        assert_eq!(json["start"]["timeZone"], "Europe/Paris");
        assert_eq!(json["reminders"]["useDefault"], false);
        assert_eq!(json["reminders"]["overrides"][0]["method"], "popup");
        assert!(json.get("location").is_none());
        assert!(json.get("attendees").is_none());
    }
}
