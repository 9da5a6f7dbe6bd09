//! Portal JSON data model.
//!
//! Field names mirror the portal feeds, quirks included: the activities
//! envelope key is spelled `activites`, projects are flagged `is_projet`,
//! and `event_registered` is either a boolean or the string `"registered"`.

use serde::{Deserialize, Serialize};

/// One entry of the planning feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(rename = "codemodule", default)]
    pub code_module: Option<String>,
    #[serde(rename = "codeinstance", default)]
    pub code_instance: Option<String>,
    #[serde(rename = "codeacti")]
    pub code_acti: String,
    #[serde(rename = "codeevent", default)]
    pub code_event: Option<String>,
    #[serde(rename = "titlemodule", default)]
    pub module_title: Option<String>,
    #[serde(rename = "acti_title")]
    pub acti_title: String,
    /// Portal-local `YYYY-MM-DD HH:MM:SS` timestamps.
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub room: Option<Room>,
    /// Either a boolean or the string `"registered"` in the feed.
    #[serde(default)]
    pub event_registered: Option<RegistrationFlag>,
    /// Appointment slot `"start|end"` when a group slot was booked.
    #[serde(default)]
    pub rdv_group_registered: Option<String>,
    /// Appointment slot `"start|end"` when an individual slot was booked.
    #[serde(default)]
    pub rdv_indiv_registered: Option<String>,
}

/// The feed encodes registration as `false` or the string `"registered"`.
/// Only a JSON boolean marks the event as not registered; strings, null
/// and an absent field all count as registered.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegistrationFlag {
    Flag(bool),
    Label(String),
}

impl Event {
    pub fn is_registered(&self) -> bool {
        !matches!(self.event_registered, Some(RegistrationFlag::Flag(_)))
    }

    /// Room code, when the activity has a room at all.
    pub fn room_code(&self) -> Option<&str> {
        self.room
            .as_ref()
            .map(|r| r.code.as_str())
            .filter(|c| !c.is_empty())
    }
}

/// A room attached to a planning event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub seats: Option<u32>,
}

/// An enrolled course unit for a semester.
#[derive(Debug, Clone, Deserialize)]
pub struct Module {
    pub id: i64,
    pub semester: u32,
    #[serde(rename = "scolaryear")]
    pub scholar_year: i32,
    pub code: String,
    #[serde(rename = "codeinstance")]
    pub code_instance: String,
    pub title: String,
    /// Enrollment status; `"notregistered"` means not enrolled.
    pub status: String,
}

/// Envelope of the module detail endpoint.
#[derive(Debug, Deserialize)]
pub struct ActivityList {
    #[serde(rename = "activites", default)]
    pub activities: Vec<Activity>,
}

/// A gradable activity within a module.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Portal-local `YYYY-MM-DD HH:MM:SS` timestamps.
    pub begin: String,
    pub end: String,
    #[serde(default)]
    pub type_title: String,
    #[serde(rename = "is_projet", default)]
    pub is_project: bool,
    #[serde(rename = "codeacti")]
    pub code_acti: String,
    /// Group members, attached from the project roster when enabled.
    #[serde(skip)]
    pub participants: Vec<Participant>,
}

/// One member of the user's project group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub login: String,
    pub name: String,
}

/// Roster returned by the project detail endpoint.
#[derive(Debug, Deserialize)]
pub struct ProjectRoster {
    #[serde(default)]
    pub title: Option<String>,
    /// Name of the group the user belongs to, when one exists.
    #[serde(rename = "user_project_title", default)]
    pub user_group_name: Option<String>,
    #[serde(default)]
    pub registered: Vec<ProjectGroup>,
}

/// A registered project group: a master plus members.
#[derive(Debug, Deserialize)]
pub struct ProjectGroup {
    #[serde(default)]
    pub title: String,
    pub master: GroupMember,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Deserialize)]
pub struct GroupMember {
    pub login: String,
    /// The roster calls the display name `title`.
    #[serde(rename = "title", default)]
    pub name: String,
}

impl ProjectRoster {
    /// Members of the user's own group, master first.
    pub fn own_members(&self) -> Vec<Participant> {
        let Some(name) = self.user_group_name.as_deref() else {
            return Vec::new();
        };
        let Some(group) = self.registered.iter().find(|g| g.title == name) else {
            return Vec::new();
        };

        std::iter::once(&group.master)
            .chain(group.members.iter())
            .map(|m| Participant {
                login: m.login.clone(),
                name: m.name.clone(),
            })
            .collect()
    }
}
