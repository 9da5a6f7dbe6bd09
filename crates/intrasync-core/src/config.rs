use std::path::Path;

use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Google caps reminder offsets at four weeks, in minutes.
const MAX_REMINDER_MINUTES: u32 = 40_320;

/// Configuration validation issue
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// User settings read from `config.json` in the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Calendar id receiving class events ("primary" works)
    pub google_calendar_events: String,

    /// Calendar id receiving project events; may equal the events calendar
    pub google_calendar_projects: String,

    /// Portal autologin token, used as a URL path segment. Starts with "auth-"
    pub intra_auth: String,

    /// Portal location code, e.g. "FR/TLS"
    pub intra_location_code: String,

    /// Whether project events are created at all
    #[serde(default)]
    pub create_project_event: bool,

    /// Whether to fetch each project's roster. One extra request per project.
    #[serde(default)]
    pub add_participants_to_project: bool,

    /// Semesters scanned when fetching modules
    #[serde(default)]
    pub semesters: Vec<u32>,

    /// IANA timezone of the campus, e.g. "Europe/Paris"
    pub timezone: String,

    /// Google Calendar color ids
    pub project_color: String,
    pub event_color: String,

    /// Popup reminder offsets in minutes
    #[serde(default)]
    pub reminder_minutes: Vec<u32>,

    /// Regex extracting the room name from the portal room code.
    /// Capture group 1 is kept, e.g. `FR/TLS/Marquette/(.*)`.
    pub location_regex: String,
}

impl Config {
    /// Load `config.json` from the working directory and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config.json"))
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration, collecting errors and warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.google_calendar_events.is_empty() {
            result.add_error("google_calendar_events", "Calendar id must not be empty");
        }
        if self.google_calendar_projects.is_empty() {
            result.add_error("google_calendar_projects", "Calendar id must not be empty");
        }

        if !self.intra_auth.starts_with("auth-") {
            result.add_error("intra_auth", "Autologin token must start with \"auth-\"");
        }

        if self.timezone.parse::<Tz>().is_err() {
            result.add_error(
                "timezone",
                format!("Unknown IANA timezone: {}", self.timezone),
            );
        }

        match Regex::new(&self.location_regex) {
            Ok(re) if re.captures_len() < 2 => {
                result.add_error(
                    "location_regex",
                    "Regex must contain a capture group for the room name",
                );
            }
            Ok(_) => {}
            Err(e) => result.add_error("location_regex", format!("Invalid regex: {}", e)),
        }

        for minutes in &self.reminder_minutes {
            if *minutes > MAX_REMINDER_MINUTES {
                result.add_error(
                    "reminder_minutes",
                    format!(
                        "Reminder offset {} exceeds the Google maximum of {} minutes",
                        minutes, MAX_REMINDER_MINUTES
                    ),
                );
            }
        }

        if self.create_project_event && self.semesters.is_empty() {
            result.add_warning(
                "semesters",
                "No semesters configured - project fetch will find no modules",
            );
        }

        result
    }

    /// The configured campus timezone.
    ///
    /// Only call after validation; an unparseable timezone is a config error.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid(format!("Unknown IANA timezone: {}", self.timezone)))
    }

    /// The compiled room-name regex.
    pub fn room_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.location_regex)
            .map_err(|e| ConfigError::Invalid(format!("Invalid location_regex: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Config {
        Config {
            google_calendar_events: "primary".into(),
            google_calendar_projects: "primary".into(),
            intra_auth: "auth-0123456789abcdef".into(),
            intra_location_code: "FR/TLS".into(),
            create_project_event: true,
            add_participants_to_project: true,
            semesters: vec![5, 6],
            timezone: "Europe/Paris".into(),
            project_color: "6".into(),
            event_color: "9".into(),
            reminder_minutes: vec![10, 60],
            location_regex: "FR/TLS/Marquette/(.*)".into(),
        }
    }

    #[test]
    fn valid_sample_config() {
        let result = sample().validate();
        assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn rejects_bad_auth_token() {
        let mut config = sample();
        config.intra_auth = "0123456789abcdef".into();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "intra_auth"));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut config = sample();
        config.timezone = "Mars/Olympus_Mons".into();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn rejects_regex_without_capture_group() {
        let mut config = sample();
        config.location_regex = "FR/TLS/Marquette/.*".into();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location_regex"));
    }

    #[test]
    fn rejects_oversized_reminder() {
        let mut config = sample();
        config.reminder_minutes = vec![10, 40_321];
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn warns_on_empty_semesters_with_projects_enabled() {
        let mut config = sample();
        config.semesters.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "semesters"));
    }

    #[test]
    fn load_from_parses_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&sample()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.intra_location_code, "FR/TLS");
        assert_eq!(config.semesters, vec![5, 6]);
    }

    #[test]
    fn load_from_missing_file_is_not_found() {
        let err = Config::load_from(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
