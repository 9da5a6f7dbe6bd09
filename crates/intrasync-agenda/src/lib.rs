//! Google Calendar integration.
//!
//! REST client for the Calendar v3 API, file-based OAuth token handling,
//! and the reconciliation pass that mirrors portal state into the
//! configured calendars.

pub mod auth;
pub mod client;
pub mod error;
pub mod sync;
pub mod types;

pub use auth::TokenSet;
pub use client::CalendarClient;
pub use error::{AuthError, CalendarError};
pub use sync::{sync_events, sync_projects, SyncStats};
