//! Intra portal integration.
//!
//! HTTP client for the portal JSON endpoints, the filtering passes applied
//! to planning/module/activity lists, and the concurrent per-module project
//! collector.

pub mod client;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod time;
pub mod types;

pub use client::IntraClient;
pub use error::IntraError;
pub use fetch::{fetch_projects, fetch_registered_events};
pub use types::{Activity, Event, Module, Participant, ProjectRoster, Room};
