//! Fetch orchestration: the registered-events pass and the concurrent
//! per-module project collector.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use regex::Regex;
use tokio::sync::Semaphore;

use crate::client::IntraClient;
use crate::error::IntraError;
use crate::filter;
use crate::time;
use crate::types::{Activity, Event, Module};

/// Upper bound on simultaneous module fetches. One task is spawned per
/// module; the semaphore keeps the portal from seeing them all at once.
const MAX_CONCURRENT_FETCHES: usize = 16;

/// Fetch the registered planning events for the next two months, filtered
/// down to upcoming registered events with cleaned room names.
pub async fn fetch_registered_events(
    client: &IntraClient,
    location: &str,
    room_regex: &Regex,
    tz: Tz,
) -> Result<Vec<Event>, IntraError> {
    let now = Utc::now();
    let (start, end) = time::planning_window(now);

    let mut events = client.planning(location, start, end).await?;
    filter::retain_registered_events(&mut events);
    filter::retain_upcoming_events(&mut events, now, tz)?;
    filter::clean_room_names(&mut events, room_regex);

    Ok(events)
}

/// Fetch the project activities of every enrolled module in the configured
/// semesters, one task per module.
///
/// Aggregation is explicit: the join handles are awaited in order and their
/// results extend a single vector. A module whose fetch fails is logged and
/// contributes nothing; sibling tasks are unaffected.
pub async fn fetch_projects(
    client: &IntraClient,
    semesters: &[u32],
    with_participants: bool,
    tz: Tz,
) -> Result<Vec<Activity>, IntraError> {
    let mut modules = client.courses().await?;
    filter::retain_configured_modules(&mut modules, semesters);
    tracing::info!("Fetching projects for {} modules", modules.len());

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
    let mut handles = Vec::with_capacity(modules.len());

    for module in modules {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                // The semaphore is never closed.
                return Vec::new();
            };
            fetch_module_projects(&client, &module, with_participants).await
        }));
    }

    let mut projects = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(list) => projects.extend(list),
            Err(e) => tracing::warn!("Project fetch task failed: {}", e),
        }
    }

    filter::retain_active_projects(&mut projects, Utc::now(), tz);
    Ok(projects)
}

/// One module's share of the fan-out. Never fails: errors are logged and
/// yield an empty list.
async fn fetch_module_projects(
    client: &IntraClient,
    module: &Module,
    with_participants: bool,
) -> Vec<Activity> {
    let mut activities = match client.module_activities(module).await {
        Ok(activities) => activities,
        Err(e) => {
            tracing::warn!(module = %module.code, "Failed to fetch module activities: {}", e);
            return Vec::new();
        }
    };

    filter::retain_project_activities(&mut activities);

    if with_participants {
        for activity in &mut activities {
            match client.project_roster(module, &activity.code_acti).await {
                Ok(roster) => activity.participants = roster.own_members(),
                Err(e) => {
                    tracing::warn!(acti = %activity.code_acti, "Failed to fetch project roster: {}", e);
                }
            }
        }
    }

    activities
}
