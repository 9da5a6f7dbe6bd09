use std::path::Path;

use anyhow::{Context, Result};

use intrasync_agenda::{sync_events, sync_projects, CalendarClient};
use intrasync_core::Config;
use intrasync_intra::{fetch_projects, fetch_registered_events, IntraClient};

#[tokio::main]
async fn main() -> Result<()> {
    intrasync_core::init()?;

    let config = Config::load().context("Failed to load config.json")?;
    let tz = config.tz()?;
    let room_regex = config.room_regex()?;

    let intra = IntraClient::new(&config.intra_auth)?;

    let events = fetch_registered_events(&intra, &config.intra_location_code, &room_regex, tz)
        .await
        .context("Failed to fetch registered events")?;
    tracing::info!("Fetched {} upcoming registered events", events.len());

    let projects = if config.create_project_event {
        let projects = fetch_projects(
            &intra,
            &config.semesters,
            config.add_participants_to_project,
            tz,
        )
        .await
        .context("Failed to fetch projects")?;
        tracing::info!("Fetched {} active projects", projects.len());
        projects
    } else {
        Vec::new()
    };

    let token = intrasync_agenda::auth::access_token(
        Path::new("credentials.json"),
        Path::new("token.json"),
    )
    .await
    .context("Failed to obtain Google access token")?;
    let calendar = CalendarClient::new(&token);

    let stats = sync_events(&calendar, &config, tz, events)
        .await
        .context("Event sync failed")?;
    tracing::info!(
        created = stats.created,
        skipped = stats.skipped,
        "Event sync complete"
    );

    if config.create_project_event {
        let stats = sync_projects(&calendar, &config, tz, projects)
            .await
            .context("Project sync failed")?;
        tracing::info!(
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            "Project sync complete"
        );
    }

    Ok(())
}
