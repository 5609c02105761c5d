//! Renders the calendar feed for one month view from an event export.

use std::sync::Arc;

use chrono::NaiveDate;
use upkeep_calendar::Window;
use upkeep_core::config::{FeedConfig, Settings};
use upkeep_service::feed::{CalendarService, FeedOptions};
use upkeep_service::store::InMemoryEventStore;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a JSON array of event definitions into a fresh in-memory store.
///
/// ## Errors
/// Returns an error if the file cannot be read or does not hold valid definitions.
pub async fn load_store(path: &str) -> AppResult<InMemoryEventStore> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::EventsFile {
            path: path.to_string(),
            source,
        })?;

    let store = InMemoryEventStore::new();
    let count = store.seed_from_json(&json).await?;
    tracing::info!(path, count, "Loaded event definitions");
    Ok(store)
}

/// ## Summary
/// Picks the month view to render: the configured month, or the one containing `today`.
///
/// ## Errors
/// Returns an error if the configured month is malformed.
pub fn resolve_window(feed: &FeedConfig, today: NaiveDate) -> AppResult<Window> {
    let window = match feed.month.as_deref() {
        Some(month) => Window::parse_month(month)?,
        None => Window::month_view(today)?,
    };
    Ok(window)
}

/// ## Summary
/// Serializes the feed for `window` as pretty-printed JSON.
///
/// ## Errors
/// Returns store or serialization errors.
pub async fn render_feed(
    store: Arc<InMemoryEventStore>,
    window: &Window,
    options: FeedOptions,
) -> AppResult<String> {
    let service = CalendarService::new(store, options);
    let feed = service.feed(window).await?;
    Ok(serde_json::to_string_pretty(&feed)?)
}

/// ## Summary
/// Loads the configured export and renders the feed.
///
/// `today` is only used when no month is configured.
///
/// ## Errors
/// Returns any error from loading, window resolution, or rendering.
pub async fn run(settings: &Settings, today: NaiveDate) -> AppResult<String> {
    let store = load_store(&settings.calendar.events_path).await?;
    let window = resolve_window(&settings.feed, today)?;
    tracing::info!(start = %window.start(), end = %window.end(), "Rendering feed");

    let options = FeedOptions {
        truncate_at_window_end: settings.calendar.truncate_at_window_end,
    };
    render_feed(Arc::new(store), &window, options).await
}
