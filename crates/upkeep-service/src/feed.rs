//! Calendar feed service.
//!
//! Loads event definitions from the store and expands them into the entries a
//! calendar view renders for a window.

use std::sync::Arc;

use upkeep_calendar::present::{FeedEvent, InstanceView};
use upkeep_calendar::{EventDefinition, EventInstance, Window, expand};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{EventAssetLinks, EventStore};

/// How the feed treats expanded occurrences.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedOptions {
    /// Drop occurrences that start after the window end. Occurrences before
    /// the window start are kept either way.
    pub truncate_at_window_end: bool,
}

pub struct CalendarService<S> {
    store: Arc<S>,
    options: FeedOptions,
}

impl<S: EventStore> CalendarService<S> {
    #[must_use]
    pub fn new(store: Arc<S>, options: FeedOptions) -> Self {
        Self { store, options }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// ## Summary
    /// Builds the feed for `window`.
    ///
    /// Every definition starting before the window end is expanded. Entries are
    /// ordered by definition start, then occurrence index.
    ///
    /// ## Errors
    /// Returns store errors.
    #[tracing::instrument(
        skip(self),
        fields(window_start = %window.start(), window_end = %window.end())
    )]
    pub async fn feed(&self, window: &Window) -> ServiceResult<Vec<FeedEvent>> {
        let definitions = self.store.starting_before(window.end()).await?;
        let feed = self.feed_entries(&definitions, window);
        tracing::debug!(
            definitions = definitions.len(),
            entries = feed.len(),
            "Built calendar feed"
        );
        Ok(feed)
    }

    /// ## Summary
    /// Returns the template a materialized recurrence was generated from.
    ///
    /// ## Errors
    /// Returns `NotFound` if the definition names a parent the store does not have.
    pub async fn parent_of(
        &self,
        definition: &EventDefinition,
    ) -> ServiceResult<Option<EventDefinition>> {
        let Some(parent_id) = definition.parent_id else {
            return Ok(None);
        };
        self.store
            .get(parent_id)
            .await?
            .map(Some)
            .ok_or_else(|| ServiceError::NotFound(format!("parent event {parent_id}")))
    }

    /// ## Summary
    /// Display strings for every occurrence of one event in `window`.
    ///
    /// ## Errors
    /// Returns `NotFound` if there is no event with this id.
    #[tracing::instrument(skip(self))]
    pub async fn views(&self, event_id: Uuid, window: &Window) -> ServiceResult<Vec<InstanceView>> {
        let definition = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?;

        Ok(self
            .instances(&definition, window)
            .iter()
            .map(|instance| InstanceView::new(&definition, instance))
            .collect())
    }

    fn instances(&self, definition: &EventDefinition, window: &Window) -> Vec<EventInstance> {
        let recurrences = expand(definition, window);
        if self.options.truncate_at_window_end {
            recurrences.until_window_end().collect()
        } else {
            recurrences.collect()
        }
    }

    fn feed_entries(&self, definitions: &[EventDefinition], window: &Window) -> Vec<FeedEvent> {
        definitions
            .iter()
            .flat_map(|definition| {
                self.instances(definition, window)
                    .into_iter()
                    .map(move |instance| FeedEvent::from_instance(definition, &instance))
            })
            .collect()
    }
}

impl<S: EventStore + EventAssetLinks> CalendarService<S> {
    /// ## Summary
    /// Builds the feed for `window`, restricted to events linked to `asset_id`.
    ///
    /// ## Errors
    /// Returns store errors.
    #[tracing::instrument(skip(self))]
    pub async fn feed_for_asset(
        &self,
        asset_id: Uuid,
        window: &Window,
    ) -> ServiceResult<Vec<FeedEvent>> {
        let mut definitions = Vec::new();
        for event_id in self.store.events_for_asset(asset_id).await? {
            match self.store.get(event_id).await? {
                Some(definition) if definition.start <= window.end() => {
                    definitions.push(definition);
                }
                Some(_) => {}
                None => {
                    tracing::warn!(%event_id, %asset_id, "Asset linked to missing event");
                }
            }
        }
        definitions.sort_by_key(|definition| (definition.start, definition.id));

        Ok(self.feed_entries(&definitions, window))
    }
}
