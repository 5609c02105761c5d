use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use upkeep_calendar::{EventDefinition, NewEventDefinition};
use uuid::Uuid;

use super::{EventAssetLinks, EventStore};
use crate::error::{ServiceError, ServiceResult};

/// Event store held entirely in memory.
///
/// Lock order is `events` then `links`.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<BTreeMap<Uuid, EventDefinition>>,
    /// `(event_id, asset_id)` pairs.
    links: RwLock<BTreeSet<(Uuid, Uuid)>>,
}

impl InMemoryEventStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Inserts definitions that already carry their ids, such as a JSON export.
    ///
    /// Rows get the same checks as [`EventStore::create`]. A parent may appear
    /// anywhere in the batch. Nothing is inserted unless every row passes.
    ///
    /// ## Errors
    /// Returns `Conflict` for an id that is already present or repeated in the
    /// batch, `ValidationError` for an invalid row or nested recurrence, and
    /// `NotFound` for a parent that is neither stored nor in the batch.
    pub async fn seed(
        &self,
        definitions: impl IntoIterator<Item = EventDefinition>,
    ) -> ServiceResult<usize> {
        let mut events = self.events.write().await;

        let mut staged = BTreeMap::new();
        for definition in definitions {
            if events.contains_key(&definition.id) || staged.contains_key(&definition.id) {
                return Err(ServiceError::Conflict(format!(
                    "event {} already exists",
                    definition.id
                )));
            }
            definition.validate()?;
            staged.insert(definition.id, definition);
        }
        for definition in staged.values() {
            check_parent(Some(definition.id), definition.parent_id, |parent_id| {
                staged.get(parent_id).or_else(|| events.get(parent_id))
            })?;
        }

        let inserted = staged.len();
        events.append(&mut staged);
        tracing::debug!(inserted, total = events.len(), "Seeded event store");
        Ok(inserted)
    }

    /// ## Summary
    /// Seeds from a JSON array of event definitions.
    ///
    /// ## Errors
    /// Returns `SerializationError` for malformed JSON, otherwise as [`Self::seed`].
    pub async fn seed_from_json(&self, json: &str) -> ServiceResult<usize> {
        let definitions: Vec<EventDefinition> = serde_json::from_str(json)?;
        self.seed(definitions).await
    }
}

/// A parent must exist, must not be the event itself, and must not be a recurrence.
fn check_parent<'a>(
    id: Option<Uuid>,
    parent_id: Option<Uuid>,
    lookup: impl FnOnce(&Uuid) -> Option<&'a EventDefinition>,
) -> ServiceResult<()> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };
    if Some(parent_id) == id {
        return Err(ServiceError::ValidationError(
            "event cannot be its own parent".to_string(),
        ));
    }
    let parent = lookup(&parent_id)
        .ok_or_else(|| ServiceError::NotFound(format!("parent event {parent_id}")))?;
    if parent.is_recurrence() {
        return Err(ServiceError::ValidationError(format!(
            "parent event {parent_id} is itself a recurrence"
        )));
    }
    Ok(())
}

impl EventStore for InMemoryEventStore {
    async fn get(&self, id: Uuid) -> ServiceResult<Option<EventDefinition>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn children(&self, parent_id: Uuid) -> ServiceResult<Vec<EventDefinition>> {
        let events = self.events.read().await;
        let mut children: Vec<_> = events
            .values()
            .filter(|event| event.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|event| (event.start, event.id));
        Ok(children)
    }

    async fn starting_before(&self, instant: NaiveDateTime) -> ServiceResult<Vec<EventDefinition>> {
        let events = self.events.read().await;
        let mut matching: Vec<_> = events
            .values()
            .filter(|event| event.start <= instant)
            .cloned()
            .collect();
        matching.sort_by_key(|event| (event.start, event.id));
        Ok(matching)
    }

    async fn create(&self, definition: NewEventDefinition) -> ServiceResult<EventDefinition> {
        definition.validate()?;

        let mut events = self.events.write().await;
        check_parent(None, definition.parent_id, |parent_id| events.get(parent_id))?;

        let created = definition.into_definition(Uuid::now_v7());
        events.insert(created.id, created.clone());
        tracing::debug!(event_id = %created.id, "Created event definition");
        Ok(created)
    }

    async fn update(&self, definition: EventDefinition) -> ServiceResult<EventDefinition> {
        let id = definition.id;
        definition.validate()?;

        let mut events = self.events.write().await;
        if !events.contains_key(&id) {
            return Err(ServiceError::NotFound(format!("event {id}")));
        }
        check_parent(Some(id), definition.parent_id, |parent_id| events.get(parent_id))?;
        let has_children = events.values().any(|event| event.parent_id == Some(id));
        if definition.is_recurrence() && has_children {
            return Err(ServiceError::ValidationError(format!(
                "event {id} has recurrences and cannot become one"
            )));
        }

        events.insert(id, definition.clone());
        tracing::debug!(event_id = %id, "Updated event definition");
        Ok(definition)
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let mut events = self.events.write().await;
        if events.remove(&id).is_none() {
            return Err(ServiceError::NotFound(format!("event {id}")));
        }

        let mut removed = BTreeSet::from([id]);
        events.retain(|child_id, event| {
            if event.parent_id == Some(id) {
                removed.insert(*child_id);
                false
            } else {
                true
            }
        });

        let mut links = self.links.write().await;
        links.retain(|(event_id, _)| !removed.contains(event_id));

        tracing::debug!(event_id = %id, removed = removed.len(), "Deleted event definition");
        Ok(())
    }
}

impl EventAssetLinks for InMemoryEventStore {
    async fn link(&self, event_id: Uuid, asset_id: Uuid) -> ServiceResult<()> {
        let events = self.events.read().await;
        if !events.contains_key(&event_id) {
            return Err(ServiceError::NotFound(format!("event {event_id}")));
        }
        self.links.write().await.insert((event_id, asset_id));
        Ok(())
    }

    async fn unlink(&self, event_id: Uuid, asset_id: Uuid) -> ServiceResult<bool> {
        Ok(self.links.write().await.remove(&(event_id, asset_id)))
    }

    async fn assets_for_event(&self, event_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        let links = self.links.read().await;
        Ok(links
            .range((event_id, Uuid::nil())..=(event_id, Uuid::max()))
            .map(|(_, asset_id)| *asset_id)
            .collect())
    }

    async fn events_for_asset(&self, asset_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .filter(|(_, linked_asset)| *linked_asset == asset_id)
            .map(|(event_id, _)| *event_id)
            .collect())
    }
}
