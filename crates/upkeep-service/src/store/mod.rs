//! Storage seams for event definitions and their asset links.
//!
//! The feed service only talks to these traits. [`InMemoryEventStore`]
//! implements both and backs the feed tool and the tests.

mod memory;

pub use memory::InMemoryEventStore;

use chrono::NaiveDateTime;
use upkeep_calendar::{EventDefinition, NewEventDefinition};
use uuid::Uuid;

use crate::error::ServiceResult;

/// Persists and retrieves event definitions.
pub trait EventStore: Send + Sync {
    fn get(&self, id: Uuid) -> impl Future<Output = ServiceResult<Option<EventDefinition>>> + Send;

    /// Materialized recurrences whose parent is `parent_id`.
    fn children(
        &self,
        parent_id: Uuid,
    ) -> impl Future<Output = ServiceResult<Vec<EventDefinition>>> + Send;

    /// ## Summary
    /// Definitions starting at or before `instant`, ordered by start then id.
    ///
    /// Recurring definitions that started long before a window can still
    /// produce occurrences inside it, so there is no lower bound.
    fn starting_before(
        &self,
        instant: NaiveDateTime,
    ) -> impl Future<Output = ServiceResult<Vec<EventDefinition>>> + Send;

    /// ## Summary
    /// Validates and stores a new definition under a fresh id.
    ///
    /// ## Errors
    /// Fails validation for blank titles, inverted ranges, and parents that are
    /// missing or are themselves recurrences.
    fn create(
        &self,
        definition: NewEventDefinition,
    ) -> impl Future<Output = ServiceResult<EventDefinition>> + Send;

    /// ## Errors
    /// Returns `NotFound` if no definition has this id, or a validation error.
    fn update(
        &self,
        definition: EventDefinition,
    ) -> impl Future<Output = ServiceResult<EventDefinition>> + Send;

    /// ## Summary
    /// Removes a definition, its materialized recurrences, and all of their asset links.
    ///
    /// ## Errors
    /// Returns `NotFound` if no definition has this id.
    fn delete(&self, id: Uuid) -> impl Future<Output = ServiceResult<()>> + Send;
}

/// Many-to-many links between events and assets.
pub trait EventAssetLinks: Send + Sync {
    /// ## Summary
    /// Links an asset to an event. Linking twice is a no-op.
    ///
    /// ## Errors
    /// Returns `NotFound` if the event does not exist.
    fn link(
        &self,
        event_id: Uuid,
        asset_id: Uuid,
    ) -> impl Future<Output = ServiceResult<()>> + Send;

    /// Returns whether a link was removed.
    fn unlink(
        &self,
        event_id: Uuid,
        asset_id: Uuid,
    ) -> impl Future<Output = ServiceResult<bool>> + Send;

    fn assets_for_event(
        &self,
        event_id: Uuid,
    ) -> impl Future<Output = ServiceResult<Vec<Uuid>>> + Send;

    fn events_for_asset(
        &self,
        asset_id: Uuid,
    ) -> impl Future<Output = ServiceResult<Vec<Uuid>>> + Send;
}
