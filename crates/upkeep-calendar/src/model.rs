//! Calendar event definitions and the instances computed from them.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use upkeep_core::error::{CoreError, CoreResult};
use uuid::Uuid;

use crate::frequency::RecurFrequency;

/// A persisted, possibly recurring, calendar event.
///
/// Definitions are owned by the event store. Expansion only ever reads them.
/// `start` and `end` are wall-clock times as stored; `start <= end` is assumed
/// here and checked by [`NewEventDefinition::validate`] at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: Uuid,
    /// Set on materialized recurrences. A definition with a parent never recurs itself.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub calendar_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, alias = "allDay")]
    pub all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    /// Raw stored frequency. Kept verbatim so unrecognized values survive a round trip.
    #[serde(default)]
    pub recur_frequency: Option<String>,
    #[serde(default)]
    pub recur_filter_days: Option<String>,
    #[serde(default)]
    pub recur_filter_months: Option<String>,
    #[serde(default)]
    pub recur_filter_years: Option<String>,
}

impl EventDefinition {
    #[must_use]
    pub fn frequency(&self) -> RecurFrequency {
        RecurFrequency::from_stored(self.recur_frequency.as_deref())
    }

    /// ## Summary
    /// Whether this definition is a recurring template.
    ///
    /// Materialized recurrences are never recurring, whatever their frequency.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        !self.is_recurrence() && self.frequency().is_recurring()
    }

    /// Whether this definition is a materialized recurrence of another event.
    #[must_use]
    pub const fn is_recurrence(&self) -> bool {
        self.parent_id.is_some()
    }

    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// ## Summary
    /// Checks a stored definition the same way creation checks its payload.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if the title is blank or the event
    /// ends before it starts.
    pub fn validate(&self) -> CoreResult<()> {
        validate_fields(&self.title, self.start, self.end)
    }

    /// The frequency that expansion actually applies.
    #[must_use]
    pub fn effective_frequency(&self) -> RecurFrequency {
        if self.is_recurrence() {
            RecurFrequency::None
        } else {
            self.frequency()
        }
    }
}

/// Creation payload for an event definition; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEventDefinition {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub calendar_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, alias = "allDay")]
    pub all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub recur_frequency: Option<String>,
    #[serde(default)]
    pub recur_filter_days: Option<String>,
    #[serde(default)]
    pub recur_filter_months: Option<String>,
    #[serde(default)]
    pub recur_filter_years: Option<String>,
}

impl NewEventDefinition {
    /// ## Summary
    /// Creates a minimal, non-recurring payload.
    #[must_use]
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            parent_id: None,
            user_id: None,
            calendar_id: None,
            title: title.into(),
            description: None,
            start,
            end,
            all_day: false,
            color: None,
            background_color: None,
            recur_frequency: None,
            recur_filter_days: None,
            recur_filter_months: None,
            recur_filter_years: None,
        }
    }

    /// Sets the raw recurrence frequency.
    #[must_use]
    pub fn recurring(mut self, frequency: impl Into<String>) -> Self {
        self.recur_frequency = Some(frequency.into());
        self
    }

    /// ## Summary
    /// Checks the payload before it is persisted.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if the title is blank or the event
    /// ends before it starts.
    pub fn validate(&self) -> CoreResult<()> {
        validate_fields(&self.title, self.start, self.end)
    }

    #[must_use]
    pub fn into_definition(self, id: Uuid) -> EventDefinition {
        EventDefinition {
            id,
            parent_id: self.parent_id,
            user_id: self.user_id,
            calendar_id: self.calendar_id,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            all_day: self.all_day,
            color: self.color,
            background_color: self.background_color,
            recur_frequency: self.recur_frequency,
            recur_filter_days: self.recur_filter_days,
            recur_filter_months: self.recur_filter_months,
            recur_filter_years: self.recur_filter_years,
        }
    }
}

fn validate_fields(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "event title must not be empty".to_string(),
        ));
    }
    if end < start {
        return Err(CoreError::ValidationError(format!(
            "event ends ({end}) before it starts ({start})"
        )));
    }
    Ok(())
}

/// One computed occurrence of an event definition. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventInstance {
    /// Back-reference to the definition this occurrence was computed from.
    pub source_definition_id: Uuid,
    /// 0 is the original; 1.. are generated recurrences.
    pub occurrence_index: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventInstance {
    #[must_use]
    pub const fn is_original(&self) -> bool {
        self.occurrence_index == 0
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}
