//! Per-instance display formatting.
//!
//! Everything here is a pure function of an instance and its definition.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::model::{EventDefinition, EventInstance};

const FEED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `Jan 15th 2024 - 10:00am`
#[must_use]
pub fn long_format(dt: NaiveDateTime) -> String {
    format!(
        "{}{} {}",
        dt.format("%b %d"),
        ordinal_suffix(dt.day()),
        dt.format("%Y - %I:%M%P")
    )
}

/// `15 January, 2024`, the date picker's input format.
#[must_use]
pub fn picker_date(dt: NaiveDateTime) -> String {
    dt.format("%-d %B, %Y").to_string()
}

/// `10:00 AM`, the time picker's input format.
#[must_use]
pub fn picker_time(dt: NaiveDateTime) -> String {
    dt.format("%I:%M %p").to_string()
}

#[must_use]
pub fn all_day_label(all_day: bool) -> String {
    let (class, text) = if all_day {
        ("success", "Yes")
    } else {
        ("danger", "No")
    };
    format!(r#"<span class="label label-{class}">{text}</span>"#)
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// ## Summary
/// Identifier of an instance in the calendar feed.
///
/// The original keeps its definition's id; generated recurrences append their
/// occurrence index so every instance is distinct.
#[must_use]
pub fn feed_id(instance: &EventInstance) -> String {
    if instance.is_original() {
        instance.source_definition_id.to_string()
    } else {
        format!(
            "{}/{}",
            instance.source_definition_id, instance.occurrence_index
        )
    }
}

/// One entry of the calendar widget's JSON event feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl FeedEvent {
    #[must_use]
    pub fn from_instance(definition: &EventDefinition, instance: &EventInstance) -> Self {
        Self {
            id: feed_id(instance),
            title: definition.title.clone(),
            start: instance.start.format(FEED_DATETIME_FORMAT).to_string(),
            end: instance.end.format(FEED_DATETIME_FORMAT).to_string(),
            all_day: definition.is_all_day(),
            color: definition.color.clone(),
            background_color: definition.background_color.clone(),
        }
    }
}

/// Human-readable strings for showing a single instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceView {
    pub title: String,
    pub start_formatted: String,
    pub end_formatted: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub all_day_label: String,
}

impl InstanceView {
    #[must_use]
    pub fn new(definition: &EventDefinition, instance: &EventInstance) -> Self {
        Self {
            title: definition.title.clone(),
            start_formatted: long_format(instance.start),
            end_formatted: long_format(instance.end),
            start_date: picker_date(instance.start),
            start_time: picker_time(instance.start),
            end_date: picker_date(instance.end),
            end_time: picker_time(instance.end),
            all_day_label: all_day_label(definition.is_all_day()),
        }
    }
}
