use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use upkeep_calendar::{NewEventDefinition, Window};
use upkeep_service::error::ServiceError;
use upkeep_service::feed::{CalendarService, FeedOptions};
use upkeep_service::store::{EventAssetLinks, EventStore, InMemoryEventStore};
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid date")
}

fn service(options: FeedOptions) -> CalendarService<InMemoryEventStore> {
    CalendarService::new(Arc::new(InMemoryEventStore::new()), options)
}

fn january() -> Window {
    Window::parse_month("2024-01").expect("window")
}

#[test_log::test(tokio::test)]
async fn weekly_event_feed() {
    let service = service(FeedOptions::default());
    let event = service
        .store()
        .create(
            NewEventDefinition::new("Generator run", at(2024, 1, 15, 10), at(2024, 1, 15, 11))
                .recurring("WEEKLY"),
        )
        .await
        .expect("create");

    let feed = service.feed(&january()).await.expect("feed");
    let starts: Vec<_> = feed.iter().map(|entry| entry.start.as_str()).collect();
    assert_eq!(
        starts,
        vec![
            "2024-01-15T10:00:00",
            "2024-01-22T10:00:00",
            "2024-01-29T10:00:00",
            "2024-02-05T10:00:00",
            "2024-02-12T10:00:00",
            "2024-02-19T10:00:00",
            "2024-02-26T10:00:00",
        ]
    );
    assert_eq!(feed[0].id, event.id.to_string());
    assert_eq!(feed[6].id, format!("{}/6", event.id));
    assert!(feed.iter().all(|entry| entry.title == "Generator run"));
}

#[test_log::test(tokio::test)]
async fn feed_keeps_occurrences_outside_window_by_default() {
    let service = service(FeedOptions::default());
    service
        .store()
        .create(
            NewEventDefinition::new("Lobby cleaning", at(2023, 12, 1, 6), at(2023, 12, 1, 7))
                .recurring("DAILY"),
        )
        .await
        .expect("create");

    let feed = service.feed(&january()).await.expect("feed");
    assert_eq!(feed.len(), 43);
    assert_eq!(feed[0].start, "2023-12-01T06:00:00");
}

#[test_log::test(tokio::test)]
async fn feed_truncates_at_window_end_when_configured() {
    let service = service(FeedOptions {
        truncate_at_window_end: true,
    });
    service
        .store()
        .create(
            NewEventDefinition::new("Gate check", at(2024, 2, 1, 9), at(2024, 2, 1, 10))
                .recurring("DAILY"),
        )
        .await
        .expect("create");

    // January's grid covers 2023-12-31 through 2024-02-10.
    let feed = service.feed(&january()).await.expect("feed");
    assert_eq!(feed.len(), 10);
    assert_eq!(feed.last().map(|entry| entry.start.as_str()), Some("2024-02-10T09:00:00"));
}

#[test_log::test(tokio::test)]
async fn feed_skips_definitions_starting_after_window() {
    let service = service(FeedOptions::default());
    service
        .store()
        .create(NewEventDefinition::new("Spring audit", at(2024, 4, 1, 9), at(2024, 4, 1, 12)))
        .await
        .expect("create");

    assert!(service.feed(&january()).await.expect("feed").is_empty());
}

#[test_log::test(tokio::test)]
async fn materialized_recurrence_is_a_single_entry() {
    let service = service(FeedOptions::default());
    let template = service
        .store()
        .create(
            NewEventDefinition::new("Fire panel test", at(2024, 1, 3, 9), at(2024, 1, 3, 10))
                .recurring("YEARLY"),
        )
        .await
        .expect("template");
    let mut moved =
        NewEventDefinition::new("Fire panel test", at(2024, 1, 5, 9), at(2024, 1, 5, 10))
            .recurring("DAILY");
    moved.parent_id = Some(template.id);
    let moved = service.store().create(moved).await.expect("child");

    let feed = service.feed(&january()).await.expect("feed");
    let ids: Vec<_> = feed.iter().map(|entry| entry.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            template.id.to_string(),
            format!("{}/1", template.id),
            moved.id.to_string(),
        ]
    );

    let parent = service.parent_of(&moved).await.expect("lookup");
    assert_eq!(parent, Some(template.clone()));
    assert_eq!(service.parent_of(&template).await.expect("lookup"), None);
}

#[test_log::test(tokio::test)]
async fn parent_of_reports_dangling_parent() {
    let service = service(FeedOptions::default());
    let mut dangling = NewEventDefinition::new("Stray", at(2024, 1, 2, 9), at(2024, 1, 2, 10))
        .into_definition(Uuid::now_v7());
    dangling.parent_id = Some(Uuid::now_v7());

    let err = service.parent_of(&dangling).await.expect_err("dangling");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test_log::test(tokio::test)]
async fn feed_for_asset_only_includes_linked_events() {
    let service = service(FeedOptions::default());
    let chiller = Uuid::now_v7();
    let linked = service
        .store()
        .create(
            NewEventDefinition::new("Chiller service", at(2024, 1, 10, 8), at(2024, 1, 10, 12))
                .recurring("MONTHLY"),
        )
        .await
        .expect("linked");
    service
        .store()
        .create(NewEventDefinition::new("Unrelated", at(2024, 1, 11, 8), at(2024, 1, 11, 9)))
        .await
        .expect("unlinked");
    service.store().link(linked.id, chiller).await.expect("link");

    let feed = service.feed_for_asset(chiller, &january()).await.expect("feed");
    let starts: Vec<_> = feed.iter().map(|entry| entry.start.as_str()).collect();
    assert_eq!(
        starts,
        vec!["2024-01-10T08:00:00", "2024-02-10T08:00:00", "2024-03-10T08:00:00"]
    );
}

#[test_log::test(tokio::test)]
async fn views_format_each_occurrence() {
    let service = service(FeedOptions::default());
    let event = service
        .store()
        .create(
            NewEventDefinition::new("Roof drain", at(2024, 1, 31, 14), at(2024, 1, 31, 15))
                .recurring("MONTHLY"),
        )
        .await
        .expect("create");

    let views = service.views(event.id, &january()).await.expect("views");
    let formatted: Vec<_> = views.iter().map(|view| view.start_formatted.as_str()).collect();
    assert_eq!(
        formatted,
        vec![
            "Jan 31st 2024 - 02:00pm",
            "Feb 29th 2024 - 02:00pm",
            "Mar 31st 2024 - 02:00pm",
        ]
    );

    let err = service.views(Uuid::now_v7(), &january()).await.expect_err("missing");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
