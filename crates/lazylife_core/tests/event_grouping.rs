use chrono::{NaiveDate, NaiveDateTime};
use lazylife_core::{build_event_groups, DayAnchor, EnglishTitles, Event, JapaneseTitles};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn anchor() -> DayAnchor {
    DayAnchor::for_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
}

fn layout(groups: &[lazylife_core::Group<&Event>]) -> Vec<(String, Vec<String>)> {
    groups
        .iter()
        .map(|group| {
            (
                group.key.as_key(),
                group.items.iter().map(|event| event.title.clone()).collect(),
            )
        })
        .collect()
}

#[test]
fn drops_empty_tomorrow_group() {
    let events = vec![
        Event::new("standup", at(2024, 6, 10, 9, 30)),
        Event::new("dentist", at(2024, 6, 5, 14, 0)),
    ];

    let groups = build_event_groups(&events, &anchor(), &JapaneseTitles);
    assert_eq!(
        layout(&groups),
        vec![
            ("today".to_string(), vec!["standup".to_string()]),
            ("overdue".to_string(), vec!["dentist".to_string()]),
        ]
    );
    assert_eq!(groups[1].title, "過去");
}

#[test]
fn events_follow_fixed_order_then_future_days() {
    let events = vec![
        Event::new("trip", at(2024, 6, 21, 8, 0)),
        Event::new("party", at(2024, 6, 11, 19, 0)),
        Event::new("concert", at(2024, 6, 15, 18, 0)),
        Event::new("late call", at(2024, 6, 10, 23, 59)),
        Event::new("early call", at(2024, 6, 10, 0, 0)),
    ];

    let groups = build_event_groups(&events, &anchor(), &EnglishTitles);
    let keys: Vec<String> = groups.iter().map(|group| group.key.as_key()).collect();
    assert_eq!(keys, ["today", "tomorrow", "2024-06-15", "2024-06-21"]);
    assert_eq!(groups[0].items.len(), 2);
    assert_eq!(groups[0].items[0].title, "late call");
    assert_eq!(groups[2].title, "Sat, Jun 15 2024");
}

#[test]
fn multi_day_event_is_placed_by_start_day() {
    let started_yesterday =
        Event::ranged("conference", at(2024, 6, 9, 9, 0), at(2024, 6, 12, 17, 0)).unwrap();
    assert!(started_yesterday.is_multi_day());
    let events = vec![started_yesterday];

    let groups = build_event_groups(&events, &anchor(), &JapaneseTitles);
    assert_eq!(layout(&groups), vec![("overdue".to_string(), vec!["conference".to_string()])]);
}

#[test]
fn reversed_event_window_is_rejected() {
    let err = Event::ranged("broken", at(2024, 6, 12, 9, 0), at(2024, 6, 11, 9, 0)).unwrap_err();
    assert!(err.to_string().contains("earlier than start"));
}

#[test]
fn no_group_is_empty() {
    let events = vec![Event::new("later", at(2024, 7, 1, 10, 0))];
    let groups = build_event_groups(&events, &anchor(), &JapaneseTitles);
    assert_eq!(groups.len(), 1);
    assert!(groups.iter().all(|group| !group.is_empty()));
}
