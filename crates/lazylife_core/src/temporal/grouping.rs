//! Ordered group assembly for the task and event lists.
//!
//! # Responsibility
//! - Partition records into fixed buckets plus one bucket per future day.
//! - Keep the two list variants' scaffolding and empty-group policies apart.
//!
//! # Invariants
//! - Task groups: `[today, tomorrow, none, overdue, <future asc>, completed]`,
//!   every group emitted even when empty.
//! - Event groups: `[today, tomorrow, overdue, <future asc>]`, empty groups
//!   dropped.
//! - Every input record lands in exactly one group; completed tasks land only
//!   in `completed`.
//! - Items keep their input relative order inside a group.

use crate::model::event::Event;
use crate::model::task::Task;
use crate::temporal::classifier::{date_key, Category, DayAnchor};
use crate::temporal::titles::{GroupTitleFormatter, RecordKind};
use chrono::NaiveDate;
use log::debug;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const TASK_FIXED_ORDER: [Category; 4] = [
    Category::Today,
    Category::Tomorrow,
    Category::None,
    Category::Overdue,
];
const EVENT_FIXED_ORDER: [Category; 3] = [Category::Today, Category::Tomorrow, Category::Overdue];

/// Record with an optional planning day and a completion flag.
pub trait DatedRecord {
    fn classification_date(&self) -> Option<NaiveDate>;

    fn is_completed(&self) -> bool {
        false
    }
}

/// Record that is always dated. Multi-day records are placed by start day.
pub trait ScheduledRecord {
    fn start_date(&self) -> NaiveDate;
}

impl DatedRecord for Task {
    fn classification_date(&self) -> Option<NaiveDate> {
        self.execution_date
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl ScheduledRecord for Event {
    fn start_date(&self) -> NaiveDate {
        self.start_datetime.date()
    }
}

/// Group identity: a fixed bucket or a future calendar day.
///
/// Fixed buckets are positioned by list scaffolding and never sorted against
/// day keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Fixed(Category),
    Date(NaiveDate),
}

impl GroupKey {
    /// String form: the category name or `yyyy-mm-dd`.
    pub fn as_key(&self) -> String {
        match self {
            Self::Fixed(category) => category.as_str().to_string(),
            Self::Date(date) => date_key(*date),
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(category) => f.write_str(category.as_str()),
            Self::Date(date) => f.write_str(&date_key(*date)),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One titled bucket of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<T> {
    pub key: GroupKey,
    pub title: String,
    pub items: Vec<T>,
}

impl<T> Group<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Working buckets for one grouping pass.
struct Partition<'a, T> {
    today: Vec<&'a T>,
    tomorrow: Vec<&'a T>,
    none: Vec<&'a T>,
    overdue: Vec<&'a T>,
    completed: Vec<&'a T>,
    future: BTreeMap<NaiveDate, Vec<&'a T>>,
}

impl<'a, T> Partition<'a, T> {
    fn new() -> Self {
        Self {
            today: Vec::new(),
            tomorrow: Vec::new(),
            none: Vec::new(),
            overdue: Vec::new(),
            completed: Vec::new(),
            future: BTreeMap::new(),
        }
    }

    fn route(&mut self, record: &'a T, date: Option<NaiveDate>, anchor: &DayAnchor) {
        match anchor.classify(date) {
            Category::None => self.none.push(record),
            Category::Today => self.today.push(record),
            Category::Tomorrow => self.tomorrow.push(record),
            Category::Overdue => self.overdue.push(record),
            Category::Completed => self.completed.push(record),
            Category::Future => {
                // `classify` yields `Future` only for dated records.
                if let Some(date) = date {
                    self.future.entry(date).or_default().push(record);
                }
            }
        }
    }

    fn take_fixed(&mut self, category: Category) -> Vec<&'a T> {
        let slot = match category {
            Category::None => &mut self.none,
            Category::Today => &mut self.today,
            Category::Tomorrow => &mut self.tomorrow,
            Category::Overdue => &mut self.overdue,
            Category::Completed => &mut self.completed,
            Category::Future => return Vec::new(),
        };
        std::mem::take(slot)
    }

    /// Fixed groups in `order`, then one group per future day ascending.
    ///
    /// `NaiveDate` ordering matches the lexicographic order of `yyyy-mm-dd`
    /// keys for four-digit years.
    fn into_groups(
        mut self,
        order: &[Category],
        kind: RecordKind,
        titles: &dyn GroupTitleFormatter,
    ) -> (Vec<Group<&'a T>>, Vec<&'a T>) {
        let mut groups: Vec<Group<&'a T>> = order
            .iter()
            .map(|category| Group {
                key: GroupKey::Fixed(*category),
                title: titles.fixed_title(*category, kind),
                items: self.take_fixed(*category),
            })
            .collect();

        groups.extend(
            std::mem::take(&mut self.future)
                .into_iter()
                .map(|(date, items)| Group {
                    key: GroupKey::Date(date),
                    title: titles.date_title(date),
                    items,
                }),
        );

        (groups, self.completed)
    }
}

/// Groups tasks into `[today, tomorrow, none, overdue, <future asc>, completed]`.
///
/// Every group is emitted, even when empty; hiding empty buckets is up to the
/// caller.
pub fn build_task_groups<'a, T: DatedRecord>(
    tasks: &'a [T],
    anchor: &DayAnchor,
    titles: &dyn GroupTitleFormatter,
) -> Vec<Group<&'a T>> {
    let mut partition = Partition::new();
    for task in tasks {
        if task.is_completed() {
            partition.completed.push(task);
        } else {
            partition.route(task, task.classification_date(), anchor);
        }
    }

    let (mut groups, completed) = partition.into_groups(&TASK_FIXED_ORDER, RecordKind::Task, titles);
    groups.push(Group {
        key: GroupKey::Fixed(Category::Completed),
        title: titles.fixed_title(Category::Completed, RecordKind::Task),
        items: completed,
    });

    debug!(
        "event=group_build module=grouping variant=task records={} groups={}",
        tasks.len(),
        groups.len()
    );
    groups
}

/// Groups events into `[today, tomorrow, overdue, <future asc>]`.
///
/// Empty groups, fixed or dated, are dropped from the result.
pub fn build_event_groups<'a, T: ScheduledRecord>(
    events: &'a [T],
    anchor: &DayAnchor,
    titles: &dyn GroupTitleFormatter,
) -> Vec<Group<&'a T>> {
    let mut partition = Partition::new();
    for event in events {
        partition.route(event, Some(event.start_date()), anchor);
    }

    let (groups, _) = partition.into_groups(&EVENT_FIXED_ORDER, RecordKind::Event, titles);
    let groups: Vec<_> = groups.into_iter().filter(|group| !group.is_empty()).collect();

    debug!(
        "event=group_build module=grouping variant=event records={} groups={}",
        events.len(),
        groups.len()
    );
    groups
}

/// Open tasks planned for today, in input order.
pub fn today_tasks<'a, T: DatedRecord>(tasks: &'a [T], anchor: &DayAnchor) -> Vec<&'a T> {
    tasks
        .iter()
        .filter(|task| !task.is_completed())
        .filter(|task| anchor.classify(task.classification_date()) == Category::Today)
        .collect()
}
