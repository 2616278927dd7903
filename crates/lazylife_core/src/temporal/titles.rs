//! Group and label titles.
//!
//! Titles are presentation only: grouping asks a `GroupTitleFormatter` for
//! the `title` field and never derives keys from it.

use crate::temporal::classifier::{Category, DayAnchor};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Which list a title is rendered for. The overdue bucket reads differently
/// for tasks ("overdue") and events ("past").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Task,
    Event,
}

/// Formatting collaborator for group titles.
pub trait GroupTitleFormatter: Send + Sync {
    /// Title of a fixed bucket.
    fn fixed_title(&self, category: Category, kind: RecordKind) -> String;
    /// Long, weekday-qualified title of a future day group.
    fn date_title(&self, date: NaiveDate) -> String;
    /// Compact month/day title used for per-item labels.
    fn short_date_title(&self, date: NaiveDate) -> String;
}

/// Japanese titles, e.g. `2024年6月20日(木)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseTitles;

impl GroupTitleFormatter for JapaneseTitles {
    fn fixed_title(&self, category: Category, kind: RecordKind) -> String {
        let title = match (category, kind) {
            (Category::None, _) => "日付なし",
            (Category::Today, _) => "今日",
            (Category::Tomorrow, _) => "明日",
            (Category::Overdue, RecordKind::Task) => "期限切れ",
            (Category::Overdue, RecordKind::Event) => "過去",
            // Grouping titles future buckets with `date_title`; this label is
            // for callers that render the bare category.
            (Category::Future, _) => "今後",
            (Category::Completed, _) => "完了済み",
        };
        title.to_string()
    }

    fn date_title(&self, date: NaiveDate) -> String {
        format!(
            "{}年{}月{}日({})",
            date.year(),
            date.month(),
            date.day(),
            japanese_weekday(date.weekday())
        )
    }

    fn short_date_title(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}({})",
            date.month(),
            date.day(),
            japanese_weekday(date.weekday())
        )
    }
}

fn japanese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// English titles, e.g. `Thu, Jun 20 2024`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTitles;

impl GroupTitleFormatter for EnglishTitles {
    fn fixed_title(&self, category: Category, kind: RecordKind) -> String {
        let title = match (category, kind) {
            (Category::None, _) => "No date",
            (Category::Today, _) => "Today",
            (Category::Tomorrow, _) => "Tomorrow",
            (Category::Overdue, RecordKind::Task) => "Overdue",
            (Category::Overdue, RecordKind::Event) => "Past",
            // Unused by grouping, see `JapaneseTitles`.
            (Category::Future, _) => "Upcoming",
            (Category::Completed, _) => "Completed",
        };
        title.to_string()
    }

    fn date_title(&self, date: NaiveDate) -> String {
        date.format("%a, %b %-d %Y").to_string()
    }

    fn short_date_title(&self, date: NaiveDate) -> String {
        date.format("%-m/%-d (%a)").to_string()
    }
}

/// Title language selected in `CoreConfig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleLocale {
    #[default]
    Ja,
    En,
}

impl TitleLocale {
    pub fn formatter(self) -> &'static dyn GroupTitleFormatter {
        match self {
            Self::Ja => &JapaneseTitles,
            Self::En => &EnglishTitles,
        }
    }
}

/// Per-item day badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateLabel {
    pub text: String,
    /// One of `Today`, `Tomorrow`, `Overdue`, `Future`.
    pub kind: Category,
}

/// Builds the badge shown next to a single task.
///
/// Returns `None` for undated items.
pub fn date_label(
    date: Option<NaiveDate>,
    anchor: &DayAnchor,
    titles: &dyn GroupTitleFormatter,
) -> Option<DateLabel> {
    let date = date?;
    let kind = anchor.classify(Some(date));
    let text = match kind {
        Category::Future => titles.short_date_title(date),
        other => titles.fixed_title(other, RecordKind::Task),
    };
    Some(DateLabel { text, kind })
}
