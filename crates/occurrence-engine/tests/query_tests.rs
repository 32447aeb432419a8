//! Tests for date-membership and next-occurrence queries.

use chrono::NaiveDate;
use occurrence_engine::{
    next_occurrence, next_occurrence_with, todos_by_date, todos_by_date_with, ExpandOptions,
    RecurringItem,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A host entity with fields the engine does not care about.
#[derive(Debug, PartialEq)]
struct Todo {
    title: &'static str,
    recurrence: RecurringItem,
}

impl AsRef<RecurringItem> for Todo {
    fn as_ref(&self) -> &RecurringItem {
        &self.recurrence
    }
}

fn todo(title: &'static str, starts_on: &str, ends_on: Option<&str>, occurrences: &[&str]) -> Todo {
    Todo {
        title,
        recurrence: RecurringItem::new(starts_on, ends_on, occurrences),
    }
}

fn titles(todos: &[&Todo]) -> Vec<&'static str> {
    todos.iter().map(|t| t.title).collect()
}

// ---------------------------------------------------------------------------
// todos_by_date
// ---------------------------------------------------------------------------

#[test]
fn filters_items_occurring_on_the_date_in_input_order() {
    let todos = vec![
        todo("standup", "2026-02-01", Some("2026-03-31"), &["WEEKLY_MONDAY"]),
        todo("rent", "2026-01-01", Some("2026-12-31"), &["MONTHLY_DAY_2"]),
        todo("dentist", "2026-02-02", None, &["NEVER"]),
        todo("review", "2026-02-01", Some("2026-12-31"), &["MONTHLY_LAST_FRIDAY"]),
    ];

    assert_eq!(
        titles(&todos_by_date(&todos, "2026-02-02")),
        vec!["standup", "rent", "dentist"]
    );
    assert_eq!(titles(&todos_by_date(&todos, "2026-02-27")), vec!["review"]);
    assert!(todos_by_date(&todos, "2026-02-03").is_empty());
}

#[test]
fn works_on_plain_recurring_items() {
    let items = vec![
        RecurringItem::new("2026-02-01", Some("2026-02-28"), &["DAILY"]),
        RecurringItem::new("2026-02-01", Some("2026-02-28"), &["2026-02-14"]),
    ];
    assert_eq!(todos_by_date(&items, "2026-02-14").len(), 2);
    assert_eq!(todos_by_date(&items, "2026-02-15"), vec![&items[0]]);
}

#[test]
fn dates_outside_the_range_never_match() {
    let todos = vec![todo("gym", "2026-02-01", Some("2026-02-28"), &["DAILY"])];
    assert!(todos_by_date(&todos, "2026-01-31").is_empty());
    assert!(todos_by_date(&todos, "2026-03-01").is_empty());
}

#[test]
fn malformed_query_date_matches_nothing() {
    let todos = vec![todo("gym", "2026-02-01", Some("2026-02-28"), &["DAILY"])];
    assert!(todos_by_date(&todos, "Feb 2").is_empty());
}

#[test]
fn malformed_items_are_skipped() {
    let todos = vec![
        todo("broken", "2026-02-31", None, &["DAILY"]),
        todo("fine", "2026-02-01", None, &["DAILY"]),
    ];
    assert_eq!(titles(&todos_by_date(&todos, "2026-02-05")), vec!["fine"]);
}

#[test]
fn open_ended_items_follow_the_options() {
    let todos = vec![todo("water plants", "2026-02-01", None, &["WEEKLY_MONDAY"])];
    assert_eq!(todos_by_date(&todos, "2026-06-01").len(), 1);
    assert!(todos_by_date_with(&todos, "2026-06-01", &ExpandOptions::anchor_only()).is_empty());
}

// ---------------------------------------------------------------------------
// next_occurrence
// ---------------------------------------------------------------------------

#[test]
fn next_is_inclusive_of_the_from_date() {
    let item = RecurringItem::new("2026-02-01", Some("2026-12-31"), &["WEEKLY_MONDAY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 2, 9)), Some(ymd(2026, 2, 9)));
    assert_eq!(next_occurrence(&item, ymd(2026, 2, 10)), Some(ymd(2026, 2, 16)));
}

#[test]
fn next_before_start_is_the_first_occurrence() {
    let item = RecurringItem::new("2026-02-01", Some("2026-12-31"), &["MONTHLY_LAST_FRIDAY"]);
    assert_eq!(next_occurrence(&item, ymd(2025, 1, 1)), Some(ymd(2026, 2, 27)));
}

#[test]
fn next_after_end_is_none() {
    let item = RecurringItem::new("2026-02-01", Some("2026-02-28"), &["DAILY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 3, 1)), None);
}

#[test]
fn next_for_open_ended_item_far_from_anchor() {
    // Anchored in 2020 with no end; the default horizon alone would stop in 2021.
    let item = RecurringItem::new("2020-01-01", None, &["MONTHLY_DAY_15"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 10, 19)), Some(ymd(2026, 11, 15)));
}

#[test]
fn next_for_never_is_only_the_start() {
    let item = RecurringItem::new("2026-02-01", None, &["NEVER"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 1, 1)), Some(ymd(2026, 2, 1)));
    assert_eq!(next_occurrence(&item, ymd(2026, 2, 2)), None);
}

#[test]
fn next_with_anchor_only_stays_on_the_anchor() {
    let item = RecurringItem::new("2026-02-02", None, &["WEEKLY_MONDAY"]);
    let options = ExpandOptions::anchor_only();
    assert_eq!(
        next_occurrence_with(&item, ymd(2026, 2, 1), &options),
        Some(ymd(2026, 2, 2))
    );
    assert_eq!(next_occurrence_with(&item, ymd(2026, 2, 3), &options), None);
}

#[test]
fn next_for_malformed_item_is_none() {
    let item = RecurringItem::new("", None, &["DAILY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 1, 1)), None);
}

#[test]
fn next_for_daily_anchored_decades_ago() {
    let item = RecurringItem::new("1990-01-01", None, &["DAILY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 10, 19)), Some(ymd(2026, 10, 19)));

    let item = RecurringItem::new("1990-01-01", None, &["WEEKLY_FRIDAY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 10, 19)), Some(ymd(2026, 10, 23)));
}

#[test]
fn next_keeps_anchor_relative_fallbacks() {
    // MONTHLY stays on the anchor's day, YEARLY on its month and day.
    let item = RecurringItem::new("2020-01-31", None, &["MONTHLY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 10, 19)), Some(ymd(2026, 10, 31)));

    let item = RecurringItem::new("2020-03-10", None, &["YEARLY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 10, 19)), Some(ymd(2027, 3, 10)));
}

#[test]
fn next_with_rules_and_fallback_matches_full_expansion() {
    // Feb 3 is the first Tuesday, so MONTHLY never fires for this range even
    // though no rule date falls on or after Feb 4.
    let item = RecurringItem::new("2026-02-02", Some("2026-03-02"), &["MONTHLY_TUESDAY", "MONTHLY"]);
    assert_eq!(next_occurrence(&item, ymd(2026, 2, 3)), Some(ymd(2026, 2, 3)));
    assert_eq!(next_occurrence(&item, ymd(2026, 2, 4)), None);
}

#[test]
fn next_with_huge_horizon_stays_bounded() {
    let item = RecurringItem::new("2026-01-01", None, &["WEEKLY_MONDAY"]);
    let options = ExpandOptions::default().with_horizon_days(u32::MAX);
    assert_eq!(
        next_occurrence_with(&item, ymd(2026, 10, 19), &options),
        Some(ymd(2026, 10, 19))
    );
    assert_eq!(
        next_occurrence_with(&item, ymd(2200, 1, 1), &options),
        Some(ymd(2200, 1, 6))
    );
}
