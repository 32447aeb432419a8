//! Date expansion -- turns a schedule into the concrete days it occurs on.
//!
//! Two modes share one algorithm and differ in three documented policies:
//!
//! | Policy | [`ExpansionMode::Range`] | [`ExpansionMode::WeekdayMatch`] |
//! |---|---|---|
//! | `MONTHLY_<DAY>` | first such weekday of each month | every such weekday |
//! | `DAILY`/`MONTHLY`/`YEARLY` fallback | when the rule tokens produced no dates | when no rule tokens are present |
//! | `NEVER` | `startsOn`, if inside the window | `startsOn`, window ignored |
//!
//! `Range` backs date lists and the date-membership query; `WeekdayMatch`
//! backs calendar-grid highlighting.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calendar;
use crate::error::{OccurrenceError, Result};
use crate::item::{RecurringItem, Schedule};
use crate::options::ExpandOptions;
use crate::token::{Occurrence, Position};

/// Which of the two expansion policies to apply; parses from `range` or `days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionMode {
    /// Date lists and date membership.
    #[default]
    Range,
    /// Calendar-grid highlighting.
    WeekdayMatch,
}

impl FromStr for ExpansionMode {
    type Err = OccurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "range" | "dates" => Ok(ExpansionMode::Range),
            "days" | "weekday" | "weekdays" => Ok(ExpansionMode::WeekdayMatch),
            _ => Err(OccurrenceError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExpansionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpansionMode::Range => "range",
            ExpansionMode::WeekdayMatch => "days",
        })
    }
}

/// Expand a schedule within `[startsOn, effective end]`.
///
/// The result is strictly ascending. An inverted window yields nothing,
/// except for `NEVER` in [`ExpansionMode::WeekdayMatch`].
pub fn expand(schedule: &Schedule, mode: ExpansionMode, options: &ExpandOptions) -> Vec<NaiveDate> {
    let start = schedule.starts_on;
    if schedule.occurrences.is_never() && mode == ExpansionMode::WeekdayMatch {
        return vec![start];
    }
    let end = schedule.effective_end(options);
    expand_window(schedule, start, end, mode)
}

/// Like [`expand`] over an explicit window, which may extend past `endsOn`.
pub(crate) fn expand_window(
    schedule: &Schedule,
    start: NaiveDate,
    end: NaiveDate,
    mode: ExpansionMode,
) -> Vec<NaiveDate> {
    if start > end {
        debug!(%start, %end, "start is after end, nothing to expand");
        return Vec::new();
    }
    debug!(%start, %end, %mode, "expanding occurrences");

    let anchor = schedule.starts_on;
    let mut one_off = BTreeSet::new();
    let mut ruled = BTreeSet::new();
    let mut fallback = Vec::new();
    let mut rule_tokens = false;

    for occurrence in &schedule.occurrences {
        match *occurrence {
            Occurrence::Never => {
                if calendar::within(anchor, start, end) {
                    one_off.insert(anchor);
                }
            }
            Occurrence::OnDate(date) => {
                if calendar::within(date, start, end) {
                    one_off.insert(date);
                }
            }
            Occurrence::Weekly(weekday) => {
                rule_tokens = true;
                ruled.extend(calendar::weekly(start, end, weekday));
            }
            Occurrence::MonthlyPositional(position, weekday) => {
                rule_tokens = true;
                ruled.extend(calendar::monthly_positional(start, end, position, weekday));
            }
            Occurrence::MonthlyDay(day) => {
                rule_tokens = true;
                ruled.extend(calendar::monthly_on_day(start, end, u32::from(day)));
            }
            Occurrence::MonthlyWeekday(weekday) => {
                rule_tokens = true;
                match mode {
                    ExpansionMode::Range => ruled.extend(calendar::monthly_positional(
                        start,
                        end,
                        Position::First,
                        weekday,
                    )),
                    ExpansionMode::WeekdayMatch => {
                        ruled.extend(calendar::monthly_every_weekday(start, end, weekday))
                    }
                }
            }
            Occurrence::Daily | Occurrence::Monthly | Occurrence::Yearly => {
                fallback.push(*occurrence);
            }
        }
    }

    let use_fallback = match mode {
        ExpansionMode::Range => ruled.is_empty(),
        ExpansionMode::WeekdayMatch => !rule_tokens,
    };
    if use_fallback {
        for occurrence in fallback {
            match occurrence {
                Occurrence::Daily => ruled.extend(calendar::daily(start, end)),
                Occurrence::Monthly => {
                    ruled.extend(calendar::monthly_on_day(start, end, anchor.day()))
                }
                Occurrence::Yearly => ruled.extend(yearly_from(anchor, start, end)),
                _ => {}
            }
        }
    }

    ruled.append(&mut one_off);
    ruled.into_iter().collect()
}

/// Anchor month/day each year, restricted to the window.
fn yearly_from(anchor: NaiveDate, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    calendar::yearly(anchor, end).filter(move |date| *date >= start)
}

/// Parse and expand an item, degrading to an empty list on malformed dates.
pub fn expand_item(
    item: &RecurringItem,
    mode: ExpansionMode,
    options: &ExpandOptions,
) -> Vec<NaiveDate> {
    match item.schedule() {
        Ok(schedule) => expand(&schedule, mode, options),
        Err(err) => {
            debug!(%err, "unparseable schedule, no occurrences");
            Vec::new()
        }
    }
}

/// Range-bounded expansion as `YYYY-MM-DD` strings.
///
/// ```
/// use occurrence_engine::{todo_dates, RecurringItem};
///
/// let item = RecurringItem::new("2026-02-01", Some("2026-02-28"), &["WEEKLY_MONDAY"]);
/// assert_eq!(
///     todo_dates(&item),
///     vec!["2026-02-02", "2026-02-09", "2026-02-16", "2026-02-23"]
/// );
/// ```
pub fn todo_dates(item: &RecurringItem) -> Vec<String> {
    todo_dates_with(item, &ExpandOptions::default())
}

/// [`todo_dates`] with explicit expansion options.
pub fn todo_dates_with(item: &RecurringItem, options: &ExpandOptions) -> Vec<String> {
    format_dates(expand_item(item, ExpansionMode::Range, options))
}

/// Weekday-matching expansion as `YYYY-MM-DD` strings.
pub fn todo_days(item: &RecurringItem) -> Vec<String> {
    todo_days_with(item, &ExpandOptions::default())
}

/// [`todo_days`] with explicit expansion options.
pub fn todo_days_with(item: &RecurringItem, options: &ExpandOptions) -> Vec<String> {
    format_dates(expand_item(item, ExpansionMode::WeekdayMatch, options))
}

fn format_dates(dates: Vec<NaiveDate>) -> Vec<String> {
    dates
        .into_iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}
