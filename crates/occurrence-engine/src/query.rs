//! Date queries over expanded items: membership on a given day and the next
//! occurrence on or after a day.

use chrono::NaiveDate;
use tracing::debug;

use crate::expander::{expand, expand_window, ExpansionMode};
use crate::item::{horizon_from, RecurringItem};
use crate::options::ExpandOptions;
use crate::token::{parse_date, Occurrence};

/// Items whose range expansion includes `date`, in input order.
///
/// A malformed `date` matches nothing.
pub fn todos_by_date<'a, T: AsRef<RecurringItem>>(items: &'a [T], date: &str) -> Vec<&'a T> {
    todos_by_date_with(items, date, &ExpandOptions::default())
}

/// [`todos_by_date`] with explicit expansion options.
pub fn todos_by_date_with<'a, T: AsRef<RecurringItem>>(
    items: &'a [T],
    date: &str,
    options: &ExpandOptions,
) -> Vec<&'a T> {
    let Ok(date) = parse_date(date) else {
        debug!(date, "unparseable query date");
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| occurs_on((*item).as_ref(), date, options))
        .collect()
}

/// Whether the item's range expansion includes `date`.
pub fn occurs_on(item: &RecurringItem, date: NaiveDate, options: &ExpandOptions) -> bool {
    let Ok(schedule) = item.schedule() else {
        return false;
    };
    if date < schedule.starts_on || date > schedule.effective_end(options) {
        return false;
    }
    expand(&schedule, ExpansionMode::Range, options)
        .binary_search(&date)
        .is_ok()
}

/// The earliest occurrence on or after `from`.
///
/// Open-ended items search up to `from + horizon_days`, so items anchored
/// long before `from` still resolve.
pub fn next_occurrence(item: &RecurringItem, from: NaiveDate) -> Option<NaiveDate> {
    next_occurrence_with(item, from, &ExpandOptions::default())
}

/// [`next_occurrence`] with explicit expansion options.
///
/// Expansion starts at `from` rather than `startsOn` unless the set mixes
/// rule tokens with a fallback frequency, since whether the fallback applies
/// depends on the whole range.
pub fn next_occurrence_with(
    item: &RecurringItem,
    from: NaiveDate,
    options: &ExpandOptions,
) -> Option<NaiveDate> {
    let schedule = item.schedule().ok()?;
    let mut end = schedule.effective_end(options);
    if schedule.ends_on.is_none() && end != schedule.starts_on {
        end = end.max(horizon_from(from, options.effective_horizon_days()));
    }
    let occurrences = &schedule.occurrences;
    let mixed = occurrences.iter().any(Occurrence::is_rule)
        && occurrences.iter().any(Occurrence::is_fallback);
    let start = if mixed {
        schedule.starts_on
    } else {
        schedule.starts_on.max(from)
    };
    debug!(%start, %end, mixed, "searching for next occurrence");
    let dates = expand_window(&schedule, start, end, ExpansionMode::Range);
    let index = dates.partition_point(|date| *date < from);
    dates.get(index).copied()
}
