//! Human-readable labels for occurrence sets.
//!
//! A canonical set renders as one label per one-off rule (`Daily`,
//! `On 2026-03-01`, ...), then at most one weekly sentence and one monthly
//! sentence:
//!
//! ```
//! use occurrence_engine::repeats_labels;
//!
//! assert_eq!(repeats_labels(&["MONTHLY_DAY_15"]), vec!["Monthly on the 15th"]);
//! assert_eq!(
//!     repeats_labels(&["WEEKLY_MONDAY", "WEEKLY_WEDNESDAY", "WEEKLY_SUNDAY"]),
//!     vec!["Weekly on Sunday, Monday and Wednesday"]
//! );
//! ```

use chrono::Weekday;

use crate::normalizer::OccurrenceSet;
use crate::token::{Occurrence, Position};

/// Vet `set` and describe it.
pub fn repeats_labels<S: AsRef<str>>(set: &[S]) -> Vec<String> {
    describe(&OccurrenceSet::vet(set))
}

/// One label per rule family, in a fixed order, for an already canonical set.
pub fn describe(set: &OccurrenceSet) -> Vec<String> {
    let mut labels = Vec::new();
    let mut weekly = Vec::new();
    let mut monthly_weekdays = Vec::new();
    let mut positional = Vec::new();
    let mut month_days = Vec::new();

    for occurrence in set {
        match *occurrence {
            Occurrence::Never => labels.push("Never".to_string()),
            Occurrence::Daily => labels.push("Daily".to_string()),
            Occurrence::Yearly => labels.push("Yearly".to_string()),
            Occurrence::Monthly => labels.push("Monthly".to_string()),
            Occurrence::OnDate(date) => labels.push(format!("On {}", date.format("%Y-%m-%d"))),
            Occurrence::Weekly(day) => weekly.push(day),
            Occurrence::MonthlyWeekday(day) => monthly_weekdays.push(day),
            Occurrence::MonthlyPositional(position, day) => positional.push((position, day)),
            Occurrence::MonthlyDay(day) => month_days.push(day),
        }
    }

    if !weekly.is_empty() {
        weekly.sort_by_key(Weekday::num_days_from_sunday);
        let names: Vec<String> = weekly.iter().map(|d| weekday_name(*d).to_string()).collect();
        labels.push(format!("Weekly on {}", join_and(&names)));
    }

    let mut parts = Vec::new();
    if !monthly_weekdays.is_empty() {
        monthly_weekdays.sort_by_key(Weekday::num_days_from_sunday);
        let names: Vec<String> = monthly_weekdays
            .iter()
            .map(|d| format!("{}s", weekday_name(*d)))
            .collect();
        parts.push(join_and(&names));
    }
    if !positional.is_empty() {
        positional.sort_by_key(|(position, day)| (*position, day.num_days_from_sunday()));
        let names: Vec<String> = positional
            .iter()
            .map(|(position, day)| format!("{} {}", position_label(*position), weekday_name(*day)))
            .collect();
        parts.push(format!("the {}", join_and(&names)));
    }
    if !month_days.is_empty() {
        month_days.sort_unstable();
        let names: Vec<String> = month_days.iter().map(|n| ordinal(u32::from(*n))).collect();
        parts.push(format!("the {}", join_and(&names)));
    }
    if !parts.is_empty() {
        labels.push(format!("Monthly on {}", join_parts(&parts)));
    }

    labels
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, `12th`, `13th`, `21st`, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// English weekday name, e.g. `Monday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn position_label(position: Position) -> String {
    match position.nth() {
        Some(n) => ordinal(u32::from(n)),
        None => "last".to_string(),
    }
}

/// `A`, `A and B`, `A, B and C`.
fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Like [`join_and`] but with a serial comma once there are three parts.
fn join_parts(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
