//! Occurrence token grammar -- parses recurrence tokens into a closed sum type.
//!
//! Tokens are compact upper-case strings such as `WEEKLY_MONDAY`,
//! `MONTHLY_LAST_FRIDAY`, `MONTHLY_DAY_15` or a literal `2026-02-01`. The
//! grammar is closed: anything that does not match one of the variants of
//! [`Occurrence`] exactly is rejected.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{OccurrenceError, Result};

/// The seven weekdays in week order, Sunday first.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Position of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::First,
        Position::Second,
        Position::Third,
        Position::Fourth,
        Position::Last,
    ];

    /// The 1-based index counted from the start of the month, or `None` for `Last`.
    pub fn nth(self) -> Option<u8> {
        match self {
            Position::First => Some(1),
            Position::Second => Some(2),
            Position::Third => Some(3),
            Position::Fourth => Some(4),
            Position::Last => None,
        }
    }

    fn token(self) -> &'static str {
        match self {
            Position::First => "1ST",
            Position::Second => "2ND",
            Position::Third => "3RD",
            Position::Fourth => "4TH",
            Position::Last => "LAST",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Position::ALL.into_iter().find(|p| p.token() == s)
    }
}

/// Token family, used by the normalizer's precedence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Never,
    Daily,
    Yearly,
    Monthly,
    Weekly,
    MonthlyWeekday,
    MonthlyPositional,
    MonthlyDay,
    Date,
}

/// A single recurrence rule or one-off date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Occurrence {
    /// `NEVER` -- once, on the start date.
    Never,
    /// `DAILY`
    Daily,
    /// `YEARLY` -- the start date's month and day, every year.
    Yearly,
    /// `MONTHLY` -- the start date's day of month, every month.
    Monthly,
    /// `WEEKLY_<DAY>`
    Weekly(Weekday),
    /// `MONTHLY_<DAY>`
    MonthlyWeekday(Weekday),
    /// `MONTHLY_<POS>_<DAY>`
    MonthlyPositional(Position, Weekday),
    /// `MONTHLY_DAY_<N>`, always within `1..=31`.
    MonthlyDay(u8),
    /// `YYYY-MM-DD`
    OnDate(NaiveDate),
}

impl Occurrence {
    /// The family this token belongs to.
    pub fn family(&self) -> Family {
        match self {
            Occurrence::Never => Family::Never,
            Occurrence::Daily => Family::Daily,
            Occurrence::Yearly => Family::Yearly,
            Occurrence::Monthly => Family::Monthly,
            Occurrence::Weekly(_) => Family::Weekly,
            Occurrence::MonthlyWeekday(_) => Family::MonthlyWeekday,
            Occurrence::MonthlyPositional(..) => Family::MonthlyPositional,
            Occurrence::MonthlyDay(_) => Family::MonthlyDay,
            Occurrence::OnDate(_) => Family::Date,
        }
    }

    /// A one-off `YYYY-MM-DD` date.
    pub fn is_date(&self) -> bool {
        matches!(self, Occurrence::OnDate(_))
    }

    /// A weekday or day-of-month rule.
    pub fn is_rule(&self) -> bool {
        matches!(
            self,
            Occurrence::Weekly(_)
                | Occurrence::MonthlyWeekday(_)
                | Occurrence::MonthlyPositional(..)
                | Occurrence::MonthlyDay(_)
        )
    }

    /// `DAILY`, `MONTHLY` or `YEARLY`, which only apply when the rules yield nothing.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Occurrence::Daily | Occurrence::Monthly | Occurrence::Yearly)
    }
}

/// Returns `true` if `token` (after trimming) is a well-formed occurrence token.
///
/// ```
/// use occurrence_engine::is_valid_occurrence;
///
/// assert!(is_valid_occurrence("MONTHLY_DAY_15"));
/// assert!(is_valid_occurrence(" WEEKLY_MONDAY "));
/// assert!(!is_valid_occurrence("MONTHLY_DAY_32"));
/// assert!(!is_valid_occurrence("MONTHLY_5TH_MONDAY"));
/// ```
pub fn is_valid_occurrence(token: &str) -> bool {
    parse_token(token.trim()).is_some()
}

impl FromStr for Occurrence {
    type Err = OccurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        parse_token(s.trim()).ok_or_else(|| OccurrenceError::InvalidToken(s.to_string()))
    }
}

impl TryFrom<String> for Occurrence {
    type Error = OccurrenceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Occurrence> for String {
    fn from(value: Occurrence) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::Never => f.write_str("NEVER"),
            Occurrence::Daily => f.write_str("DAILY"),
            Occurrence::Yearly => f.write_str("YEARLY"),
            Occurrence::Monthly => f.write_str("MONTHLY"),
            Occurrence::Weekly(day) => write!(f, "WEEKLY_{}", weekday_token(*day)),
            Occurrence::MonthlyWeekday(day) => write!(f, "MONTHLY_{}", weekday_token(*day)),
            Occurrence::MonthlyPositional(pos, day) => {
                write!(f, "MONTHLY_{}_{}", pos.token(), weekday_token(*day))
            }
            Occurrence::MonthlyDay(n) => write!(f, "MONTHLY_DAY_{}", n),
            Occurrence::OnDate(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Parse a host-entity date (`startsOn` / `endsOn`).
///
/// Accepts a bare `YYYY-MM-DD` or an ISO datetime whose first ten characters
/// are one (`2026-02-01T09:30:00.000Z`); the time part is ignored.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    let date_part = match trimmed.get(..10) {
        Some(head) if trimmed.len() == 10 || trimmed[10..].starts_with('T') => head,
        _ => trimmed,
    };
    parse_date_token(date_part).ok_or_else(|| OccurrenceError::InvalidDate(s.to_string()))
}

fn parse_token(token: &str) -> Option<Occurrence> {
    match token {
        "NEVER" => return Some(Occurrence::Never),
        "DAILY" => return Some(Occurrence::Daily),
        "YEARLY" => return Some(Occurrence::Yearly),
        "MONTHLY" => return Some(Occurrence::Monthly),
        _ => {}
    }

    if let Some(day) = token.strip_prefix("WEEKLY_") {
        return parse_weekday(day).map(Occurrence::Weekly);
    }
    if let Some(rest) = token.strip_prefix("MONTHLY_") {
        return parse_monthly(rest);
    }
    parse_date_token(token).map(Occurrence::OnDate)
}

/// Everything after `MONTHLY_`.
fn parse_monthly(rest: &str) -> Option<Occurrence> {
    if let Some(n) = rest.strip_prefix("DAY_") {
        return parse_month_day(n).map(Occurrence::MonthlyDay);
    }
    match rest.split_once('_') {
        Some((pos, day)) => Some(Occurrence::MonthlyPositional(
            Position::parse(pos)?,
            parse_weekday(day)?,
        )),
        None => parse_weekday(rest).map(Occurrence::MonthlyWeekday),
    }
}

/// Digits only, no leading zero, within `1..=31`.
fn parse_month_day(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u8 = s.parse().ok()?;
    (1..=31).contains(&n).then_some(n)
}

/// Strict `DDDD-DD-DD` naming a real calendar day.
fn parse_date_token(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    let year: i32 = s[..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    WEEK_ORDER.into_iter().find(|day| weekday_token(*day) == s)
}

fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "SUNDAY",
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_every_shape() {
        for token in [
            "NEVER",
            "DAILY",
            "YEARLY",
            "MONTHLY",
            "WEEKLY_SATURDAY",
            "MONTHLY_TUESDAY",
            "MONTHLY_3RD_THURSDAY",
            "MONTHLY_LAST_SUNDAY",
            "MONTHLY_DAY_31",
            "2024-02-29",
        ] {
            let parsed: Occurrence = token.parse().unwrap();
            assert_eq!(parsed.to_string(), token);
        }
    }

    #[test]
    fn month_day_rejects_leading_zero_and_signs() {
        assert_eq!(parse_month_day("05"), None);
        assert_eq!(parse_month_day("+5"), None);
        assert_eq!(parse_month_day("100"), None);
        assert_eq!(parse_month_day("9"), Some(9));
    }

    #[test]
    fn date_token_must_be_a_real_day() {
        assert!(parse_date_token("2025-02-29").is_none());
        assert!(parse_date_token("2024-2-29").is_none());
        assert!(parse_date_token("2024-02-29").is_some());
    }

    #[test]
    fn parse_date_accepts_iso_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(parse_date("2026-02-01").unwrap(), expected);
        assert_eq!(parse_date("2026-02-01T23:15:00.000Z").unwrap(), expected);
        assert!(parse_date("2026-02-01 23:15").is_err());
        assert!(parse_date("").is_err());
    }
}
