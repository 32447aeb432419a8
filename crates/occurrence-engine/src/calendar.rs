//! Calendar arithmetic shared by both expansion modes.
//!
//! Every generator yields dates in ascending order and stays inside the
//! inclusive `[start, end]` window it is given. An inverted window yields
//! nothing.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::token::Position;

/// The first `weekday` on or after `from`.
pub fn first_weekday_on_or_after(from: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + weekday.num_days_from_sunday() - from.weekday().num_days_from_sunday()) % 7;
    from.checked_add_days(Days::new(u64::from(ahead)))
}

/// The last calendar day of the month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// The last `weekday` of the month, counted backwards from its last day.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    let back = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    last.checked_sub_days(Days::new(u64::from(back)))
}

/// The `position`-th `weekday` of the month. The 1st to 4th always exist.
pub fn positional_weekday(
    year: i32,
    month: u32,
    position: Position,
    weekday: Weekday,
) -> Option<NaiveDate> {
    match position.nth() {
        Some(n) => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n),
        None => last_weekday_of_month(year, month, weekday),
    }
}

/// Every `weekday` of the month, in order.
pub fn weekdays_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, 1)
        .into_iter()
        .flat_map(|first| first.iter_weeks())
        .take_while(move |date| date.month() == month)
}

/// `(year, month)` pairs for every month touching `[start, end]`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = (i32, u32)> {
    let first = start.year() * 12 + start.month0() as i32;
    let last = end.year() * 12 + end.month0() as i32;
    (first..=last).map(|index| (index.div_euclid(12), index.rem_euclid(12) as u32 + 1))
}

/// Every day of the window.
pub fn daily(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}

/// `weekday` every seven days, starting from the first one on or after `start`.
pub fn weekly(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> impl Iterator<Item = NaiveDate> {
    first_weekday_on_or_after(start, weekday)
        .into_iter()
        .flat_map(|first| first.iter_weeks())
        .take_while(move |date| *date <= end)
}

/// Calendar day `day` of every month; months without that day are skipped.
pub fn monthly_on_day(
    start: NaiveDate,
    end: NaiveDate,
    day: u32,
) -> impl Iterator<Item = NaiveDate> {
    months_between(start, end)
        .filter_map(move |(year, month)| NaiveDate::from_ymd_opt(year, month, day))
        .filter(move |date| within(*date, start, end))
}

/// The `position`-th `weekday` of every month, clipped to the window.
pub fn monthly_positional(
    start: NaiveDate,
    end: NaiveDate,
    position: Position,
    weekday: Weekday,
) -> impl Iterator<Item = NaiveDate> {
    months_between(start, end)
        .filter_map(move |(year, month)| positional_weekday(year, month, position, weekday))
        .filter(move |date| within(*date, start, end))
}

/// Every `weekday` of every month touching the window, clipped to it.
pub fn monthly_every_weekday(
    start: NaiveDate,
    end: NaiveDate,
    weekday: Weekday,
) -> impl Iterator<Item = NaiveDate> {
    months_between(start, end)
        .flat_map(move |(year, month)| weekdays_of_month(year, month, weekday))
        .filter(move |date| within(*date, start, end))
}

/// The start date's month and day every year. Feb 29 only lands in leap years.
pub fn yearly(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (start.year()..=end.year())
        .filter_map(move |year| NaiveDate::from_ymd_opt(year, start.month(), start.day()))
        .filter(move |date| within(*date, start, end))
}

/// Whether `date` lies in the inclusive `[start, end]` window.
pub fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}
