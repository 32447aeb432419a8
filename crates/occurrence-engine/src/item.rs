//! The host entity as the engine sees it, and its parsed schedule.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{OccurrenceError, Result};
use crate::normalizer::OccurrenceSet;
use crate::options::{ExpandOptions, OpenEnd};
use crate::token::parse_date;

/// The three fields of a recurring to-do that drive recurrence.
///
/// Deserializes from the host entity's JSON (`startsOn`, `endsOn`,
/// `occurrences`); any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringItem {
    pub starts_on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<String>,
    #[serde(default)]
    pub occurrences: Vec<String>,
}

impl RecurringItem {
    /// Build an item from raw strings, as a host would hand them over.
    pub fn new(starts_on: &str, ends_on: Option<&str>, occurrences: &[&str]) -> Self {
        Self {
            starts_on: starts_on.to_string(),
            ends_on: ends_on.map(str::to_string),
            occurrences: occurrences.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse the dates and vet the tokens.
    ///
    /// Fails with [`OccurrenceError::InvalidDate`] on a malformed `startsOn`
    /// or `endsOn`; invalid tokens are dropped rather than reported.
    pub fn schedule(&self) -> Result<Schedule> {
        Schedule::try_from(self)
    }
}

impl AsRef<RecurringItem> for RecurringItem {
    fn as_ref(&self) -> &RecurringItem {
        self
    }
}

/// A [`RecurringItem`] with parsed dates and a canonical occurrence set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub occurrences: OccurrenceSet,
}

impl TryFrom<&RecurringItem> for Schedule {
    type Error = OccurrenceError;

    /// A blank `endsOn` counts as absent.
    fn try_from(item: &RecurringItem) -> Result<Self> {
        let starts_on = parse_date(&item.starts_on)?;
        let ends_on = match item.ends_on.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };
        Ok(Self {
            starts_on,
            ends_on,
            occurrences: OccurrenceSet::vet(&item.occurrences),
        })
    }
}

impl Schedule {
    /// Last day expansion may reach.
    ///
    /// An explicit `endsOn` always wins. Without one, a `NEVER` set or
    /// [`OpenEnd::AnchorOnly`] ends on `startsOn`; otherwise the range runs
    /// `horizon_days` past `startsOn`, capped at
    /// [`MAX_HORIZON_DAYS`](crate::options::MAX_HORIZON_DAYS).
    pub fn effective_end(&self, options: &ExpandOptions) -> NaiveDate {
        if let Some(end) = self.ends_on {
            return end;
        }
        if self.occurrences.is_never() || options.open_end == OpenEnd::AnchorOnly {
            return self.starts_on;
        }
        horizon_from(self.starts_on, options.effective_horizon_days())
    }
}

pub(crate) fn horizon_from(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn deserializes_host_entity_with_extra_fields() {
        let json = r#"{
            "id": 42,
            "title": "Water plants",
            "startsOn": "2026-02-01",
            "endsOn": null,
            "occurrences": ["WEEKLY_MONDAY"],
            "reminders": []
        }"#;
        let item: RecurringItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, RecurringItem::new("2026-02-01", None, &["WEEKLY_MONDAY"]));
    }

    #[test]
    fn missing_occurrences_default_to_empty() {
        let item: RecurringItem = serde_json::from_str(r#"{"startsOn":"2026-02-01"}"#).unwrap();
        assert!(item.occurrences.is_empty());
        assert!(item.schedule().unwrap().occurrences.is_never());
    }

    #[test]
    fn blank_end_is_absent() {
        let item = RecurringItem::new("2026-02-01", Some("  "), &["DAILY"]);
        assert_eq!(item.schedule().unwrap().ends_on, None);
    }

    #[test]
    fn malformed_dates_are_errors() {
        let item = RecurringItem::new("02/01/2026", None, &["DAILY"]);
        assert!(matches!(
            item.schedule(),
            Err(OccurrenceError::InvalidDate(_))
        ));
        let item = RecurringItem::new("2026-02-01", Some("soon"), &["DAILY"]);
        assert!(item.schedule().is_err());
    }

    #[test]
    fn effective_end_policies() {
        let open = RecurringItem::new("2026-02-01", None, &["DAILY"])
            .schedule()
            .unwrap();
        assert_eq!(
            open.effective_end(&ExpandOptions::default()),
            ymd(2027, 2, 1)
        );
        assert_eq!(
            open.effective_end(&ExpandOptions::anchor_only()),
            ymd(2026, 2, 1)
        );
        assert_eq!(
            open.effective_end(&ExpandOptions::default().with_horizon_days(6)),
            ymd(2026, 2, 7)
        );

        let once = RecurringItem::new("2026-02-01", None, &["NEVER"])
            .schedule()
            .unwrap();
        assert_eq!(once.effective_end(&ExpandOptions::default()), ymd(2026, 2, 1));
    }

    #[test]
    fn effective_end_caps_huge_horizon() {
        let open = RecurringItem::new("2026-01-01", None, &["WEEKLY_MONDAY"])
            .schedule()
            .unwrap();
        let options = ExpandOptions::default().with_horizon_days(u32::MAX);
        // 36525 days after 2026-01-01.
        assert_eq!(open.effective_end(&options), ymd(2126, 1, 2));
    }
}
