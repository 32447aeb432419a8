//! # occurrence-engine
//!
//! Deterministic recurrence rules for recurring to-do items.
//!
//! A to-do carries a `startsOn` anchor, an optional `endsOn`, and a set of
//! compact occurrence tokens (`WEEKLY_MONDAY`, `MONTHLY_LAST_FRIDAY`,
//! `MONTHLY_DAY_15`, `2026-03-01`, ...). The engine validates those tokens,
//! normalizes sets of them under precedence rules, expands them into concrete
//! calendar days and renders them as English labels. Every function is pure.
//!
//! ## Modules
//!
//! - [`token`] — token grammar and the [`Occurrence`] sum type
//! - [`normalizer`] — add/remove/vet under the [`PRECEDENCE`] pipeline
//! - [`calendar`] — nth/last weekday and month-stepping arithmetic
//! - [`expander`] — range-bounded and weekday-matching expansion
//! - [`query`] — date membership and next-occurrence search
//! - [`label`] — human-readable labels
//! - [`item`] — the host entity and its parsed [`Schedule`]
//! - [`options`] — open-end horizon configuration
//! - [`error`] — Error types

pub mod calendar;
pub mod error;
pub mod expander;
pub mod item;
pub mod label;
pub mod normalizer;
pub mod options;
pub mod query;
pub mod token;

pub use error::OccurrenceError;
pub use expander::{
    expand, expand_item, todo_dates, todo_dates_with, todo_days, todo_days_with, ExpansionMode,
};
pub use item::{RecurringItem, Schedule};
pub use label::{describe, repeats_labels};
pub use normalizer::{transmogrify_occurrences, Action, OccurrenceSet, PRECEDENCE};
pub use options::{ExpandOptions, OpenEnd, DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};
pub use query::{next_occurrence, next_occurrence_with, occurs_on, todos_by_date, todos_by_date_with};
pub use token::{is_valid_occurrence, parse_date, Family, Occurrence, Position};
