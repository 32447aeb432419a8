//! Rule normalization -- add, remove and vet tokens under precedence rules.
//!
//! Recurrence tokens are not freely combinable. A set holding both
//! `WEEKLY_MONDAY` and `MONTHLY_DAY_15` is resolved in favor of the more
//! specific rule family by the ordered [`PRECEDENCE`] pipeline. Literal dates
//! survive every exclusive rule as additive one-off occurrences.

use std::fmt;
use std::slice;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{OccurrenceError, Result};
use crate::token::{Family, Occurrence};

/// Edit applied to an occurrence set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    Add,
    Remove,
    #[default]
    Vet,
}

impl FromStr for Action {
    type Err = OccurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "remove" => Ok(Action::Remove),
            "vet" => Ok(Action::Vet),
            _ => Err(OccurrenceError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Vet => "vet",
        })
    }
}

/// What a precedence rule does once its trigger family is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep only the trigger family plus literal dates.
    Exclusive,
    /// Replace the whole set (dates included) with a single occurrence.
    Collapse(Occurrence),
}

/// One step of the [`PRECEDENCE`] pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceRule {
    /// Family whose presence fires the rule.
    pub trigger: Family,
    pub outcome: Outcome,
}

impl PrecedenceRule {
    /// Rewrite `occurrences` in place according to the outcome.
    pub fn apply(&self, occurrences: &mut Vec<Occurrence>) {
        match self.outcome {
            Outcome::Exclusive => {
                occurrences.retain(|o| o.is_date() || o.family() == self.trigger);
            }
            Outcome::Collapse(single) => {
                occurrences.clear();
                occurrences.push(single);
            }
        }
    }
}

/// Ordered precedence pipeline. The first rule whose trigger family is
/// present in a set is the only one applied.
pub static PRECEDENCE: [PrecedenceRule; 4] = [
    PrecedenceRule {
        trigger: Family::MonthlyDay,
        outcome: Outcome::Exclusive,
    },
    PrecedenceRule {
        trigger: Family::MonthlyPositional,
        outcome: Outcome::Exclusive,
    },
    PrecedenceRule {
        trigger: Family::Weekly,
        outcome: Outcome::Exclusive,
    },
    PrecedenceRule {
        trigger: Family::Daily,
        outcome: Outcome::Collapse(Occurrence::Daily),
    },
];

/// A canonical occurrence set: precedence-resolved, deduplicated, sorted by
/// token text and never empty.
///
/// Only the normalizer builds these, so every value is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct OccurrenceSet(Vec<Occurrence>);

impl OccurrenceSet {
    /// The set `[NEVER]`.
    pub fn never() -> Self {
        Self(vec![Occurrence::Never])
    }

    /// Canonicalize raw tokens. Invalid tokens are dropped.
    pub fn vet<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(vet(parse_valid(tokens)))
    }

    /// A new set with `token` added, then vetted.
    pub fn add(&self, token: &str) -> Self {
        Self(add(self.0.clone(), token))
    }

    /// A new set without `token`; removing the last token leaves `NEVER`.
    pub fn remove(&self, token: &str) -> Self {
        Self(remove(self.0.clone(), token))
    }

    /// Dispatch on `action`. A missing token means vet only.
    pub fn apply(&self, action: Action, token: Option<&str>) -> Self {
        Self(apply(self.0.clone(), action, token))
    }

    /// True only for the set `[NEVER]`.
    pub fn is_never(&self) -> bool {
        self.0 == [Occurrence::Never]
    }

    /// Whether any token belongs to `family`.
    pub fn contains_family(&self, family: Family) -> bool {
        self.0.iter().any(|o| o.family() == family)
    }

    /// Tokens in canonical order.
    pub fn iter(&self) -> slice::Iter<'_, Occurrence> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Occurrence] {
        &self.0
    }

    /// Canonical token strings.
    pub fn to_tokens(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Default for OccurrenceSet {
    fn default() -> Self {
        Self::never()
    }
}

impl From<Vec<String>> for OccurrenceSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::vet(tokens)
    }
}

impl From<OccurrenceSet> for Vec<String> {
    fn from(set: OccurrenceSet) -> Self {
        set.to_tokens()
    }
}

impl<'a> IntoIterator for &'a OccurrenceSet {
    type Item = &'a Occurrence;
    type IntoIter = slice::Iter<'a, Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Apply `action` to a raw token set and return the canonical token strings.
///
/// `add` and `remove` without a token behave like `vet`.
///
/// ```
/// use occurrence_engine::{transmogrify_occurrences, Action};
///
/// let set = transmogrify_occurrences(&["DAILY"], Action::Remove, Some("DAILY"));
/// assert_eq!(set, vec!["NEVER"]);
///
/// let set = transmogrify_occurrences(
///     &["MONTHLY_DAY_5", "WEEKLY_MONDAY", "2024-01-01"],
///     Action::Vet,
///     None,
/// );
/// assert_eq!(set, vec!["2024-01-01", "MONTHLY_DAY_5"]);
/// ```
pub fn transmogrify_occurrences<S: AsRef<str>>(
    set: &[S],
    action: Action,
    token: Option<&str>,
) -> Vec<String> {
    OccurrenceSet(apply(parse_valid(set), action, token)).to_tokens()
}

fn apply(occurrences: Vec<Occurrence>, action: Action, token: Option<&str>) -> Vec<Occurrence> {
    match (action, token) {
        (Action::Add, Some(token)) => add(occurrences, token),
        (Action::Remove, Some(token)) => remove(occurrences, token),
        _ => vet(occurrences),
    }
}

fn parse_valid<I, S>(tokens: I) -> Vec<Occurrence>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            let token = token.as_ref();
            match token.parse::<Occurrence>() {
                Ok(occurrence) => Some(occurrence),
                Err(_) => {
                    trace!(token, "dropping invalid occurrence token");
                    None
                }
            }
        })
        .collect()
}

fn vet(mut occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    occurrences.retain(|o| *o != Occurrence::Never);

    let rule = PRECEDENCE
        .iter()
        .find(|rule| occurrences.iter().any(|o| o.family() == rule.trigger));
    if let Some(rule) = rule {
        trace!(trigger = ?rule.trigger, "applying precedence rule");
        rule.apply(&mut occurrences);
    }

    if occurrences.is_empty() {
        return vec![Occurrence::Never];
    }
    occurrences.sort_by_cached_key(ToString::to_string);
    occurrences.dedup();
    occurrences
}

fn add(mut occurrences: Vec<Occurrence>, token: &str) -> Vec<Occurrence> {
    let added = match token.parse::<Occurrence>() {
        Ok(single @ (Occurrence::Never | Occurrence::Daily)) => return vec![single],
        Ok(added) => added,
        Err(_) => {
            trace!(token, "ignoring invalid token on add");
            return vet(occurrences);
        }
    };

    // Enforce the new token's tier eagerly so it wins over older rules.
    let tier = PRECEDENCE
        .iter()
        .find(|rule| rule.trigger == added.family() && rule.outcome == Outcome::Exclusive);
    if let Some(rule) = tier {
        rule.apply(&mut occurrences);
    }
    occurrences.push(added);
    vet(occurrences)
}

fn remove(mut occurrences: Vec<Occurrence>, token: &str) -> Vec<Occurrence> {
    let token = token.trim();
    occurrences.retain(|o| o.to_string() != token);
    vet(occurrences)
}
