//! Expansion options -- how far an item without an end date is expanded.

use serde::{Deserialize, Serialize};

use crate::error::{OccurrenceError, Result};

/// Days expanded past `startsOn` when an item has no `endsOn`.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Largest usable horizon: one hundred years of days. Larger values are
/// clamped by the engine and rejected by [`ExpandOptions::validate`].
pub const MAX_HORIZON_DAYS: u32 = 36_525;

/// Treatment of an absent `endsOn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEnd {
    /// Expand up to `startsOn + horizon_days`.
    #[default]
    Horizon,
    /// Treat the range as the single day `startsOn`.
    AnchorOnly,
}

/// How far expansion may run for items without an `endsOn`.
///
/// Loadable from JSON such as `{"open_end": "horizon", "horizon_days": 90}`;
/// missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    /// What an absent `endsOn` means.
    pub open_end: OpenEnd,
    /// Days past `startsOn` for [`OpenEnd::Horizon`], capped at [`MAX_HORIZON_DAYS`].
    pub horizon_days: u32,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            open_end: OpenEnd::Horizon,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl ExpandOptions {
    /// Default options with [`OpenEnd::AnchorOnly`].
    pub fn anchor_only() -> Self {
        Self {
            open_end: OpenEnd::AnchorOnly,
            ..Self::default()
        }
    }

    /// Same options with another `horizon_days`.
    pub fn with_horizon_days(self, horizon_days: u32) -> Self {
        Self {
            horizon_days,
            ..self
        }
    }

    /// The horizon actually used, at most [`MAX_HORIZON_DAYS`].
    pub fn effective_horizon_days(&self) -> u32 {
        self.horizon_days.min(MAX_HORIZON_DAYS)
    }

    /// Reject a `horizon_days` the engine would have to clamp.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(OccurrenceError::InvalidHorizon(self.horizon_days));
        }
        Ok(())
    }
}
