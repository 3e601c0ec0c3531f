//! Time period vocabulary and the resolved time range value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, semantically labeled time window a profile can pick from.
///
/// Only `Last1h`, `Last8h`, `Last24h` and `Custom` carry their own window
/// arithmetic; the remaining members are accepted in configuration and
/// resolve through the one-hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedTimePeriod {
    #[serde(alias = "LAST_1H")]
    Last1h,
    #[serde(alias = "LAST_8H")]
    Last8h,
    #[serde(alias = "LAST_24H")]
    Last24h,
    #[serde(alias = "LAST_3D")]
    Last3d,
    #[serde(alias = "LAST_7D")]
    Last7d,
    #[serde(alias = "YESTERDAY")]
    Yesterday,
    #[serde(alias = "BEFORE_YESTERDAY")]
    BeforeYesterday,
    #[serde(alias = "SAME_DAY_PREV_WEEK")]
    SameDayPrevWeek,
    #[serde(alias = "LAST_WEEK")]
    LastWeek,
    #[serde(alias = "CUSTOM")]
    Custom,
}

impl NamedTimePeriod {
    /// Every member, in declaration order.
    pub const ALL: [NamedTimePeriod; 10] = [
        NamedTimePeriod::Last1h,
        NamedTimePeriod::Last8h,
        NamedTimePeriod::Last24h,
        NamedTimePeriod::Last3d,
        NamedTimePeriod::Last7d,
        NamedTimePeriod::Yesterday,
        NamedTimePeriod::BeforeYesterday,
        NamedTimePeriod::SameDayPrevWeek,
        NamedTimePeriod::LastWeek,
        NamedTimePeriod::Custom,
    ];

    /// Configuration name of the period.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedTimePeriod::Last1h => "Last1h",
            NamedTimePeriod::Last8h => "Last8h",
            NamedTimePeriod::Last24h => "Last24h",
            NamedTimePeriod::Last3d => "Last3d",
            NamedTimePeriod::Last7d => "Last7d",
            NamedTimePeriod::Yesterday => "Yesterday",
            NamedTimePeriod::BeforeYesterday => "BeforeYesterday",
            NamedTimePeriod::SameDayPrevWeek => "SameDayPrevWeek",
            NamedTimePeriod::LastWeek => "LastWeek",
            NamedTimePeriod::Custom => "Custom",
        }
    }
}

impl fmt::Display for NamedTimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a time range would have its left border after its right border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Left border {left} cannot be greater than right border {right}")]
pub struct InvalidTimeRange {
    pub left: i64,
    pub right: i64,
}

/// Closed window of Unix-epoch seconds, `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    left: i64,
    right: i64,
}

impl TimeRange {
    /// Create a range, rejecting `left > right`.
    pub fn new(left: i64, right: i64) -> Result<Self, InvalidTimeRange> {
        if left > right {
            return Err(InvalidTimeRange { left, right });
        }
        Ok(Self { left, right })
    }

    /// Range ending at `now` and starting `seconds` earlier.
    pub fn last(now: i64, seconds: u64) -> Self {
        Self {
            left: now.saturating_sub_unsigned(seconds),
            right: now,
        }
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn right(&self) -> i64 {
        self.right
    }

    /// Width of the window in seconds.
    pub fn width(&self) -> u64 {
        self.right.abs_diff(self.left)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}
