//! Dashboard time-range selector.

use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;

use pulse_core::Error;

/// Recognized dashboard time ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    Today,
    SevenDays,
    ThirtyDays,
}

impl TimeRange {
    /// The query-parameter spelling of this range.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::SevenDays => "7days",
            Self::ThirtyDays => "30days",
        }
    }

    /// Translates the range into the `since` bound for a read.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Self::Today => 1,
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
        };
        now - Duration::days(days)
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "7days" => Ok(Self::SevenDays),
            "30days" => Ok(Self::ThirtyDays),
            other => Err(Error::InvalidTimeRange(other.to_string())),
        }
    }
}
