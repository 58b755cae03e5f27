//! Reporting periods and the time windows they select.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard reporting period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
}

/// Half-open time range `[start, end)`. `end = None` leaves the range open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl Window {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && self.end.is_none_or(|end| at < end)
    }
}

impl Period {
    /// Parse a query token, falling back to [`Period::Month`] for anything unrecognised.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("week") => Self::Week,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Step one period back from `at`. Month arithmetic clamps to the end of shorter months.
    pub fn rewind(self, at: DateTime<Utc>) -> DateTime<Utc> {
        let stepped = match self {
            Self::Week => at.checked_sub_signed(Duration::days(7)),
            Self::Month => at.checked_sub_months(Months::new(1)),
            Self::Year => at.checked_sub_months(Months::new(12)),
        };
        stepped.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The current window (open-ended, starting one period before `now`).
    pub fn current(self, now: DateTime<Utc>) -> Window {
        Window {
            start: self.rewind(now),
            end: None,
        }
    }

    /// The equal-length window immediately preceding [`Period::current`].
    pub fn previous(self, now: DateTime<Utc>) -> Window {
        let boundary = self.rewind(now);
        Window {
            start: self.rewind(boundary),
            end: Some(boundary),
        }
    }
}
