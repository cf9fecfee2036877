//! Telegram subscription plans.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const PLAN_MONTH: &str = "month";
pub const PLAN_YEAR: &str = "year";

/// A paid subscription plan and its validity period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Month,
    Year,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Month => PLAN_MONTH,
            Plan::Year => PLAN_YEAR,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Plan::Month => Duration::days(30),
            Plan::Year => Duration::days(365),
        }
    }

    /// Expiry of a subscription on this plan starting at `from`.
    pub fn expires_at(&self, from: Timestamp) -> Timestamp {
        from + self.duration()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PLAN_MONTH => Ok(Plan::Month),
            PLAN_YEAR => Ok(Plan::Year),
            other => Err(CoreError::Validation(format!(
                "Invalid plan '{other}'. Must be one of: [\"{PLAN_MONTH}\", \"{PLAN_YEAR}\"]"
            ))),
        }
    }
}
