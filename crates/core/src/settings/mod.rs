//! User-facing refresh settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// How often the store refreshes on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshInterval {
    /// No timer; refresh only on demand
    Manual,
    FiveMinutes,
    #[default]
    TenMinutes,
    FifteenMinutes,
}

impl RefreshInterval {
    pub const ALL: [RefreshInterval; 4] = [
        Self::Manual,
        Self::FiveMinutes,
        Self::TenMinutes,
        Self::FifteenMinutes,
    ];

    pub fn minutes(&self) -> u64 {
        match self {
            Self::Manual => 0,
            Self::FiveMinutes => 5,
            Self::TenMinutes => 10,
            Self::FifteenMinutes => 15,
        }
    }

    pub fn seconds(&self) -> u64 {
        self.minutes() * 60
    }

    /// Timer period, or `None` for manual-only refresh.
    pub fn period(&self) -> Option<Duration> {
        match self.seconds() {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::FiveMinutes => "Every 5 minutes",
            Self::TenMinutes => "Every 10 minutes",
            Self::FifteenMinutes => "Every 15 minutes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::FiveMinutes => "fiveMinutes",
            Self::TenMinutes => "tenMinutes",
            Self::FifteenMinutes => "fifteenMinutes",
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RefreshInterval {
    type Err = StoreError;

    /// Accepts minute counts (`0`, `5`, `10`, `15`), `manual`, and the
    /// camelCase names used in serialized settings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|interval| {
                value.eq_ignore_ascii_case(interval.as_str())
                    || value == interval.minutes().to_string()
            })
            .ok_or_else(|| StoreError::InvalidInterval(value.to_string()))
    }
}
