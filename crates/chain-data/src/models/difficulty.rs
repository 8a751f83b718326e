use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Target spacing between blocks, in minutes.
const TARGET_BLOCK_MINUTES: f64 = 10.0;

/// Retarget dates below this are unix seconds rather than milliseconds.
const MILLIS_CUTOFF: f64 = 100_000_000_000.0;

/// Progress toward the next difficulty retarget.
///
/// Every field is optional: the endpoint has grown and renamed fields over
/// time and a partial answer is still worth showing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
    /// Percent of the current epoch already mined
    pub progress_percent: Option<f64>,
    pub remaining_blocks: Option<u64>,
    /// Estimated retarget time in unix milliseconds, possibly fractional
    pub estimated_retarget_date: Option<f64>,
    /// Estimated percent change at the next retarget
    pub estimated_difficulty_delta: Option<f64>,
    /// Average block time this epoch, in milliseconds
    pub average_block_time: Option<f64>,
    pub next_retarget_height: Option<u64>,
    /// Estimated milliseconds until the retarget
    pub remaining_time: Option<f64>,
}

impl Difficulty {
    /// Whether the upstream answered with anything usable.
    pub fn is_empty(&self) -> bool {
        self.progress_percent.is_none()
            && self.remaining_blocks.is_none()
            && self.estimated_retarget_date.is_none()
            && self.estimated_difficulty_delta.is_none()
            && self.average_block_time.is_none()
    }

    /// Average block time as a duration.
    pub fn average_block_time(&self) -> Option<Duration> {
        self.average_block_time
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| Duration::from_millis(ms.round() as u64))
    }

    /// Days until the retarget assuming ten-minute blocks.
    pub fn days_until_retarget(&self) -> Option<f64> {
        self.remaining_blocks
            .map(|blocks| blocks as f64 * TARGET_BLOCK_MINUTES / 60.0 / 24.0)
    }

    /// Estimated retarget time.
    ///
    /// The endpoint reports milliseconds; older payloads used fractional
    /// seconds, which are scaled up first.
    pub fn estimated_retarget_at(&self) -> Option<DateTime<Utc>> {
        let date = self.estimated_retarget_date.filter(|d| d.is_finite() && *d >= 0.0)?;
        let ms = if date < MILLIS_CUTOFF { date * 1000.0 } else { date };
        Utc.timestamp_millis_opt(ms.trunc() as i64).single()
    }
}
