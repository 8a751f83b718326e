use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::settings::RefreshInterval;
use crate::snapshot::Snapshot;

/// Message shown when a whole refresh cycle failed.
pub const FETCH_ERROR_MESSAGE: &str = "Unable to load Bitcoin data.";

/// Everything a front-end renders, as last published by the coordinator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    /// Last usable snapshot; survives failed cycles
    pub snapshot: Option<Arc<Snapshot>>,
    pub error_message: Option<String>,
    pub is_fetching: bool,
    pub last_successful_fetch: Option<DateTime<Utc>>,
    /// Not evaluated until the first refresh cycle settles or the first
    /// staleness tick; reads `false` while the startup fetch is in flight.
    pub is_stale: bool,
    pub refresh_interval: RefreshInterval,
}

impl StoreState {
    pub(crate) fn new(refresh_interval: RefreshInterval) -> Self {
        Self {
            refresh_interval,
            ..Default::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }
}
