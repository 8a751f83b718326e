//! Store events.
//!
//! The coordinator publishes a [`StoreEvent`] on every observable state
//! transition. Front-ends that prefer push over polling the state channel
//! subscribe through [`EventBus::subscribe`].

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::settings::RefreshInterval;
use crate::snapshot::Snapshot;

/// Canonical event names, stable across front-ends.
pub const REFRESH_START: &str = "chain:refresh-start";
pub const SNAPSHOT_PUBLISHED: &str = "chain:snapshot";
pub const REFRESH_ERROR: &str = "chain:refresh-error";
pub const STALENESS_CHANGED: &str = "chain:staleness";
pub const INTERVAL_CHANGED: &str = "settings:refresh-interval";

/// Default capacity of the broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// A refresh cycle was accepted and is now fetching.
    RefreshStarted,

    /// A refresh cycle produced a usable snapshot.
    SnapshotPublished(Arc<Snapshot>),

    /// Every attempt of a refresh cycle failed; the previous snapshot stays.
    RefreshFailed { message: String },

    StalenessChanged { is_stale: bool },

    IntervalChanged(RefreshInterval),
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshStarted => REFRESH_START,
            Self::SnapshotPublished(_) => SNAPSHOT_PUBLISHED,
            Self::RefreshFailed { .. } => REFRESH_ERROR,
            Self::StalenessChanged { .. } => STALENESS_CHANGED,
            Self::IntervalChanged(_) => INTERVAL_CHANGED,
        }
    }
}

/// Broadcast bus that fans store events out to any number of listeners.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        log::debug!("Store event: {}", event.name());
        // No listeners, or lagging ones, never block the coordinator.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
