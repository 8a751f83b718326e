//! Refresh scheduling and the observable block store.
//!
//! [`BlockStore`] is a handle to a coordinator task that owns the current
//! [`StoreState`]. On attach it fetches once, then refreshes on the
//! configured [`RefreshInterval`] and re-evaluates staleness on its own
//! ticker. Observers read the state through a `watch` channel and receive
//! discrete [`StoreEvent`]s through the [`EventBus`].
//!
//! ```text
//!  refresh_now / set_refresh_interval
//!             |
//!             v
//!   +---------------------+   spawn    +------------------+
//!   |     coordinator     | ---------> | fetch_with_retry |
//!   | (owns StoreState)   | <--------- +------------------+
//!   +---------------------+  finished
//!     ^        ^      |
//!     |        |      +--> watch<StoreState>, EventBus
//!  refresh   staleness
//!   timer     ticker
//! ```

mod coordinator;
mod staleness;
mod state;
mod timers;

pub use staleness::{evaluate_staleness, StalenessPolicy};
pub use state::{StoreState, FETCH_ERROR_MESSAGE};

use std::sync::{Arc, Mutex};

use blockbar_chain_data::ChainDataSource;
use chrono::{DateTime, Utc};
use log::warn;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::errors::{Result, StoreError};
use crate::events::{EventBus, StoreEvent, DEFAULT_EVENT_CAPACITY};
use crate::settings::RefreshInterval;
use crate::snapshot::{CarryForwardPolicy, RetryPolicy, Snapshot, SnapshotAggregator};
use coordinator::{Command, Coordinator, RefreshTrigger};

/// Knobs for [`BlockStore::attach`].
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub refresh_interval: RefreshInterval,
    pub retry: RetryPolicy,
    pub staleness: StalenessPolicy,
    pub carry_forward: CarryForwardPolicy,
    pub event_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refresh_interval: RefreshInterval::default(),
            retry: RetryPolicy::default(),
            staleness: StalenessPolicy::default(),
            carry_forward: CarryForwardPolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Handle to the running store.
///
/// Dropping the handle cancels the coordinator and everything it spawned;
/// call [`BlockStore::shutdown`] to also wait for it to finish.
pub struct BlockStore {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<StoreState>,
    events: EventBus,
    shutdown: CancellationToken,
    coordinator: Mutex<Option<JoinHandle<()>>>,
}

impl BlockStore {
    /// Starts the coordinator and its first refresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(source: Arc<dyn ChainDataSource>, config: StoreConfig) -> Self {
        let aggregator = Arc::new(SnapshotAggregator::with_policy(
            source,
            config.carry_forward,
        ));
        let initial = StoreState::new(config.refresh_interval);
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let events = EventBus::new(config.event_capacity);
        let shutdown = CancellationToken::new();

        let coordinator = Coordinator::new(
            aggregator,
            config.retry,
            config.staleness,
            initial,
            state_tx,
            events.clone(),
            commands_tx.clone(),
            shutdown.clone(),
        );
        let handle = tokio::spawn(coordinator.run(commands_rx));

        Self {
            commands: commands_tx,
            state: state_rx,
            events,
            shutdown,
            coordinator: Mutex::new(Some(handle)),
        }
    }

    /// Latest published state.
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.borrow().snapshot.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error_message.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.state.borrow().is_fetching
    }

    pub fn is_stale(&self) -> bool {
        self.state.borrow().is_stale
    }

    pub fn last_successful_fetch(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_successful_fetch
    }

    pub fn refresh_interval(&self) -> RefreshInterval {
        self.state.borrow().refresh_interval
    }

    /// A receiver that sees every state the coordinator publishes.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Requests a refresh. Ignored by the coordinator while one is running.
    pub fn refresh_now(&self) -> Result<()> {
        self.send(Command::Refresh(RefreshTrigger::Manual))
    }

    /// Changes the interval and re-arms the refresh timer without fetching.
    pub fn set_refresh_interval(&self, interval: RefreshInterval) -> Result<()> {
        self.send(Command::SetInterval(interval))
    }

    fn send(&self, command: Command) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(StoreError::Closed);
        }
        self.commands.send(command).map_err(|_| StoreError::Closed)
    }

    /// Stops timers, the staleness ticker and any in-flight fetch, then
    /// waits for the coordinator to exit. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self
            .coordinator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Block store coordinator ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for BlockStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
