//! BlockBar Core
//!
//! Turns the per-category answers of a [`ChainDataSource`] into one
//! observable, periodically refreshed view of the Bitcoin network.
//!
//! - [`snapshot`] - the [`Snapshot`] model, the parallel aggregator and the
//!   retry controller
//! - [`refresh`] - the [`BlockStore`] handle, its coordinator and the
//!   staleness evaluator
//! - [`settings`] - user-selectable [`RefreshInterval`]
//! - [`events`] - notifications published on state transitions
//!
//! [`ChainDataSource`]: blockbar_chain_data::ChainDataSource

pub mod errors;
pub mod events;
pub mod refresh;
pub mod settings;
pub mod snapshot;

pub use errors::{Result, StoreError};
pub use events::{EventBus, StoreEvent};
pub use refresh::{
    evaluate_staleness, BlockStore, StalenessPolicy, StoreConfig, StoreState,
    FETCH_ERROR_MESSAGE,
};
pub use settings::RefreshInterval;
pub use snapshot::{
    fetch_with_retry, CarryForwardPolicy, RetryPolicy, Snapshot, SnapshotAggregator,
};
