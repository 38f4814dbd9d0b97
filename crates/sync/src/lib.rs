//! Haven Sync - the real-time state synchronization core.
//!
//! One persistent event-stream connection, a typed dispatch contract, a thin
//! REST fetcher, and per-entity reconcilers that keep every mounted view
//! consistent with the server-pushed event stream while tolerating
//! disconnects, out-of-order initial loads, and partial updates.
//!
//! The server is the source of truth. The client never pushes merged state
//! back; it only sends commands over REST and expects the server to reflect
//! them as subsequent events. Gaps across reconnects are not replayed;
//! periodic REST polling heals staleness instead.

pub mod api;
pub mod config;
pub mod service;
pub mod state;
pub mod transport;

pub use api::{ApiClient, ApiError, ApiPort};
pub use config::{ConfigError, SyncConfig};
pub use service::SyncService;
pub use state::Stores;
pub use transport::{EventStreamClient, HandlerMap};
