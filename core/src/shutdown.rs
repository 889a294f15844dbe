//! Graceful shutdown signalling.
//!
//! Components that can tear down immediately implement [`SyncShutdown`];
//! components with outstanding I/O (the session's websocket, the order
//! chain's in-flight cancels) implement [`AsyncShutdown`]. [`Shutdown`] is
//! the marker value `stop()` threads through the engine.

use serde::{Deserialize, Serialize};
use std::future::Future;

/// A component that can shut down synchronously, without awaiting anything.
pub trait SyncShutdown {
    type Result;
    fn shutdown(&mut self) -> Self::Result;
}

/// A component that must await outstanding work before it is fully stopped.
pub trait AsyncShutdown {
    type Result;
    fn shutdown(&mut self) -> impl Future<Output = Self::Result> + Send;
}

/// Marker signalling that a graceful shutdown has been requested.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
pub struct Shutdown;
