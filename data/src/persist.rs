//! Durable persistence hook for periodic book snapshots (§4.1).
//!
//! The engine serializes every tracked ladder to a durable sink on a fixed
//! cadence (30 s). What "durable" means is out of scope; this crate only
//! defines the hook signature and a no-op default.

use async_trait::async_trait;

use crate::books::BookSnapshotSet;
use crate::error::DataError;

/// Interval, in seconds, on which the engine persists book snapshots.
pub const PERSIST_INTERVAL_SECS: u64 = 30;

#[async_trait]
pub trait PersistSink: Send + Sync {
    async fn persist_books(&self, snapshot: &BookSnapshotSet) -> Result<(), DataError>;
}

/// Default sink that discards every snapshot. Used when no durable
/// persistence backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersistSink;

#[async_trait]
impl PersistSink for NullPersistSink {
    async fn persist_books(&self, _snapshot: &BookSnapshotSet) -> Result<(), DataError> {
        Ok(())
    }
}
