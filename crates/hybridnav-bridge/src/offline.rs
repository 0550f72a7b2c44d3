//! Offline/cache collaborator interfaces
//!
//! The HTTP cache itself is external; this module defines the seams the
//! session consumes on its failure/offline path and the background
//! fetch helper that keeps cache reads off the session's owning context.

use std::sync::Arc;

use tokio::sync::mpsc;

use hybridnav_core::prelude::*;
use hybridnav_core::Location;

/// A cached response usable in place of a live request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSnapshot {
    pub html: String,
    pub status_code: i32,
}

/// Storage of previously fetched responses.
///
/// Implementations are external collaborators (disk cache, HTTP cache
/// wrapper); lookups may block and are therefore always dispatched to a
/// worker context by [`fetch_cached_snapshot`].
pub trait HttpRepository: Send + Sync {
    /// Look up a cached response for a location
    fn cached_snapshot(&self, location: &Location) -> Option<CachedSnapshot>;

    /// Fetch and store a location ahead of need
    fn precache(&self, location: &Location) -> Result<()>;
}

/// Answers intercepted requests from the rendering surface while
/// offline, backed by an [`HttpRepository`]
pub trait OfflineRequestHandler: Send + Sync {
    /// Whether a request for this location should be served from cache
    fn should_intercept(&self, location: &Location) -> bool;

    /// Serve the cached response, if one exists
    fn intercept(&self, location: &Location) -> Option<CachedSnapshot>;
}

/// Result of a background snapshot fetch, marshaled back to the
/// session's owning context
#[derive(Debug, Clone)]
pub struct SnapshotFetched {
    pub location: Location,
    pub snapshot: Option<CachedSnapshot>,
}

/// Fetch a cached snapshot on a worker context.
///
/// Fire-and-continue: the caller does not block. The result is sent
/// back over `reply_tx`; if the requesting screen tore down and dropped
/// the receiving end, the result is discarded and no state is touched.
pub fn fetch_cached_snapshot(
    repository: Arc<dyn HttpRepository>,
    location: Location,
    reply_tx: mpsc::UnboundedSender<SnapshotFetched>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let snapshot = repository.cached_snapshot(&location);
        if snapshot.is_none() {
            debug!(%location, "no cached snapshot available");
        }
        // Send failure means the requester is gone; nothing to do.
        let _ = reply_tx.send(SnapshotFetched { location, snapshot });
    })
}

/// Precache a location on a worker context
pub fn precache(
    repository: Arc<dyn HttpRepository>,
    location: Location,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        if let Err(err) = repository.precache(&location) {
            warn!(%location, %err, "precache failed");
        }
    })
}
