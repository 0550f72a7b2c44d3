//! # hybridnav-bridge - Embedded Web-Runtime Bridge
//!
//! Carries commands into, and parsed lifecycle messages out of, the
//! single shared rendering surface. How envelopes physically cross into
//! the web runtime is the host platform's glue; this crate owns the
//! protocol and the surface handle.
//!
//! Depends on [`hybridnav_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Protocol
//! - [`SurfaceCommand`] - Named operations with JSON-encoded arguments
//! - [`CommandSender`] - Channel-backed fire-and-forget sender
//! - [`parse_surface_message()`] - Parse one inbound envelope
//!
//! ### Surface
//! - [`WebSurface`] - The shared rendering-surface handle with
//!   idempotent attach/detach
//!
//! ### Offline
//! - [`HttpRepository`], [`OfflineRequestHandler`] - external cache
//!   collaborator seams
//! - [`fetch_cached_snapshot()`] - fire-and-continue background lookup

pub mod offline;
pub mod protocol;
pub mod surface;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use offline::{
    fetch_cached_snapshot, precache, CachedSnapshot, HttpRepository, OfflineRequestHandler,
    SnapshotFetched,
};
pub use protocol::{parse_surface_message, CommandSender, SurfaceCommand};
pub use surface::{ScreenKey, WebSurface};
