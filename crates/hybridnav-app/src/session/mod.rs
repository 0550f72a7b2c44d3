//! Per-stack visit session: the state machine owning the shared
//! rendering surface

mod callback;
#[allow(clippy::module_inception)]
mod session;
mod visit;

#[cfg(test)]
mod tests;

// Re-export all public types at the session:: level
pub use callback::VisitSessionCallback;
#[cfg(test)]
pub(crate) use callback::MockVisitSessionCallback;
pub use session::{SessionState, VisitSession, COLD_BOOT_REDIRECT_THROTTLE};
pub use visit::Visit;

// SessionId and next_session_id live here in mod.rs
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a session
pub type SessionId = u64;

static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique session ID
pub fn next_session_id() -> SessionId {
    SESSION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Sentinel status codes for failures that did not come from HTTP
pub mod error_codes {
    /// The runtime reported its bridge is not ready
    pub const BRIDGE_NOT_READY: i32 = 0;
    /// The rendering process was terminated by the platform
    pub const RENDER_PROCESS_GONE: i32 = -1;
    /// The bootstrap script failed to load
    pub const BRIDGE_FAILED_TO_LOAD: i32 = -2;
    /// The surface reported a resource load failure
    pub const LOAD_FAILED: i32 = -3;
    /// TLS handshake or certificate failure
    pub const SSL_ERROR: i32 = -4;
}
