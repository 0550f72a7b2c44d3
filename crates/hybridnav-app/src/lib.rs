//! hybridnav-app - Navigation orchestration for HybridNav
//!
//! This crate implements the navigation rule resolver (the pure
//! decision function at the heart of the system), the navigator that
//! executes resolved rules against a backstack, and the visit session
//! state machine that reconciles the shared rendering surface's
//! asynchronous lifecycle with native navigation.

pub mod backstack;
pub mod channels;
pub mod destination;
pub mod navigator;
pub mod rule;
pub mod session;
pub mod session_manager;

// Re-export primary types
pub use backstack::{BackStack, BackStackEntry, NavBackStack, NavOptions};
pub use channels::OneShot;
pub use destination::{Destination, DestinationId, DestinationKind, DestinationRegistry};
pub use navigator::{NavOutcome, Navigator, NavigatorDelegate};
pub use rule::{ModalResult, NavRule, NavigationMode};
pub use session::{SessionId, SessionState, Visit, VisitSession, VisitSessionCallback};
pub use session_manager::{SessionManager, MAX_SESSIONS};

// Re-export bridge types for hosts
pub use hybridnav_bridge::{ScreenKey, SurfaceCommand, WebSurface};
