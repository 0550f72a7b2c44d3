//! HybridNav - native navigation around server-rendered web screens
//!
//! A single shared web rendering surface stays alive across screen
//! transitions while native navigation components drive backstack
//! semantics. Three crates make up the system:
//!
//! - `hybridnav-core`: locations, visit options, path configuration,
//!   bridge events, errors, and logging
//! - `hybridnav-bridge`: the command protocol to the rendering surface
//!   and the shared surface handle
//! - `hybridnav-app`: the navigation rule resolver, the navigator, and
//!   the visit session state machine
//!
//! This facade re-exports the public surface of all three.
//!
//! ```no_run
//! use hybridnav::{
//!     DestinationKind, DestinationRegistry, NavBackStack, Navigator, PathConfiguration,
//! };
//!
//! # fn main() -> hybridnav::Result<()> {
//! let config = PathConfiguration::from_json(
//!     r#"{ "rules": [
//!         { "patterns": ["^/.*$"], "properties": { "uri": "app://fragment/web" } }
//!     ] }"#,
//! )?;
//!
//! let mut destinations = DestinationRegistry::new();
//! destinations.register("app://fragment/web", DestinationKind::Standard);
//!
//! let mut navigator = Navigator::new(config, destinations, NavBackStack::new());
//! let home = "https://example.com/home".parse()?;
//! navigator.navigate(&home, Default::default(), None)?;
//! # Ok(())
//! # }
//! ```

pub use hybridnav_core::{
    logging, BridgeMessage, Error, Location, NavContext, PathConfiguration, PathProperties,
    PathRule, Presentation, QueryStringPresentation, Result, SessionEvent, VisitAction,
    VisitOptions, VisitResponse,
};

pub use hybridnav_bridge::{
    fetch_cached_snapshot, precache, CachedSnapshot, CommandSender, HttpRepository,
    OfflineRequestHandler, ScreenKey, SnapshotFetched, SurfaceCommand, WebSurface,
};

pub use hybridnav_app::{
    BackStack, BackStackEntry, Destination, DestinationId, DestinationKind, DestinationRegistry,
    ModalResult, NavBackStack, NavOptions, NavOutcome, NavRule, NavigationMode, Navigator,
    NavigatorDelegate, OneShot, SessionId, SessionManager, SessionState, Visit, VisitSession,
    VisitSessionCallback, MAX_SESSIONS,
};
