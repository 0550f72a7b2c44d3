//! # hybridnav-core - Core Domain Types
//!
//! Foundation crate for the hybrid navigation stack. Provides domain
//! types, error handling, bridge event definitions, and the path
//! configuration model.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, regex, url, tracing).
//!
//! ## Public API
//!
//! ### Locations (`location`)
//! - [`Location`] - An absolute URL with path-equality comparison under a
//!   query-string policy
//!
//! ### Visit Options (`options`)
//! - [`VisitAction`] - Advance / Replace / Restore
//! - [`VisitOptions`], [`VisitResponse`] - One navigation's intent, in the
//!   bridge's JSON schema
//!
//! ### Path Configuration (`path_config`)
//! - [`PathConfiguration`] - Ordered regex rules merged into per-location
//!   property bags
//! - [`PathProperties`] - Typed accessors with defaults ([`Presentation`],
//!   [`NavContext`], [`QueryStringPresentation`], uri, fallback_uri, ...)
//!
//! ### Events (`events`)
//! - [`BridgeMessage`] - Parsed lifecycle callbacks from the embedded web
//!   runtime
//! - [`SessionEvent`] - Wrapper enum adding transport-level failures
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with recoverable/configuration
//!   classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use hybridnav_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod location;
pub mod logging;
pub mod options;
pub mod path_config;
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{
    BridgeMessage, BridgeReady, PageLoaded, SessionEvent, VisitCompletedEvent, VisitProposed,
    VisitRendered, VisitRequestCompleted, VisitRequestFailed, VisitStartedEvent,
};
pub use location::Location;
pub use options::{VisitAction, VisitOptions, VisitResponse};
pub use path_config::{
    NavContext, PathConfiguration, PathConfigurationSource, PathProperties, PathRule,
    Presentation, QueryStringPresentation,
};
