//! Navigation rule resolution
//!
//! [`NavRule::resolve`] is a pure function of the current navigation
//! state, the requested location, and the path configuration. It
//! computes the presentation, the navigation mode, the modal result
//! payload, and the destination targets the navigator will execute
//! against. No side effects; the same inputs always produce the same
//! rule.
//!
//! ## Public API
//!
//! - [`NavRule`] — the resolved decision, constructed per request
//! - [`NavigationMode`] — how the transition crosses (or stays in) context
//! - [`ModalResult`] — payload published beneath a dismissed modal

use serde_json::Value;

use hybridnav_core::prelude::*;
use hybridnav_core::{
    Location, NavContext, PathConfiguration, PathProperties, Presentation, VisitAction,
    VisitOptions,
};

use crate::backstack::NavOptions;
use crate::destination::{Destination, DestinationRegistry};

/// How the resolved transition relates to the modal context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Stay within the current context (push/pop/replace/etc.)
    InContext,
    /// Enter the modal context
    ToModal,
    /// Leave the modal context, publishing a result beneath it
    DismissModal,
    /// Reload the current location in place
    Refresh,
    /// Suppress the transition entirely
    None,
}

/// Result delivered to the screen beneath a dismissed modal
#[derive(Debug, Clone)]
pub struct ModalResult {
    pub location: Location,
    pub options: VisitOptions,
    pub extra_data: Option<Value>,
    /// False exactly when the resolved presentation is [`Presentation::None`]:
    /// the screen beneath resumes as-is instead of navigating
    pub should_navigate: bool,
}

/// A resolved navigation decision
///
/// Constructed once per navigation request and discarded after the
/// navigator executes it.
#[derive(Debug, Clone)]
pub struct NavRule {
    pub previous_location: Option<Location>,
    pub current_location: Location,
    pub new_location: Location,
    pub current_context: NavContext,
    pub new_context: NavContext,
    pub new_presentation: Presentation,
    pub new_navigation_mode: NavigationMode,
    pub new_modal_result: Option<ModalResult>,
    pub new_destination: Option<Destination>,
    pub new_fallback_destination: Option<Destination>,
    pub new_nav_options: NavOptions,
    pub new_visit_options: VisitOptions,
    pub new_properties: PathProperties,
}

impl NavRule {
    /// Resolve a navigation request against the configuration and the
    /// registered destinations.
    ///
    /// `at_start` reports whether the current entry is the stack's
    /// start destination. Returns a configuration error when the new
    /// location's context is modal but its presentation resolves to
    /// replace-root; the root lives in the non-modal stack, so that
    /// combination is an authoring mistake.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        previous_location: Option<&Location>,
        current_location: &Location,
        new_location: &Location,
        new_visit_options: VisitOptions,
        at_start: bool,
        config: &PathConfiguration,
        destinations: &DestinationRegistry,
        extra_data: Option<Value>,
    ) -> Result<NavRule> {
        let current_properties = config.properties(current_location);
        let new_properties = config.properties(new_location);

        let current_context = current_properties.context();
        let new_context = new_properties.context();

        let new_presentation = Self::presentation(
            previous_location,
            current_location,
            new_location,
            &new_visit_options,
            &new_properties,
            at_start,
        );

        if new_context == NavContext::Modal && new_presentation == Presentation::ReplaceRoot {
            return Err(Error::modal_replace_root(new_location.as_str()));
        }

        let new_navigation_mode =
            Self::navigation_mode(current_context, new_context, new_presentation);

        let new_modal_result = if new_navigation_mode == NavigationMode::DismissModal {
            Some(ModalResult {
                location: new_location.clone(),
                options: new_visit_options.clone(),
                extra_data,
                should_navigate: new_presentation != Presentation::None,
            })
        } else {
            None
        };

        let (new_destination, new_fallback_destination) = destinations.resolve(&new_properties);

        let new_nav_options = match (new_presentation, &new_destination) {
            (Presentation::ReplaceRoot, Some(destination)) => {
                NavOptions::pop_up_to_inclusive(destination.id)
            }
            _ => NavOptions::standard(),
        };

        Ok(NavRule {
            previous_location: previous_location.cloned(),
            current_location: current_location.clone(),
            new_location: new_location.clone(),
            current_context,
            new_context,
            new_presentation,
            new_navigation_mode,
            new_modal_result,
            new_destination,
            new_fallback_destination,
            new_nav_options,
            new_visit_options,
            new_properties,
        })
    }

    /// The destination the navigator should transition to: the exact
    /// match when registered, else the configured fallback
    pub fn resolved_destination(&self) -> Option<&Destination> {
        self.new_destination
            .as_ref()
            .or(self.new_fallback_destination.as_ref())
    }

    fn presentation(
        previous_location: Option<&Location>,
        current_location: &Location,
        new_location: &Location,
        options: &VisitOptions,
        new_properties: &PathProperties,
        at_start: bool,
    ) -> Presentation {
        let configured = new_properties.presentation();
        if configured != Presentation::Default {
            return configured;
        }

        let query_policy = new_properties.query_string_presentation();
        let matches_current = new_location.matches(current_location, query_policy);
        let matches_previous = previous_location
            .map(|previous| new_location.matches(previous, query_policy))
            .unwrap_or(false);

        if matches_current && at_start {
            Presentation::ReplaceRoot
        } else if matches_previous {
            Presentation::Pop
        } else if matches_current || options.action == VisitAction::Replace {
            Presentation::Replace
        } else {
            Presentation::Push
        }
    }

    fn navigation_mode(
        current_context: NavContext,
        new_context: NavContext,
        presentation: Presentation,
    ) -> NavigationMode {
        let dismiss_modal = current_context == NavContext::Modal
            && new_context == NavContext::Default
            && presentation != Presentation::ReplaceRoot;
        let to_modal = current_context == NavContext::Default
            && new_context == NavContext::Modal
            && presentation != Presentation::ReplaceRoot;

        if dismiss_modal {
            NavigationMode::DismissModal
        } else if to_modal {
            NavigationMode::ToModal
        } else if presentation == Presentation::Refresh {
            NavigationMode::Refresh
        } else if presentation == Presentation::None {
            NavigationMode::None
        } else {
            NavigationMode::InContext
        }
    }
}
