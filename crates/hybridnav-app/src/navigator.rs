//! Navigator: executes resolved rules against the backstack
//!
//! Thin compared to the resolver: every decision is made in
//! [`NavRule::resolve`], and this module only performs the pops,
//! pushes, and modal-result publishing the rule calls for.
//!
//! ## Public API
//!
//! - [`Navigator`] — the orchestrator screens call `navigate` on
//! - [`NavigatorDelegate`] — per-screen gate and pre-transition hook
//! - [`NavOutcome`] — caller-visible result of one navigation request

use serde_json::Value;

use hybridnav_core::prelude::*;
use hybridnav_core::{Location, PathConfiguration, Presentation, VisitOptions};

use crate::backstack::{BackStack, BackStackEntry, NavOptions};
use crate::channels::OneShot;
use crate::destination::{Destination, DestinationKind, DestinationRegistry};
use crate::rule::{ModalResult, NavRule, NavigationMode};

/// Caller-visible result of one navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// A transition was executed
    Navigated,
    /// The rule resolved to no transition (presentation `none`, or a
    /// pop with nothing beneath it)
    Suppressed,
    /// No destination and no fallback registered for the location;
    /// logged, nothing executed
    NoDestination,
    /// The delegate's gate rejected the location before any rule was
    /// constructed
    Blocked,
}

/// Hooks a screen installs around navigation
///
/// `should_navigate` runs before rule resolution; returning false
/// aborts with no side effects. `on_navigation_visit` runs after a
/// rule resolves to a real transition and before the backstack
/// mutates, which is where the shared rendering surface must be
/// detached from the departing screen.
pub trait NavigatorDelegate {
    fn should_navigate(&self, _location: &Location) -> bool {
        true
    }

    fn on_navigation_visit(&mut self, _new_location: &Location) {}
}

/// Default delegate: every location is navigable, no detach hook
#[derive(Debug, Default)]
pub struct AllowAll;

impl NavigatorDelegate for AllowAll {}

pub struct Navigator<B: BackStack> {
    config: PathConfiguration,
    destinations: DestinationRegistry,
    back_stack: B,
    delegate: Box<dyn NavigatorDelegate>,
    modal_result: OneShot<ModalResult>,
    dialog_cancel: OneShot<bool>,
}

impl<B: BackStack> Navigator<B> {
    pub fn new(config: PathConfiguration, destinations: DestinationRegistry, back_stack: B) -> Self {
        Self {
            config,
            destinations,
            back_stack,
            delegate: Box::new(AllowAll),
            modal_result: OneShot::new(),
            dialog_cancel: OneShot::new(),
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn NavigatorDelegate>) {
        self.delegate = delegate;
    }

    pub fn back_stack(&self) -> &B {
        &self.back_stack
    }

    pub fn config(&self) -> &PathConfiguration {
        &self.config
    }

    /// Replace the path configuration, dropping memoized per-location
    /// properties
    pub fn update_config(&mut self, config: PathConfiguration) {
        self.config = config;
    }

    /// Consume the pending modal result, if any (one-shot)
    pub fn take_modal_result(&mut self) -> Option<ModalResult> {
        self.modal_result.take()
    }

    /// Consume the pending dialog-cancel signal (one-shot)
    pub fn take_dialog_cancel(&mut self) -> bool {
        self.dialog_cancel.take().unwrap_or(false)
    }

    /// Navigate to a location per the configured rules
    pub fn navigate(
        &mut self,
        location: &Location,
        options: VisitOptions,
        extra_data: Option<Value>,
    ) -> Result<NavOutcome> {
        if !self.delegate.should_navigate(location) {
            debug!(location = %location, "navigation blocked by delegate");
            return Ok(NavOutcome::Blocked);
        }

        let (current_location, current_kind) = match self.back_stack.current_entry() {
            Some(entry) => (entry.location.clone(), entry.kind),
            None => return self.navigate_to_root(location),
        };
        let previous_location = self.back_stack.previous_entry().map(|e| e.location.clone());

        let rule = NavRule::resolve(
            previous_location.as_ref(),
            &current_location,
            location,
            options,
            self.back_stack.at_start(),
            &self.config,
            &self.destinations,
            extra_data,
        )?;

        debug!(
            location = %location,
            presentation = ?rule.new_presentation,
            mode = ?rule.new_navigation_mode,
            "resolved navigation rule"
        );

        match rule.new_navigation_mode {
            NavigationMode::None => Ok(NavOutcome::Suppressed),
            NavigationMode::Refresh => {
                // Reload in place: re-navigate to where we already are;
                // the recursive resolution fires the visit hook
                self.navigate(&current_location, VisitOptions::advance(), None)
            }
            NavigationMode::DismissModal => {
                self.delegate.on_navigation_visit(location);
                self.dismiss_modal(rule, current_kind);
                Ok(NavOutcome::Navigated)
            }
            NavigationMode::InContext | NavigationMode::ToModal => {
                self.execute_in_context(rule, location)
            }
        }
    }

    /// Pop one entry off the backstack
    pub fn navigate_back(&mut self) -> NavOutcome {
        let Some(current) = self.back_stack.current_entry() else {
            return NavOutcome::Suppressed;
        };
        if current.kind == DestinationKind::Dialog {
            self.dialog_cancel.put(true);
        }
        match self.back_stack.pop() {
            Some(_) => NavOutcome::Navigated,
            None => NavOutcome::Suppressed,
        }
    }

    /// Up affordance; identical to back in this stack model
    pub fn navigate_up(&mut self) -> NavOutcome {
        self.navigate_back()
    }

    /// Pop back to the start destination (no-op when already there)
    pub fn clear_back_stack(&mut self) -> NavOutcome {
        if self.back_stack.at_start() {
            return NavOutcome::Suppressed;
        }
        self.back_stack.pop_to_start();
        NavOutcome::Navigated
    }

    fn navigate_to_root(&mut self, location: &Location) -> Result<NavOutcome> {
        let properties = self.config.properties(location);
        let (destination, fallback) = self.destinations.resolve(&properties);
        let Some(destination) = destination.or(fallback) else {
            warn!(location = %location, "no destination resolved for root navigation");
            return Ok(NavOutcome::NoDestination);
        };
        self.delegate.on_navigation_visit(location);
        self.push(&destination, properties.context(), location, &NavOptions::standard());
        Ok(NavOutcome::Navigated)
    }

    fn execute_in_context(&mut self, rule: NavRule, location: &Location) -> Result<NavOutcome> {
        let Some(destination) = rule.resolved_destination().cloned() else {
            warn!(location = %location, "no destination or fallback registered, navigation skipped");
            return Ok(NavOutcome::NoDestination);
        };

        self.delegate.on_navigation_visit(location);

        match rule.new_presentation {
            Presentation::Pop => {
                if self.back_stack.pop().is_none() {
                    return Ok(NavOutcome::Suppressed);
                }
            }
            Presentation::Replace => {
                self.back_stack.pop();
                self.push(&destination, rule.new_context, location, &rule.new_nav_options);
            }
            Presentation::Push => {
                self.push(&destination, rule.new_context, location, &rule.new_nav_options);
            }
            Presentation::ReplaceRoot => {
                self.push(&destination, rule.new_context, location, &rule.new_nav_options);
            }
            Presentation::ClearAll => {
                self.clear_back_stack();
            }
            // Default resolves to a concrete presentation; Refresh and
            // None are handled at the mode level
            Presentation::Default | Presentation::Refresh | Presentation::None => {
                return Ok(NavOutcome::Suppressed);
            }
        }

        Ok(NavOutcome::Navigated)
    }

    fn dismiss_modal(&mut self, rule: NavRule, dismissing_kind: DestinationKind) {
        let result = match rule.new_modal_result {
            Some(result) => result,
            None => ModalResult {
                location: rule.new_location.clone(),
                options: rule.new_visit_options.clone(),
                extra_data: None,
                should_navigate: true,
            },
        };

        // Dialogs survive their own pop and can receive the result
        // after it; standard screens are destroyed by the pop, so the
        // result must be published while they are still alive.
        match dismissing_kind {
            DestinationKind::Dialog => {
                self.back_stack.pop();
                self.modal_result.put(result);
            }
            DestinationKind::Standard => {
                self.modal_result.put(result);
                self.back_stack.pop();
            }
        }
    }

    fn push(
        &mut self,
        destination: &Destination,
        context: hybridnav_core::NavContext,
        location: &Location,
        options: &NavOptions,
    ) {
        let entry = BackStackEntry::new(destination.id, destination.kind, context, location.clone());
        self.back_stack.navigate_to(entry, options);
    }
}
