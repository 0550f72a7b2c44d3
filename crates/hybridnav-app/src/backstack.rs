//! Backstack abstraction the navigator executes against
//!
//! Mirrors the host framework's controller surface: a current entry, a
//! previous entry, pop/push, and "pop up to" transition options. The
//! in-memory [`NavBackStack`] is the default implementation and the one
//! the tests drive.

use std::collections::HashMap;

use hybridnav_core::prelude::*;
use hybridnav_core::{Location, NavContext};

use crate::destination::{DestinationId, DestinationKind};

/// One entry on the backstack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackStackEntry {
    pub destination: DestinationId,
    pub kind: DestinationKind,
    pub context: NavContext,
    pub location: Location,
    /// String-keyed argument bundle; carries at minimum a `location` key
    pub args: HashMap<String, String>,
}

impl BackStackEntry {
    pub fn new(
        destination: DestinationId,
        kind: DestinationKind,
        context: NavContext,
        location: Location,
    ) -> Self {
        let mut args = HashMap::new();
        args.insert("location".to_string(), location.as_str().to_string());
        Self {
            destination,
            kind,
            context,
            location,
            args,
        }
    }
}

/// Pop behavior applied before a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopUpTo {
    pub destination: DestinationId,
    pub inclusive: bool,
}

/// Native transition options attached to a push
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavOptions {
    /// Pop up to (and optionally including) a destination before
    /// pushing, so replacing the root never leaves stale entries
    pub pop_up_to: Option<PopUpTo>,
}

impl NavOptions {
    /// Default forward/back animation descriptors, no pop behavior
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn pop_up_to_inclusive(destination: DestinationId) -> Self {
        Self {
            pop_up_to: Some(PopUpTo {
                destination,
                inclusive: true,
            }),
        }
    }
}

/// The controller surface consumed from the host UI framework
pub trait BackStack {
    fn current_entry(&self) -> Option<&BackStackEntry>;
    fn previous_entry(&self) -> Option<&BackStackEntry>;
    fn start_destination(&self) -> Option<DestinationId>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the current entry is the stack's start destination
    fn at_start(&self) -> bool {
        self.len() <= 1
    }

    /// Pop one entry; `None` when already empty
    fn pop(&mut self) -> Option<BackStackEntry>;

    /// Pop entries until `destination` is on top (or gone, when
    /// `inclusive`). Returns false if the destination is not on the
    /// stack, in which case nothing is popped.
    fn pop_to(&mut self, destination: DestinationId, inclusive: bool) -> bool;

    /// Pop back to the start destination (no-op when already there)
    fn pop_to_start(&mut self);

    /// Push a new entry, honoring `options.pop_up_to` first
    fn navigate_to(&mut self, entry: BackStackEntry, options: &NavOptions);
}

/// In-memory backstack
#[derive(Debug, Default)]
pub struct NavBackStack {
    entries: Vec<BackStackEntry>,
}

impl NavBackStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BackStackEntry] {
        &self.entries
    }
}

impl BackStack for NavBackStack {
    fn current_entry(&self) -> Option<&BackStackEntry> {
        self.entries.last()
    }

    fn previous_entry(&self) -> Option<&BackStackEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    fn start_destination(&self) -> Option<DestinationId> {
        self.entries.first().map(|e| e.destination)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn pop(&mut self) -> Option<BackStackEntry> {
        self.entries.pop()
    }

    fn pop_to(&mut self, destination: DestinationId, inclusive: bool) -> bool {
        let Some(position) = self
            .entries
            .iter()
            .rposition(|e| e.destination == destination)
        else {
            return false;
        };

        let keep = if inclusive { position } else { position + 1 };
        self.entries.truncate(keep);
        true
    }

    fn pop_to_start(&mut self) {
        if self.entries.len() > 1 {
            self.entries.truncate(1);
        }
    }

    fn navigate_to(&mut self, entry: BackStackEntry, options: &NavOptions) {
        if let Some(pop_up_to) = options.pop_up_to {
            if !self.pop_to(pop_up_to.destination, pop_up_to.inclusive) {
                debug!(
                    destination = pop_up_to.destination,
                    "pop_up_to target absent, pushing without popping"
                );
            }
        }
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::next_destination_id;

    fn entry(destination: DestinationId, path: &str) -> BackStackEntry {
        BackStackEntry::new(
            destination,
            DestinationKind::Standard,
            NavContext::Default,
            Location::parse(&format!("https://example.com{path}")).unwrap(),
        )
    }

    #[test]
    fn test_entry_args_carry_location() {
        let e = entry(next_destination_id(), "/home");
        assert_eq!(
            e.args.get("location").map(String::as_str),
            Some("https://example.com/home")
        );
    }

    #[test]
    fn test_current_and_previous() {
        let mut stack = NavBackStack::new();
        let a = next_destination_id();
        let b = next_destination_id();
        stack.navigate_to(entry(a, "/home"), &NavOptions::standard());
        assert!(stack.at_start());
        assert!(stack.previous_entry().is_none());

        stack.navigate_to(entry(b, "/feature"), &NavOptions::standard());
        assert!(!stack.at_start());
        assert_eq!(stack.current_entry().unwrap().destination, b);
        assert_eq!(stack.previous_entry().unwrap().destination, a);
    }

    #[test]
    fn test_pop_to_inclusive() {
        let mut stack = NavBackStack::new();
        let a = next_destination_id();
        let b = next_destination_id();
        let c = next_destination_id();
        stack.navigate_to(entry(a, "/a"), &NavOptions::standard());
        stack.navigate_to(entry(b, "/b"), &NavOptions::standard());
        stack.navigate_to(entry(c, "/c"), &NavOptions::standard());

        assert!(stack.pop_to(b, false));
        assert_eq!(stack.current_entry().unwrap().destination, b);

        assert!(stack.pop_to(b, true));
        assert_eq!(stack.current_entry().unwrap().destination, a);
    }

    #[test]
    fn test_pop_to_missing_destination() {
        let mut stack = NavBackStack::new();
        stack.navigate_to(entry(next_destination_id(), "/a"), &NavOptions::standard());
        assert!(!stack.pop_to(9999, true));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_navigate_with_pop_up_to_inclusive_replaces_root() {
        let mut stack = NavBackStack::new();
        let root = next_destination_id();
        stack.navigate_to(entry(root, "/home"), &NavOptions::standard());
        stack.navigate_to(entry(next_destination_id(), "/feature"), &NavOptions::standard());

        let replacement = next_destination_id();
        stack.navigate_to(
            entry(replacement, "/home"),
            &NavOptions::pop_up_to_inclusive(root),
        );

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_entry().unwrap().destination, replacement);
    }

    #[test]
    fn test_pop_to_start() {
        let mut stack = NavBackStack::new();
        let a = next_destination_id();
        stack.navigate_to(entry(a, "/a"), &NavOptions::standard());
        stack.navigate_to(entry(next_destination_id(), "/b"), &NavOptions::standard());
        stack.navigate_to(entry(next_destination_id(), "/c"), &NavOptions::standard());

        stack.pop_to_start();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_entry().unwrap().destination, a);

        // Already at start: no-op
        stack.pop_to_start();
        assert_eq!(stack.len(), 1);
    }
}
