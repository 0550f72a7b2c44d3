//! Consume-once event channels
//!
//! Modal results, dialog-cancel signals, and visit options travel from
//! the screen that produced them to the screen that consumes them, and
//! a second read must come back empty. [`OneShot`] makes that contract
//! explicit instead of relying on callers nulling out shared fields.

/// Single-value channel with take semantics
///
/// `put` overwrites any unconsumed value, matching "most recent wins".
#[derive(Debug)]
pub struct OneShot<T> {
    slot: Option<T>,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any unconsumed one
    pub fn put(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Consume the value; subsequent calls return `None` until the
    /// next `put`
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
