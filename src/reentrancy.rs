//! Debug-only reentrancy check.
//!
//! The map runs user code while a chain may be mid-surgery: the injected key
//! strategy during probing and sorted placement, and the caller's traversal
//! callback. Calling back into the same map from either is a bug. In debug
//! builds the check panics at the door; in release builds it costs nothing.
//!
//! The busy flag is a `Cell`, so a map is `!Sync` but stays `Send`: callers
//! who need cross-thread use can still wrap one map in an exclusive lock.

use core::cell::Cell;

/// Busy flag embedded in the map. Public operations hold a token for their
/// whole body via `let _g = self.reentry.enter();`.
#[derive(Debug)]
pub(crate) struct ReentryCheck {
    busy: Cell<bool>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            busy: Cell::new(false),
        }
    }

    /// Mark the map busy until the returned token drops. Panics in debug
    /// builds if an operation is already underway on this map.
    #[inline]
    pub(crate) fn enter(&self) -> ReentryToken<'_> {
        if cfg!(debug_assertions) {
            assert!(
                !self.busy.replace(true),
                "map re-entered from user code during an operation"
            );
        }
        ReentryToken { check: self }
    }
}

/// Token returned by [`ReentryCheck::enter`]; clears the flag on drop.
pub(crate) struct ReentryToken<'a> {
    check: &'a ReentryCheck,
}

impl Drop for ReentryToken<'_> {
    fn drop(&mut self) {
        if cfg!(debug_assertions) {
            self.check.busy.set(false);
        }
    }
}
