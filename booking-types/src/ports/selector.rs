//! Event type selection port.

use crate::domain::EventTypeId;

/// Chooses one provider event type among a tier's candidates.
///
/// Injected so tests can pin the choice; production uses a uniform random
/// source (load spreading only, not security-sensitive).
pub trait EventSelector: Send + Sync + 'static {
    /// Returns `None` only when `candidates` is empty.
    fn choose<'a>(&self, candidates: &'a [EventTypeId]) -> Option<&'a EventTypeId>;
}
