//! Uniform random event type selection.

use rand::seq::IndexedRandom;

use booking_types::{EventSelector, EventTypeId};

/// Picks uniformly with the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEventSelector;

impl EventSelector for RandomEventSelector {
    fn choose<'a>(&self, candidates: &'a [EventTypeId]) -> Option<&'a EventTypeId> {
        candidates.choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_candidates() {
        assert!(RandomEventSelector.choose(&[]).is_none());
    }

    #[test]
    fn test_single_candidate() {
        let ids = EventTypeId::parse_list("7");
        assert_eq!(RandomEventSelector.choose(&ids).unwrap().as_str(), "7");
    }

    #[test]
    fn test_spreads_over_all_candidates() {
        let ids = EventTypeId::parse_list("1,2,3");
        let seen: HashSet<&str> = (0..500)
            .filter_map(|_| RandomEventSelector.choose(&ids))
            .map(|id| id.as_str())
            .collect();
        assert_eq!(seen.len(), 3);
    }
}
