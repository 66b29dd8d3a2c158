//! Run-time rule activation.
//!
//! The registry is a first-class overlay, deliberately decoupled from
//! catalog construction: toggles come only from explicit user action, and
//! `reconcile` runs whenever the catalog's id set can change. An inactive
//! rule auto-passes during evaluation; it does not stop the automaton's
//! ticker tasks.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::rules::RuleId;

/// The set of rule ids currently enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationRegistry {
    known: HashSet<RuleId>,
    active: HashSet<RuleId>,
}

impl ActivationRegistry {
    /// Creates an empty registry; call [`reconcile`](Self::reconcile) to
    /// seed it from a catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every given id known and active.
    #[must_use]
    pub fn with_all_active<I: IntoIterator<Item = RuleId>>(ids: I) -> Self {
        let known: HashSet<RuleId> = ids.into_iter().collect();
        Self {
            active: known.clone(),
            known,
        }
    }

    /// True if `id` is currently enabled.
    #[must_use]
    pub fn is_active(&self, id: RuleId) -> bool {
        self.active.contains(&id)
    }

    /// True if `id` is known to the registry.
    #[must_use]
    pub fn is_known(&self, id: RuleId) -> bool {
        self.known.contains(&id)
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Flips membership for `id` and returns the new state.
    pub fn toggle(&mut self, id: RuleId) -> Result<bool, ValidationError> {
        if !self.known.contains(&id) {
            return Err(ValidationError::UnknownRule {
                id: id.as_str().to_string(),
            });
        }
        if self.active.remove(&id) {
            Ok(false)
        } else {
            self.active.insert(id);
            Ok(true)
        }
    }

    /// Aligns the registry with the catalog's current id set.
    ///
    /// Ids no longer in the catalog are dropped; ids the registry has never
    /// seen are added as active. An id the user toggled off stays off.
    pub fn reconcile<I: IntoIterator<Item = RuleId>>(&mut self, ids: I) {
        let next: HashSet<RuleId> = ids.into_iter().collect();
        self.active.retain(|id| next.contains(id));
        for id in &next {
            if !self.known.contains(id) {
                self.active.insert(*id);
            }
        }
        self.known = next;
    }
}
