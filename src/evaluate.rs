//! Progressive rule evaluation.
//!
//! A pure function of (rendered text, catalog, registry): every rule maps
//! to a result in catalog order, and the visible slice is the prefix
//! through the first failing result. Fixing an earlier rule immediately
//! reveals the next one; nothing here has side effects, so it is safe to
//! recompute on every mutation.

use serde::Serialize;

use crate::catalog::RuleCatalog;
use crate::registry::ActivationRegistry;
use crate::rules::RuleId;

/// Outcome of one rule against the current text. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    /// Rule identifier.
    pub id: RuleId,
    /// Frozen display label.
    pub label: String,
    /// Whether the text satisfies the rule (forced true when inactive).
    pub valid: bool,
    /// Whether the rule is enabled in the registry.
    pub active: bool,
}

/// Ordered results plus the disclosure cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    results: Vec<RuleResult>,
    visible_len: usize,
    all_satisfied: bool,
}

impl Evaluation {
    /// Every rule's result, in catalog order.
    #[must_use]
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// The disclosed prefix: up to and including the first failure.
    #[must_use]
    pub fn visible(&self) -> &[RuleResult] {
        &self.results[..self.visible_len]
    }

    /// Length of the disclosed prefix.
    #[must_use]
    pub const fn visible_len(&self) -> usize {
        self.visible_len
    }

    /// Number of satisfied rules among the disclosed prefix.
    #[must_use]
    pub fn satisfied(&self) -> usize {
        self.visible().iter().filter(|r| r.valid).count()
    }

    /// Total rule count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True iff every active rule is satisfied and at least one rule is
    /// active.
    #[must_use]
    pub const fn all_satisfied(&self) -> bool {
        self.all_satisfied
    }
}

/// Evaluates the catalog against rendered text under the activation
/// overlay.
///
/// Deterministic and side-effect-free: identical inputs yield identical
/// output.
#[must_use]
pub fn evaluate(
    rendered: &str,
    catalog: &RuleCatalog,
    registry: &ActivationRegistry,
) -> Evaluation {
    let results: Vec<RuleResult> = catalog
        .rules()
        .iter()
        .map(|rule| {
            let active = registry.is_active(rule.id);
            RuleResult {
                id: rule.id,
                label: rule.label.clone(),
                valid: !active || rule.check.evaluate(rendered),
                active,
            }
        })
        .collect();

    let visible_len = results
        .iter()
        .position(|r| !r.valid)
        .map_or(results.len(), |idx| idx + 1);

    let mut active_seen = false;
    let mut all_valid = true;
    for result in &results {
        if result.active {
            active_seen = true;
            all_valid &= result.valid;
        }
    }

    Evaluation {
        results,
        visible_len,
        all_satisfied: active_seen && all_valid,
    }
}

/// Convenience: the id of the rule currently blocking progress, if any.
#[must_use]
pub fn blocking_rule(evaluation: &Evaluation) -> Option<RuleId> {
    evaluation
        .visible()
        .last()
        .filter(|r| !r.valid)
        .map(|r| r.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::live::LiveStatus;
    use crate::seed::SessionSeed;

    fn catalog() -> RuleCatalog {
        let seed = SessionSeed::from_letters('q', 'z').unwrap();
        RuleCatalog::build(&seed, &LiveStatus::Pending, &LiveStatus::Pending)
    }

    fn all_active(catalog: &RuleCatalog) -> ActivationRegistry {
        ActivationRegistry::with_all_active(catalog.ids())
    }

    #[test]
    fn short_text_stops_at_the_first_rule() {
        let catalog = catalog();
        let registry = all_active(&catalog);
        let evaluation = evaluate("Ab1!", &catalog, &registry);

        assert_eq!(evaluation.visible_len(), 1);
        assert!(!evaluation.visible()[0].valid);
        assert_eq!(evaluation.visible()[0].id, RuleId::MIN_LENGTH);
        assert!(!evaluation.all_satisfied());
    }

    #[test]
    fn visible_is_a_prefix_with_one_trailing_failure_at_most() {
        let catalog = catalog();
        let registry = all_active(&catalog);

        for text in ["", "Ab1!", "March7pepsi!", "a very long Text 9 9 7 !"] {
            let evaluation = evaluate(text, &catalog, &registry);
            let visible = evaluation.visible();
            assert!(visible.len() <= evaluation.results().len());
            for (i, result) in visible.iter().enumerate() {
                if !result.valid {
                    assert_eq!(i, visible.len() - 1, "failure not at cutoff for {text:?}");
                }
            }
            assert_eq!(evaluation.results()[..visible.len()], *visible);
        }
    }

    #[test]
    fn cutoff_lands_on_digit_sum_after_month_and_sponsor_pass() {
        let catalog = catalog();
        let registry = all_active(&catalog);
        let evaluation = evaluate("March7pepsi!", &catalog, &registry);

        assert_eq!(blocking_rule(&evaluation), Some(RuleId::DIGIT_SUM));
        // Month and sponsor are disclosed and satisfied before it.
        let visible = evaluation.visible();
        assert!(visible
            .iter()
            .any(|r| r.id == RuleId::MONTH && r.valid));
        assert!(visible
            .iter()
            .any(|r| r.id == RuleId::SPONSOR && r.valid));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let catalog = catalog();
        let registry = all_active(&catalog);
        let a = evaluate("March7pepsi!", &catalog, &registry);
        let b = evaluate("March7pepsi!", &catalog, &registry);
        assert_eq!(a, b);
    }

    #[test]
    fn disabled_rules_pass_and_never_shorten_visibility() {
        let catalog = catalog();
        let mut registry = all_active(&catalog);

        let blocked = evaluate("Ab1!", &catalog, &registry);
        assert_eq!(blocking_rule(&blocked), Some(RuleId::MIN_LENGTH));

        registry.toggle(RuleId::MIN_LENGTH).unwrap();
        let after = evaluate("Ab1!", &catalog, &registry);

        let first = &after.results()[0];
        assert_eq!(first.id, RuleId::MIN_LENGTH);
        assert!(first.valid);
        assert!(!first.active);
        // The cutoff moved past the disabled rule.
        assert!(after.visible_len() > 1);
    }

    #[test]
    fn all_satisfied_requires_an_active_rule() {
        let catalog = catalog();
        let mut registry = all_active(&catalog);
        for id in catalog.ids() {
            if registry.is_active(id) {
                registry.toggle(id).unwrap();
            }
        }

        let evaluation = evaluate("anything", &catalog, &registry);
        // Every rule force-passes, but nothing is active.
        assert_eq!(evaluation.visible_len(), evaluation.total());
        assert!(!evaluation.all_satisfied());
    }

    #[test]
    fn satisfied_counter_counts_the_visible_prefix() {
        let catalog = catalog();
        let registry = all_active(&catalog);
        let evaluation = evaluate("March7pepsi!", &catalog, &registry);
        // Everything before the digit-sum cutoff passes.
        assert_eq!(evaluation.satisfied(), evaluation.visible_len() - 1);
        assert_eq!(evaluation.total(), catalog.len());
    }
}
