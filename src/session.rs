//! Session state: the single logical actor behind the runtime.
//!
//! A `GateSession` owns the buffer, the frozen seed, the live-collaborator
//! states, the catalog, the activation registry, and the session RNG. Every
//! mutation is a read-modify-write of this one value and returns a fresh
//! [`Snapshot`]; re-evaluation is cheap and stateless, so it happens on
//! every change with no caching.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::automaton::{self, MarkerStatus, SpawnOutcome, TickOutcome};
use crate::buffer::Buffer;
use crate::catalog::RuleCatalog;
use crate::error::{GateError, GateResult};
use crate::evaluate::{self, Evaluation, RuleResult};
use crate::live::{Definition, LiveStatus, Reading};
use crate::registry::ActivationRegistry;
use crate::rules::RuleId;
use crate::seed::SessionSeed;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-ready view of the session after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Owning session.
    pub session_id: SessionId,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// The full rendered text, control glyphs included.
    pub rendered: String,
    /// Derived marker status, `None` before activation.
    pub marker_status: Option<MarkerStatus>,
    /// Hazards currently in the core.
    pub hazard_count: usize,
    /// The disclosed rule prefix, in catalog order.
    pub rules: Vec<RuleResult>,
    /// Satisfied rules among the disclosed prefix.
    pub satisfied: usize,
    /// Total rules in the catalog.
    pub total: usize,
    /// True iff every active rule is satisfied.
    pub all_satisfied: bool,
    /// Catalog identity, stable across evaluations.
    pub catalog_fingerprint: String,
}

impl Snapshot {
    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> GateResult<String> {
        serde_json::to_string(self)
            .map_err(|e| GateError::internal(format!("snapshot serialization failed: {e}")))
    }
}

/// The session engine.
pub struct GateSession {
    id: SessionId,
    created_at: DateTime<Utc>,
    buffer: Buffer,
    seed: SessionSeed,
    dictionary: LiveStatus<Definition>,
    temperature: LiveStatus<Reading>,
    catalog: RuleCatalog,
    registry: ActivationRegistry,
    rng: StdRng,
}

impl GateSession {
    /// Creates a session with entropy-backed randomness.
    #[must_use]
    pub fn new() -> Self {
        let seed = SessionSeed::generate(&mut rand::thread_rng());
        Self::with_seed(seed, StdRng::from_entropy())
    }

    /// Creates a session from explicit seed material, for deterministic
    /// replay.
    #[must_use]
    pub fn with_seed(seed: SessionSeed, rng: StdRng) -> Self {
        let dictionary = LiveStatus::Pending;
        let temperature = LiveStatus::Pending;
        let catalog = RuleCatalog::build(&seed, &dictionary, &temperature);
        let registry = ActivationRegistry::with_all_active(catalog.ids());

        Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            buffer: Buffer::new(),
            seed,
            dictionary,
            temperature,
            catalog,
            registry,
            rng,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Session creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The session buffer.
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The session catalog.
    #[must_use]
    pub const fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// The activation registry.
    #[must_use]
    pub const fn registry(&self) -> &ActivationRegistry {
        &self.registry
    }

    /// The frozen session seed.
    #[must_use]
    pub const fn seed(&self) -> &SessionSeed {
        &self.seed
    }

    /// Replaces the core with user input (control glyphs stripped).
    pub fn apply_edit(&mut self, raw: &str) -> Snapshot {
        self.buffer.apply_user_edit(raw);
        self.snapshot()
    }

    /// Flips activation for `id`.
    ///
    /// Deactivating the escort rule pauses its ticks; it never resets
    /// automaton progress.
    pub fn toggle_rule(&mut self, id: RuleId) -> GateResult<Snapshot> {
        self.registry.toggle(id)?;
        Ok(self.snapshot())
    }

    /// Services one marker tick.
    pub fn marker_tick(&mut self) -> (TickOutcome, Snapshot) {
        let escort_active = self.escort_active();
        let outcome = automaton::marker_tick(&mut self.buffer, escort_active);
        (outcome, self.snapshot())
    }

    /// Services one hazard tick.
    pub fn hazard_tick(&mut self) -> (SpawnOutcome, Snapshot) {
        let escort_active = self.escort_active();
        let outcome =
            automaton::hazard_tick(&mut self.buffer, &mut self.rng, escort_active);
        (outcome, self.snapshot())
    }

    /// Delivers the dictionary collaborator's resolution.
    pub fn resolve_dictionary(&mut self, status: LiveStatus<Definition>) -> Snapshot {
        self.dictionary = status;
        self.rebuild_catalog();
        self.snapshot()
    }

    /// Delivers the temperature collaborator's resolution.
    pub fn resolve_temperature(&mut self, status: LiveStatus<Reading>) -> Snapshot {
        self.temperature = status;
        self.rebuild_catalog();
        self.snapshot()
    }

    /// Evaluates the catalog against the current rendered text.
    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        evaluate::evaluate(&self.buffer.rendered(), &self.catalog, &self.registry)
    }

    /// Takes a display-ready snapshot without mutating anything.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let evaluation = self.evaluate();
        Snapshot {
            session_id: self.id,
            timestamp: Utc::now(),
            rendered: self.buffer.rendered(),
            marker_status: automaton::marker_status(&self.buffer),
            hazard_count: self.buffer.hazard_count(),
            satisfied: evaluation.satisfied(),
            total: evaluation.total(),
            all_satisfied: evaluation.all_satisfied(),
            rules: evaluation.visible().to_vec(),
            catalog_fingerprint: self.catalog.fingerprint(),
        }
    }

    fn escort_active(&self) -> bool {
        self.catalog.contains(RuleId::ESCORT) && self.registry.is_active(RuleId::ESCORT)
    }

    /// Rebuilds the catalog after a live state change and reconciles the
    /// registry against the (possibly changed) id set.
    fn rebuild_catalog(&mut self) {
        self.catalog = RuleCatalog::build(&self.seed, &self.dictionary, &self.temperature);
        self.registry.reconcile(self.catalog.ids());
    }
}

impl Default for GateSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GateSession {
        let seed = SessionSeed::from_letters('q', 'z').unwrap();
        GateSession::with_seed(seed, StdRng::seed_from_u64(11))
    }

    #[test]
    fn edits_feed_the_evaluator() {
        let mut session = session();
        let snapshot = session.apply_edit("Ab1!");
        assert_eq!(snapshot.rules.len(), 1);
        assert!(!snapshot.rules[0].valid);
        assert_eq!(snapshot.satisfied, 0);
        assert_eq!(snapshot.total, session.catalog().len());
        assert!(!snapshot.all_satisfied);
    }

    #[test]
    fn first_marker_tick_activates_the_buffer() {
        let mut session = session();
        session.apply_edit("hello");

        let (outcome, snapshot) = session.marker_tick();
        assert_eq!(outcome, TickOutcome::Activated);
        assert_eq!(snapshot.marker_status, Some(MarkerStatus::Walking));
        assert!(snapshot.rendered.contains('\u{1F95A}'));
        assert!(snapshot.rendered.ends_with('\u{1F3E0}'));
    }

    #[test]
    fn deactivating_escort_pauses_ticks_without_reset() {
        let mut session = session();
        session.apply_edit("hello");
        session.marker_tick();
        session.marker_tick();
        let offset = session.buffer().marker_offset();

        session.toggle_rule(RuleId::ESCORT).unwrap();
        let (outcome, _) = session.marker_tick();
        assert_eq!(outcome, TickOutcome::Suspended);
        let (spawn, _) = session.hazard_tick();
        assert_eq!(spawn, SpawnOutcome::Suspended);
        assert_eq!(session.buffer().marker_offset(), offset);

        session.toggle_rule(RuleId::ESCORT).unwrap();
        let (outcome, _) = session.marker_tick();
        assert_eq!(outcome, TickOutcome::Advanced);
    }

    #[test]
    fn hazard_ticks_respect_adjacency_invariants() {
        let mut session = session();
        session.apply_edit("abcdefghij");
        session.marker_tick(); // activate

        for _ in 0..12 {
            session.hazard_tick();
        }

        let snapshot = session.snapshot();
        assert!(!snapshot.rendered.contains("\u{1F525}\u{1F525}"));
        assert!(!snapshot.rendered.contains("\u{1F95A}\u{1F525}"));
        assert!(snapshot.hazard_count <= session.buffer().core_len());
    }

    #[test]
    fn resolving_the_dictionary_swaps_the_rule_in_place() {
        let mut first = session();
        let before = first.snapshot().catalog_fingerprint;

        let snapshot = first.resolve_dictionary(LiveStatus::Ready(Definition {
            word: "ember".to_string(),
            definition: "a glowing fragment of coal".to_string(),
        }));
        assert_ne!(snapshot.catalog_fingerprint, before);

        // The id set is unchanged, so an earlier toggle survives the
        // reconcile.
        let mut other = session();
        other.toggle_rule(RuleId::MONTH).unwrap();
        other.resolve_temperature(LiveStatus::Failed);
        assert!(!other.registry().is_active(RuleId::MONTH));
        assert!(other.registry().is_active(RuleId::SPONSOR));
    }

    #[test]
    fn failed_collaborators_auto_pass() {
        let mut session = session();
        session.resolve_dictionary(LiveStatus::Failed);
        session.resolve_temperature(LiveStatus::Failed);

        let evaluation = session.evaluate();
        let dict = evaluation
            .results()
            .iter()
            .find(|r| r.id == RuleId::DICTIONARY)
            .unwrap();
        assert!(dict.valid);
        assert!(dict.active);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut session = session();
        session.apply_edit("hello world");
        let json = session.snapshot().to_json().unwrap();
        assert!(json.contains("\"rendered\""));
        assert!(json.contains("\"all_satisfied\""));
    }

    #[test]
    fn snapshots_are_deterministic_given_identical_state() {
        let session = session();
        let a = session.evaluate();
        let b = session.evaluate();
        assert_eq!(a, b);
    }
}
