//! The shared text buffer: user-editable core plus marker/hazard state.
//!
//! The buffer is a structured record rather than one mutable string, so the
//! marker/home/hazard invariants are checkable directly instead of by
//! re-scanning rendered text. Only `core` is user-writable; the marker and
//! home glyphs are placed by the engine, never by keystrokes.

use rand::Rng;

use crate::glyphs::{self, HAZARD, HOME, MARKER};

/// Outcome of one marker advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceResult {
    /// The buffer has not been activated; nothing to advance.
    Inactive,
    /// The marker already stands at the end of the core.
    Arrived,
    /// The marker moved one grapheme cluster forward.
    Stepped,
    /// The cell ahead was a hazard; the whole buffer was reset.
    Collided,
}

/// Outcome of one hazard spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnResult {
    /// The buffer has not been activated; nothing to spawn into.
    Inactive,
    /// No eligible insertion index; the spawn is silently suppressed.
    Saturated,
    /// A hazard was inserted at the given cluster index of the core.
    Inserted {
        /// Core cluster index the hazard now occupies.
        index: usize,
    },
}

/// The session's single text buffer.
///
/// Rendered text is `prefix + core-with-marker + suffix` once activated and
/// the raw core before that. `suffix` ends with the home glyph and never
/// moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    prefix: String,
    core: String,
    suffix: String,
    marker_offset: Option<usize>,
}

impl Buffer {
    /// Creates an empty, pre-activation buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user-editable core text.
    #[must_use]
    pub fn core(&self) -> &str {
        &self.core
    }

    /// Marker position in core grapheme clusters, if activated.
    #[must_use]
    pub const fn marker_offset(&self) -> Option<usize> {
        self.marker_offset
    }

    /// True once the marker and home glyphs are present.
    #[must_use]
    pub const fn is_activated(&self) -> bool {
        self.marker_offset.is_some()
    }

    /// Core length in grapheme clusters.
    #[must_use]
    pub fn core_len(&self) -> usize {
        glyphs::cluster_len(&self.core)
    }

    /// Number of hazard glyphs currently in the core.
    #[must_use]
    pub fn hazard_count(&self) -> usize {
        glyphs::clusters(&self.core)
            .iter()
            .filter(|c| **c == HAZARD)
            .count()
    }

    /// Places the marker at offset zero and fixes the home suffix.
    ///
    /// Idempotent; the first serviced automaton tick calls this.
    pub fn activate(&mut self) {
        if self.marker_offset.is_none() {
            self.marker_offset = Some(0);
            self.suffix = HOME.to_string();
        }
    }

    /// The display string: marker spliced into the core, bounded by the
    /// fixed prefix and home-bearing suffix.
    #[must_use]
    pub fn rendered(&self) -> String {
        match self.marker_offset {
            None => format!("{}{}{}", self.prefix, self.core, self.suffix),
            Some(offset) => format!(
                "{}{}{}",
                self.prefix,
                glyphs::insert_at(&self.core, offset, MARKER),
                self.suffix
            ),
        }
    }

    /// Replaces the core with `raw`, stripping any control glyphs the user
    /// typed and clamping the marker to the new length.
    ///
    /// Never fails; empty input yields an empty core. Editing is also the
    /// only way hazards leave the core outside a collision reset.
    pub fn apply_user_edit(&mut self, raw: &str) {
        self.core = glyphs::strip_control(raw);
        if let Some(offset) = self.marker_offset {
            self.marker_offset = Some(offset.min(self.core_len()));
        }
    }

    /// Advances the marker one cluster toward home.
    ///
    /// A hazard in the cell ahead resets the whole buffer instead; that is
    /// a defined transition, not an error.
    pub fn advance_marker(&mut self) -> AdvanceResult {
        let Some(offset) = self.marker_offset else {
            return AdvanceResult::Inactive;
        };

        if offset >= self.core_len() {
            return AdvanceResult::Arrived;
        }

        if glyphs::cluster_at(&self.core, offset) == Some(HAZARD) {
            self.reset();
            return AdvanceResult::Collided;
        }

        self.marker_offset = Some(offset + 1);
        AdvanceResult::Stepped
    }

    /// Inserts a hazard at a uniformly chosen eligible core index.
    ///
    /// Eligible indices lie strictly between the marker and the end of the
    /// core, at least two clusters past the marker, and never beside an
    /// existing hazard. An empty eligible set suppresses the spawn.
    pub fn spawn_hazard<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpawnResult {
        if self.marker_offset.is_none() {
            return SpawnResult::Inactive;
        }

        let slots = self.eligible_hazard_slots();
        if slots.is_empty() {
            return SpawnResult::Saturated;
        }

        let index = slots[rng.gen_range(0..slots.len())];
        self.core = glyphs::insert_at(&self.core, index, HAZARD);
        SpawnResult::Inserted { index }
    }

    /// Clears the core and returns the marker to offset zero.
    pub fn reset(&mut self) {
        self.core.clear();
        if self.marker_offset.is_some() {
            self.marker_offset = Some(0);
        }
    }

    pub(crate) fn eligible_hazard_slots(&self) -> Vec<usize> {
        let Some(offset) = self.marker_offset else {
            return Vec::new();
        };

        let clusters = glyphs::clusters(&self.core);
        let len = clusters.len();
        let first = offset + 2;

        (first..len)
            .filter(|&j| clusters[j - 1] != HAZARD && clusters[j] != HAZARD)
            .collect()
    }
}
