//! The marker automaton and hazard spawner.
//!
//! Both are driven by external periodic ticks and share one gating flag:
//! the activation state of the governing escort rule. A tick serviced while
//! that rule is inactive leaves the buffer untouched; pausing never resets
//! progress. The ticker tasks themselves are owned by the runtime and only
//! stop at session end.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::{AdvanceResult, Buffer, SpawnResult};

/// Derived marker status, recomputed on every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    /// The marker stands strictly before the end of the core.
    Walking,
    /// The marker stands at the end of the core, beside home.
    Arrived,
}

/// Outcome of one serviced marker tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The governing rule is inactive; the tick was ignored.
    Suspended,
    /// First serviced tick: the marker and home entered the buffer.
    Activated,
    /// The marker moved one cluster forward.
    Advanced,
    /// The marker already stands beside home; absorbing until the core
    /// grows again.
    Arrived,
    /// Collision: the buffer was fully reset.
    Collided,
}

/// Outcome of one serviced hazard tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The governing rule is inactive; the tick was ignored.
    Suspended,
    /// First serviced tick: the marker and home entered the buffer.
    Activated,
    /// A hazard landed at the given core cluster index.
    Spawned {
        /// Core cluster index the hazard now occupies.
        index: usize,
    },
    /// No eligible slot; the spawn was suppressed.
    Saturated,
}

/// Marker status derived from the buffer, `None` before activation.
#[must_use]
pub fn marker_status(buffer: &Buffer) -> Option<MarkerStatus> {
    buffer.marker_offset().map(|offset| {
        if offset >= buffer.core_len() {
            MarkerStatus::Arrived
        } else {
            MarkerStatus::Walking
        }
    })
}

/// Services one marker tick.
pub fn marker_tick(buffer: &mut Buffer, active: bool) -> TickOutcome {
    if !active {
        return TickOutcome::Suspended;
    }

    if !buffer.is_activated() {
        buffer.activate();
        return TickOutcome::Activated;
    }

    match buffer.advance_marker() {
        AdvanceResult::Stepped => TickOutcome::Advanced,
        AdvanceResult::Arrived => TickOutcome::Arrived,
        AdvanceResult::Collided => TickOutcome::Collided,
        // Unreachable after the activation check, but total anyway.
        AdvanceResult::Inactive => TickOutcome::Activated,
    }
}

/// Services one hazard tick.
pub fn hazard_tick<R: Rng + ?Sized>(
    buffer: &mut Buffer,
    rng: &mut R,
    active: bool,
) -> SpawnOutcome {
    if !active {
        return SpawnOutcome::Suspended;
    }

    if !buffer.is_activated() {
        buffer.activate();
        return SpawnOutcome::Activated;
    }

    match buffer.spawn_hazard(rng) {
        SpawnResult::Inserted { index } => SpawnOutcome::Spawned { index },
        SpawnResult::Saturated => SpawnOutcome::Saturated,
        SpawnResult::Inactive => SpawnOutcome::Activated,
    }
}
