//! # Rulegate - Progressive rule disclosure with a hazard-escort automaton
//!
//! Rulegate validates a user-edited text string against an ordered catalog
//! of predicates, revealing rules one at a time up to the first failure,
//! while a timer-driven automaton walks a marker glyph through the same
//! text toward its home glyph past periodically-spawned hazards.
//!
//! ## Core Concepts
//!
//! - **Buffer**: the shared text, a structured record of core, marker
//!   position, and fixed home suffix
//! - **RuleCatalog**: ordered, immutable-per-session predicates over the
//!   rendered text
//! - **ActivationRegistry**: run-time enable/disable overlay with its own
//!   reconciliation contract
//! - **GateSession**: the single-actor state behind every mutation
//! - **GateRuntime**: one worker thread servicing edits, ticks, and live
//!   resolutions one event at a time
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rulegate::{GateRuntime, GateRuntimeConfig};
//!
//! let runtime = GateRuntime::start(GateRuntimeConfig::default())?;
//! let snapshot = runtime.edit("March7pepsi!")?;
//! for rule in &snapshot.rules {
//!     println!("[{}] {}", if rule.valid { "ok" } else { "  " }, rule.label);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Leaf types and text machinery
pub mod error;
pub mod glyphs;
pub mod live;
pub mod lookup;
pub mod scan;
pub mod seed;

// The two engines and their shared state
pub mod automaton;
pub mod buffer;
pub mod catalog;
pub mod evaluate;
pub mod registry;
pub mod rules;

// Session and runtime
pub mod runtime;
pub mod session;

// Re-export primary types at crate root for convenience
pub use automaton::{MarkerStatus, SpawnOutcome, TickOutcome};
pub use buffer::{AdvanceResult, Buffer, SpawnResult};
pub use catalog::{RuleCatalog, TEMPERATURE_TOLERANCE};
pub use error::{GateError, GateResult, RuntimeError, ValidationError};
pub use evaluate::{evaluate, Evaluation, RuleResult};
pub use live::{Definition, LiveStatus, Reading};
pub use registry::ActivationRegistry;
pub use rules::{Rule, RuleCheck, RuleId};
pub use runtime::{
    GateRuntime, GateRuntimeConfig, Notice, SessionEvent, SubscriptionId, UpdateCause,
    UpdateRegistration, UpdateStream,
};
pub use seed::SessionSeed;
pub use session::{GateSession, SessionId, Snapshot};
