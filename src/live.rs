//! Live collaborator state.
//!
//! The dictionary and temperature services each deliver a single resolved
//! value (or a failure) once per session. The engine only ever sees these
//! already-resolved states; no network code lives here.

use serde::{Deserialize, Serialize};

/// Lifecycle of an external collaborator's value.
///
/// While `Pending`, the governed rule is unsatisfiable; on `Failed` it
/// degrades to a neutral pass; on `Ready` the real predicate applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LiveStatus<T> {
    /// Still loading.
    Pending,
    /// The collaborator failed; the rule is skipped.
    Failed,
    /// A concrete value arrived.
    Ready(T),
}

impl<T> LiveStatus<T> {
    /// True while the value has not resolved.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// True once the collaborator reported failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// True once a concrete value arrived.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The resolved value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed => None,
        }
    }
}

/// The dictionary collaborator's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The word the text must contain.
    pub word: String,
    /// Definition embedded verbatim in the rule label.
    pub definition: String,
}

/// The temperature collaborator's payload, in Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Reported outdoor temperature.
    pub fahrenheit: f64,
}

impl Reading {
    /// The reading rounded to the nearest degree, the value rules compare
    /// against.
    #[must_use]
    pub fn rounded(&self) -> f64 {
        self.fahrenheit.round()
    }
}
