use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the chronoframe workspace.
///
/// Each variant corresponds to one failure class of the data layer: wrong input
/// types, missing or colliding member names, index problems, resampling
/// problems, and transformation contract violations. `MembersFailed` is the
/// only composite; it is produced by frame-wide operations that attempt every
/// member before reporting.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChronoError {
    /// A value of the wrong kind was handed to a constructor, setter, or cast.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A series or member name was not found.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing name.
        key: String,
    },

    /// A name collided with an existing member.
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The colliding name.
        key: String,
    },

    /// A name does not satisfy the identifier rule
    /// (`[A-Za-z_][A-Za-z0-9_]*`).
    #[error("invalid identifier: {name:?}")]
    InvalidIdentifier {
        /// The rejected name.
        name: String,
    },

    /// Index labels could not be coerced to a timestamp, duration, or period index.
    #[error("incoercible index: {0}")]
    IncoercibleIndex(String),

    /// The index has duplicates, is not strictly increasing, or does not match
    /// the value length.
    #[error("index integrity violation: {0}")]
    IndexIntegrity(String),

    /// A resample target cannot be expressed as a regular step of the index kind.
    #[error("incompatible frequency: {0}")]
    IncompatibleFrequency(String),

    /// A NaN, upsample, or downsample strategy cannot produce a valid result.
    #[error("incompatible strategy: {0}")]
    IncompatibleStrategy(String),

    /// A procedure position is outside the valid range.
    #[error("position {position} out of bounds for length {len}")]
    OutOfBounds {
        /// Requested position.
        position: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },

    /// A transformation step changed the length of its input.
    #[error("step {step} ({name}) changed length from {expected} to {actual}")]
    LengthMismatch {
        /// Zero-based position of the offending step.
        step: usize,
        /// Display name of the offending function.
        name: String,
        /// Input length.
        expected: usize,
        /// Output length.
        actual: usize,
    },

    /// A collaborator (table source, holiday calendar) failed.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Collaborator name.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// One or more frame members failed; contains the per-member failures in
    /// member order.
    #[error("{} member(s) failed: {}", .0.len(), summarize(.0))]
    MembersFailed(Vec<MemberFailure>),
}

/// A failure attributed to a single named frame member.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MemberFailure {
    /// Member name.
    pub member: String,
    /// The error the member produced.
    pub error: ChronoError,
}

fn summarize(failures: &[MemberFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.member, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ChronoError {
    /// Helper: build a `KeyNotFound` error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Helper: build a `DuplicateKey` error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Helper: build an `InvalidIdentifier` error.
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Helper: build a `Source` error with the collaborator name and message.
    pub fn source(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: wrap an error as belonging to a named member.
    pub fn for_member(member: impl Into<String>, error: Self) -> MemberFailure {
        MemberFailure {
            member: member.into(),
            error,
        }
    }

    /// Names of the failing members when this is a `MembersFailed` composite.
    ///
    /// Returns an empty vector for every other variant.
    #[must_use]
    pub fn failed_members(&self) -> Vec<&str> {
        match self {
            Self::MembersFailed(list) => list.iter().map(|f| f.member.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Flatten nested `MembersFailed` structures into a plain vector.
    ///
    /// Member attribution is dropped; other variants are preserved as-is.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::MembersFailed(list) => list
                .into_iter()
                .flat_map(|f| f.error.flatten())
                .collect(),
            other => vec![other],
        }
    }
}
