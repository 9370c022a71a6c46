//! Error types for the audit engine.
//!
//! [`AuditError`] covers the few fatal conditions (bundle construction and
//! checklist loading). [`ClassifyError`] is what a single module returns when
//! it cannot finish; the pipeline turns it into an `Error` finding.

use crate::finding::ModuleId;
use crate::signals::Signal;
use complyscope_core::CoreError;
use thiserror::Error;

/// Fatal audit errors.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Target or policy URL rejected while building a bundle
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Checklist file does not exist
    #[error("checklist file not found: {path}")]
    ChecklistNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Checklist parsed but is unusable
    #[error("invalid checklist '{name}': {reason}")]
    InvalidChecklist {
        /// Checklist name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Checklist is not valid TOML
    #[error("failed to parse checklist: {0}")]
    ChecklistParse(#[from] toml::de::Error),

    /// Checklist could not be serialized
    #[error("failed to serialize checklist: {0}")]
    ChecklistSerialize(#[from] toml::ser::Error),

    /// I/O error reading a checklist
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single module could not produce an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The collector reported that a signal could not be acquired
    #[error("{signal} signal unavailable: {reason}")]
    SignalUnavailable {
        /// Signal that failed
        signal: Signal,
        /// Failure reported by the collector
        reason: String,
    },

    /// A response header name is not a valid HTTP token
    #[error("malformed response header name {name:?}")]
    MalformedHeader {
        /// The offending name
        name: String,
    },

    /// The checklist lists the module but carries no rule for it
    #[error("checklist has no rule for {0}")]
    MissingRule(ModuleId),
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
