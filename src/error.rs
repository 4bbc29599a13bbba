//! Error types for the workforce ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every business-rule violation and storage failure the ledger reports.

use thiserror::Error;

/// The main error type for the workforce ledger.
///
/// Business-rule violations (unknown ids, malformed input, duplicate
/// periods, invalid state transitions) are ordinary values of this type and
/// never abort the process.
///
/// # Example
///
/// ```
/// use workforce_ledger::error::LedgerError;
///
/// let error = LedgerError::NotFound {
///     entity: "employee",
///     id: "EMP404".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: EMP404");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entity with the given id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// Input was malformed or violated a field constraint.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A periodic or per-day record already exists for the key.
    #[error("{entity} already exists for {key}")]
    Duplicate {
        /// The kind of record that collided.
        entity: &'static str,
        /// The unique key that was already taken.
        key: String,
    },

    /// Credentials did not match a known, active employee.
    #[error("Authentication failed for {id}")]
    Authentication {
        /// The id presented by the caller.
        id: String,
    },

    /// The operation is not valid for the entity's current state.
    #[error("{entity} {id} is {state}: {message}")]
    State {
        /// The kind of entity.
        entity: &'static str,
        /// The entity id.
        id: String,
        /// The current state of the entity.
        state: String,
        /// What was attempted.
        message: String,
    },

    /// The backing store failed or is not open.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or held invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for a [`LedgerError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`LedgerError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a [`LedgerError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
