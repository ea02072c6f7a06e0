// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchboard messaging engine.

use thiserror::Error;

/// The primary error type used across all Switchboard traits and services.
///
/// Only `Validation` and `NotFound` are expected on the request path; both are
/// raised before any write happens. Failures downstream of a persisted message
/// (notification fan-out, activity logging) are never turned into an error.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// A required field is missing or blank.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced ticket, agent, message or notification does not exist.
    #[error("{entity} not found: {reference}")]
    NotFound { entity: String, reference: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchboardError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &str, reference: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            reference: reference.into(),
        }
    }

    /// Returns true for errors that reject a request before any write.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}
