//! Error types for horizon-tabledrag.
//!
//! Serialization-facing operations never panic on malformed input; they
//! return a [`DragError`] whose wire form is the structured
//! `{code, message}` payload produced by [`DragError::payload`]. Dragging
//! itself has no error surface: ineligible rows and denied drop targets are
//! treated as "no valid target", not as failures.

use serde::Serialize;
use thiserror::Error;

/// Errors reported by serialization and table management operations.
#[derive(Debug, Error)]
pub enum DragError {
    /// The table has no id, which is required for serialization.
    #[error("table has no id; assign one before serializing")]
    MissingTableId,

    /// No table was specified and no drag has completed yet.
    #[error("no table has been dragged yet and none was specified")]
    NoCurrentTable,

    /// The given table key is not registered with the manager.
    #[error("unknown table")]
    UnknownTable,

    /// The configured id-extraction pattern failed to compile.
    #[error("invalid id-extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// JSON rendering failed.
    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl DragError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTableId => "missing-table-id",
            Self::NoCurrentTable => "no-current-table",
            Self::UnknownTable => "unknown-table",
            Self::InvalidPattern(_) => "invalid-pattern",
            Self::Json(_) => "json",
        }
    }

    /// The structured `{code, message}` form of this error.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Structured error payload handed to hosts that expect a serializable
/// error shape instead of a Rust error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// A specialized Result type for horizon-tabledrag operations.
pub type Result<T> = std::result::Result<T, DragError>;
