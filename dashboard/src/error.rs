//! Error handling for the dashboard view-models
//!
//! Every error is local to one screen; nothing here is fatal to the process.

use crm_shared::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Field name -> inline messages, in the order they were raised
pub type FieldErrors = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed")]
    Validation { details: FieldErrors },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("{operation} failed (simulated)")]
    SimulatedFailure { operation: String },

    #[error("{0} was cancelled")]
    Cancelled(String),

    #[error("{0} is already in progress")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    /// Create a validation error with a single field error
    pub fn validation_single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut details = HashMap::new();
        details.insert(field.into(), vec![message.into()]);
        Self::Validation { details }
    }

    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Timeout { .. } => "TIMEOUT",
            Self::SimulatedFailure { .. } => "SIMULATED_FAILURE",
            Self::Cancelled(_) => "CANCELLED",
            Self::Busy(_) => "BUSY",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Transient failures of a data source call, worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::SimulatedFailure { .. })
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { details } => Some(details),
            _ => None,
        }
    }
}

/// Serializable error summary for a status banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
    pub timestamp: String,
}

impl From<&DashboardError> for ErrorNotice {
    fn from(err: &DashboardError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: err.field_errors().cloned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Helper to add multiple validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    details: FieldErrors,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(mut self, field: &str, message: &str) -> Self {
        self.details
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
        self
    }

    pub fn build(self) -> Option<DashboardError> {
        if self.details.is_empty() {
            None
        } else {
            Some(DashboardError::Validation {
                details: self.details,
            })
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.details.is_empty()
    }
}
