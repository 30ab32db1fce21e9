//! WONDER error types

use crate::ReasonCode;
use std::fmt;
use thiserror::Error;

/// Main error type for the WONDER query layer
#[derive(Debug, Clone, Error)]
pub enum WonderError {
    /// A value of the correct type violates a domain invariant.
    ///
    /// Raised synchronously at configuration time, before any network call.
    #[error("{reason}: {message}")]
    Validation {
        reason: ReasonCode,
        message: String,
    },

    /// An argument is not of the expected domain type
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// The remote endpoint returned a non-success status.
    ///
    /// Carries every message extracted from the error reply so callers see
    /// the underlying cause, not just the status code.
    #[error("server returned status {status}: {}", FormatMessages(.messages))]
    Server { status: u16, messages: Vec<String> },

    /// The reply's row-span structure produced an inconsistent table, or the
    /// document shape could not be parsed
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// A network-level failure, wrapped and re-raised without retry
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl WonderError {
    /// Create a validation error
    pub fn validation(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self::Validation {
            reason,
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a server error from extracted server messages
    pub fn server(status: u16, messages: Vec<String>) -> Self {
        Self::Server { status, messages }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get the reason code, if this is a validation error
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Self::Validation { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check whether this error was raised before any network activity
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::TypeMismatch { .. })
    }
}

// Joins server messages for the Display impl; a bare Vec<String> has none.
struct FormatMessages<'a>(&'a [String]);

impl fmt::Display for FormatMessages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(no server messages)");
        }
        for (i, message) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}
