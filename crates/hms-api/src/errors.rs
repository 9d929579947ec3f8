//! Client-side error taxonomy for API calls.
//!
//! # Purpose
//! Every gateway call resolves to exactly one of these categories so views
//! can distinguish "no response" from "rejected credentials" from "your
//! input was bad" without inspecting status codes themselves.
//!
//! # How it fits
//! All five categories are produced by the gateway: `Transport` when no
//! response arrives, the rest from the response's status and envelope.
//! The route guard blocks most forbidden navigation before a request is
//! ever built, so `Forbidden` here means the server disagreed with the
//! client's picture of the session.
//!
//! # Key invariants
//! - Variants are `Clone` so a failed query can be stored on its cache
//!   entry and handed to every coalesced waiter.
//! - `Unauthorized` implies the session store has already been told to
//!   tear the session down.
use thiserror::Error;

/// One field-level validation message from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received at all.
    #[error("transport error: {0}")]
    Transport(String),
    /// Authentication was rejected or has expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated, but the role or capability is insufficient.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// The server rejected the input with field-level detail.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldViolation>,
    },
    /// A 5xx, an unclassified 4xx, or `success:false` on a 2xx.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The human-readable message to surface, preferring what the server
    /// said over a generic fallback.
    pub fn display_message(&self) -> &str {
        match self {
            ApiError::Transport(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message) => message,
            ApiError::Validation { message, .. } => message,
            ApiError::Server { message, .. } => message,
        }
    }
}
