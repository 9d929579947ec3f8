//! The uniform response wrapper every endpoint returns.
//!
//! # Purpose
//! The server wraps every response body as
//! `{success, message?, data?, timestamp}`. Decoding happens in the
//! gateway; this type only carries the shape.
//!
//! # Key invariants
//! - `success: false` must be treated like a server error even when the
//!   transport status was 2xx.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "default_none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: String,
}

fn default_none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// The server-provided message, or a caller-supplied fallback.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
