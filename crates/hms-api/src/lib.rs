//! Shared wire types for the hostel management REST API.
//!
//! # Purpose
//! Everything the client exchanges with the server lives here: the closed
//! role set, the uniform response envelope, the domain records mirrored
//! from the server, and the error taxonomy every API call resolves to.
//!
//! # How it fits
//! `hms-client` builds requests from these types and decodes responses
//! into them. The records are read-only views as far as the client is
//! concerned; derived fields (bill proration, early/late classification)
//! are computed server-side and only carried here.
pub mod envelope;
pub mod errors;
pub mod role;
pub mod types;

pub use envelope::Envelope;
pub use errors::{ApiError, ApiResult, FieldViolation};
pub use role::Role;
pub use types::*;
