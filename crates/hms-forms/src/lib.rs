//! Generic multi-step form pipeline.
//!
//! # Purpose
//! Partitions a validation schema into ordered field groups, validates only
//! the active group before advancing, and validates the whole schema before
//! releasing values for submission. Pure and synchronous: no network, no
//! I/O, no async.
//!
//! # How it fits
//! `hms-client` builds concrete schemas (login, registration, absence,
//! payment, cutoff) on top of these primitives and feeds validated values
//! into its mutations. The stepper never performs the submission side
//! effect itself; it releases values exactly once per successful
//! `submit()` and the caller owns the single network call.
//!
//! # Key invariants
//! - `0 <= current_step < total_steps` at all times.
//! - `next()` advances only when every field of the active step validates.
//! - `submit()` is rejected off the final step, and on the final step only
//!   succeeds when the entire schema validates.
pub mod field;
pub mod rules;
pub mod schema;
pub mod stepper;

pub use field::{FieldId, FieldValue, FileUpload};
pub use rules::Rule;
pub use schema::{FieldSpec, FormError, FormSchema, FormStep, StepPlan};
pub use stepper::{FormErrors, FormStepper, FormValues, SubmitError};
