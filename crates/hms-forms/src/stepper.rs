//! The multi-step form state machine.
//!
//! # Purpose
//! Tracks entered values, the active step index, and recorded field
//! errors. Advancing requires the active step to validate; submission
//! requires the final step to be active and the whole schema to validate.
//!
//! # Key invariants
//! - `0 <= current_step < total_steps` always holds; `prev()` saturates at
//!   zero and `next()` never moves past the last step.
//! - A failed `next()` or `submit()` leaves values untouched, so user
//!   input is never lost to a validation failure.
//! - `submit()` releases values only from the final step with a fully
//!   valid schema; the caller owns the single submission side effect.
use crate::field::{FieldId, FieldValue, FileUpload};
use crate::schema::{FormSchema, StepPlan};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Field-keyed validation messages, ordered deterministically.
pub type FormErrors = BTreeMap<FieldId, String>;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// `submit()` is only reachable from the last step.
    #[error("submit attempted from step {current} of {total}")]
    NotOnFinalStep { current: usize, total: usize },
    /// The full schema failed validation; no side effect may run.
    #[error("form has {} invalid field(s)", errors.len())]
    Invalid { errors: FormErrors },
}

/// Validated values released by a successful `submit()`.
#[derive(Debug, Clone)]
pub struct FormValues {
    values: HashMap<FieldId, FieldValue>,
}

impl FormValues {
    pub fn text(&self, id: &FieldId) -> Option<&str> {
        self.values.get(id).and_then(FieldValue::as_text)
    }

    pub fn file(&self, id: &FieldId) -> Option<&FileUpload> {
        self.values.get(id).and_then(FieldValue::as_file)
    }
}

#[derive(Debug)]
pub struct FormStepper {
    schema: FormSchema,
    plan: StepPlan,
    values: HashMap<FieldId, FieldValue>,
    errors: FormErrors,
    current_step: usize,
}

impl FormStepper {
    pub fn new(schema: FormSchema, plan: StepPlan) -> Self {
        Self {
            schema,
            plan,
            values: HashMap::new(),
            errors: BTreeMap::new(),
            current_step: 0,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.plan.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.plan.len()
    }

    pub fn step_title(&self) -> &str {
        &self.plan.steps()[self.current_step].title
    }

    /// Errors recorded by the most recent failed `next()` or `submit()`.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn value(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Record a text value. Re-assigning a field clears its recorded error
    /// so the user sees feedback only for the latest input.
    pub fn set_text(&mut self, id: impl Into<FieldId>, value: impl Into<String>) {
        let id = id.into();
        self.errors.remove(&id);
        self.values.insert(id, FieldValue::text(value));
    }

    /// Attach a file to a file-bearing field.
    pub fn set_file(&mut self, id: impl Into<FieldId>, upload: FileUpload) {
        let id = id.into();
        self.errors.remove(&id);
        self.values.insert(id, FieldValue::File(upload));
    }

    pub fn clear_value(&mut self, id: &FieldId) {
        self.errors.remove(id);
        self.values.remove(id);
    }

    /// Validate only the fields assigned to the given step.
    pub fn validate_step(&self, index: usize) -> Result<(), FormErrors> {
        let Some(step) = self.plan.steps().get(index) else {
            return Ok(());
        };
        let mut errors = FormErrors::new();
        for id in &step.fields {
            if let Some(message) = self.first_violation(id) {
                errors.insert(id.clone(), message);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Advance to the next step if the active one validates. On failure the
    /// index stays put and the field errors are recorded and returned.
    pub fn next(&mut self) -> Result<(), FormErrors> {
        match self.validate_step(self.current_step) {
            Ok(()) => {
                if self.current_step + 1 < self.plan.len() {
                    self.current_step += 1;
                }
                self.errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Step back without re-validating; saturates at the first step.
    pub fn prev(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Validate the entire schema and release the values for submission.
    pub fn submit(&mut self) -> Result<FormValues, SubmitError> {
        if !self.is_last_step() {
            return Err(SubmitError::NotOnFinalStep {
                current: self.current_step,
                total: self.plan.len(),
            });
        }
        let mut errors = FormErrors::new();
        for field in self.schema.fields() {
            if let Some(message) = self.first_violation(&field.id) {
                errors.insert(field.id.clone(), message);
            }
        }
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitError::Invalid { errors });
        }
        self.errors.clear();
        Ok(FormValues {
            values: self.values.clone(),
        })
    }

    // First failing rule wins; later rules for the field are not reported.
    fn first_violation(&self, id: &FieldId) -> Option<String> {
        let spec = self.schema.field(id)?;
        let value = self.values.get(id);
        for rule in &spec.rules {
            if let Err(message) = rule.check(&spec.label, value) {
                return Some(message);
            }
        }
        None
    }
}
