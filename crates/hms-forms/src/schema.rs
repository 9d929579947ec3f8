//! Form schemas and step plans.
//!
//! # Purpose
//! A `FormSchema` declares every field and its rules; a `StepPlan`
//! partitions those fields into the ordered groups a stepper walks
//! through. Construction validates the partition up front so the state
//! machine never has to handle a field that belongs to no step, or to two.
use crate::field::FieldId;
use crate::rules::Rule;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("duplicate field in schema: {0}")]
    DuplicateField(FieldId),
    #[error("step plan references unknown field: {0}")]
    UnknownField(FieldId),
    #[error("field assigned to more than one step: {0}")]
    FieldRepeated(FieldId),
    #[error("field not assigned to any step: {0}")]
    UnassignedField(FieldId),
    #[error("step plan has no steps")]
    EmptyPlan,
}

/// One field: identifier, display label, and the rules it must satisfy.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: String,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(id: impl Into<FieldId>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules,
        }
    }
}

/// The full set of fields a form validates.
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, FormError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.id.clone()) {
                return Err(FormError::DuplicateField(field.id.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn field(&self, id: &FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| &field.id == id)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// One ordered group of fields within a stepper.
#[derive(Debug, Clone)]
pub struct FormStep {
    pub title: String,
    pub fields: Vec<FieldId>,
}

impl FormStep {
    pub fn new(title: impl Into<String>, fields: Vec<FieldId>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// An ordered, exact partition of a schema's fields into steps.
#[derive(Debug, Clone)]
pub struct StepPlan {
    steps: Vec<FormStep>,
}

impl StepPlan {
    /// Build a plan, verifying every schema field appears in exactly one
    /// step and no step names a field the schema lacks.
    pub fn new(schema: &FormSchema, steps: Vec<FormStep>) -> Result<Self, FormError> {
        if steps.is_empty() {
            return Err(FormError::EmptyPlan);
        }
        let mut assigned = HashSet::new();
        for step in &steps {
            for id in &step.fields {
                if schema.field(id).is_none() {
                    return Err(FormError::UnknownField(id.clone()));
                }
                if !assigned.insert(id.clone()) {
                    return Err(FormError::FieldRepeated(id.clone()));
                }
            }
        }
        for field in schema.fields() {
            if !assigned.contains(&field.id) {
                return Err(FormError::UnassignedField(field.id.clone()));
            }
        }
        Ok(Self { steps })
    }

    /// A plan with every field in one unnamed step, for single-page forms.
    pub fn single_step(schema: &FormSchema) -> Self {
        let fields = schema.fields().iter().map(|field| field.id.clone()).collect();
        Self {
            steps: vec![FormStep::new("", fields)],
        }
    }

    pub fn steps(&self) -> &[FormStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
