//! Validation module
//!
//! Checks candidate records and photo uploads against structural,
//! numeric, and referential rules before anything is written. All rules
//! run and their results accumulate; nothing short-circuits, so the user
//! sees every problem at once.

pub mod engine;
pub mod rules;

pub use engine::Validator;

use serde::{Deserialize, Serialize};

/// Outcome of validating a single field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidationResult {
    pub field: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl FieldValidationResult {
    pub fn valid(field: &str) -> Self {
        Self {
            field: field.to_string(),
            is_valid: true,
            error: None,
            warning: None,
        }
    }

    pub fn invalid(field: &str, error: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            is_valid: false,
            error: Some(error.into()),
            warning: None,
        }
    }

    /// Valid, but with a warning the caller should surface
    pub fn valid_with_warning(field: &str, warning: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            is_valid: true,
            error: None,
            warning: Some(warning.into()),
        }
    }
}

/// Aggregate outcome of validating a record or photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataValidationResult {
    pub is_valid: bool,
    pub fields: Vec<FieldValidationResult>,
    pub reference_errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl DataValidationResult {
    /// Assemble the aggregate result.
    ///
    /// `is_valid` holds iff no field failed; in strict mode reference
    /// errors also invalidate. Field warnings are copied into the
    /// top-level warning list so callers can render them in one place.
    pub fn assemble(
        fields: Vec<FieldValidationResult>,
        reference_errors: Vec<String>,
        strict: bool,
    ) -> Self {
        let fields_ok = fields.iter().all(|f| f.is_valid);
        let is_valid = fields_ok && (!strict || reference_errors.is_empty());
        let warnings = fields
            .iter()
            .filter_map(|f| f.warning.clone())
            .collect();

        Self {
            is_valid,
            fields,
            reference_errors,
            warnings,
        }
    }

    /// The error messages of every failed field
    pub fn field_errors(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_valid)
            .filter_map(|f| f.error.as_deref())
            .collect()
    }
}

/// Options controlling a validation pass
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Verify that a referenced photo actually exists in the store
    pub check_references: bool,
    /// Reference problems invalidate the record instead of only
    /// being reported
    pub strict: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_references: false,
            strict: false,
        }
    }
}
