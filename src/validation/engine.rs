//! Validation engine
//!
//! Composes the field rules over a candidate record and adds the
//! reference-integrity check against the record store. The only side
//! effect in this module is the single photo-existence read.

use super::rules;
use super::{DataValidationResult, FieldValidationResult, ValidationOptions};
use crate::config;
use crate::database::{PhotoUpload, RecordDraft, Repository};
use chrono::Utc;

/// Validates candidate records and photo uploads
#[derive(Clone)]
pub struct Validator {
    repo: Repository,
}

impl Validator {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Validate a candidate record.
    ///
    /// Every rule runs; the result accumulates all errors and warnings.
    /// With `check_references` set, a referenced photo is looked up in
    /// the store. A storage failure during that lookup is reported as
    /// "could not be verified" rather than silently passing — distinct
    /// from the photo simply being missing.
    pub async fn validate_record(
        &self,
        draft: &RecordDraft,
        options: ValidationOptions,
    ) -> DataValidationResult {
        let mut fields = Vec::new();

        fields.push(rules::catch_date(draft.caught_at, Utc::now()));
        fields.push(rules::required_text(
            "location",
            draft.location.as_deref(),
            config::MAX_LOCATION_LEN,
        ));
        fields.push(rules::required_text(
            "species",
            draft.species.as_deref(),
            config::MAX_SPECIES_LEN,
        ));
        fields.push(rules::bounded_number(
            "size_cm",
            draft.size_cm,
            config::MIN_SIZE_CM,
            config::MAX_SIZE_CM,
        ));
        fields.push(rules::bounded_number(
            "weight_g",
            draft.weight_g,
            config::MIN_WEIGHT_G,
            config::MAX_WEIGHT_G,
        ));
        fields.push(rules::water_temperature(draft.water_temp_c));
        fields.extend(rules::coordinates(
            draft.latitude,
            draft.longitude,
            draft.gps_accuracy,
        ));
        fields.push(rules::optional_text(
            "notes",
            draft.notes.as_deref(),
            config::MAX_NOTES_LEN,
        ));

        let mut reference_errors = Vec::new();
        if options.check_references {
            if let Some(photo_id) = draft.photo_id.as_deref() {
                match self.repo.find_photo(photo_id).await {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        reference_errors
                            .push(format!("Referenced photo not found: {}", photo_id));
                    }
                    Err(e) => {
                        tracing::warn!("Photo reference check failed for {}: {}", photo_id, e);
                        reference_errors.push(format!(
                            "Photo reference could not be verified: {}",
                            photo_id
                        ));
                    }
                }
            }
        }

        DataValidationResult::assemble(fields, reference_errors, options.strict)
    }

    /// Validate a candidate photo upload
    pub fn validate_photo(&self, upload: &PhotoUpload) -> DataValidationResult {
        validate_photo_upload(upload)
    }
}

/// Photo upload rules: bytes must be present, within the size cap, and
/// of an accepted image type. Sizes above the warning threshold are
/// accepted but flagged.
pub fn validate_photo_upload(upload: &PhotoUpload) -> DataValidationResult {
    let mut fields = Vec::new();

    if upload.data.is_empty() {
        fields.push(FieldValidationResult::invalid("data", "photo data is empty"));
    } else if upload.data.len() > config::MAX_PHOTO_BYTES {
        fields.push(FieldValidationResult::invalid(
            "data",
            format!(
                "photo exceeds the maximum size of {} bytes",
                config::MAX_PHOTO_BYTES
            ),
        ));
    } else if upload.data.len() > config::LARGE_PHOTO_BYTES {
        fields.push(FieldValidationResult::valid_with_warning(
            "data",
            "photo is large and may be slow to load",
        ));
    } else {
        fields.push(FieldValidationResult::valid("data"));
    }

    if config::ALLOWED_PHOTO_MIME_TYPES.contains(&upload.mime_type.as_str()) {
        fields.push(FieldValidationResult::valid("mime_type"));
    } else {
        fields.push(FieldValidationResult::invalid(
            "mime_type",
            format!("unsupported photo type: {}", upload.mime_type),
        ));
    }

    DataValidationResult::assemble(fields, Vec::new(), false)
}
