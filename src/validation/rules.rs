//! Field-level validation rules
//!
//! Pure functions, one per rule family. Each takes the candidate value
//! and returns per-field results; the engine composes them. String
//! lengths are measured in grapheme clusters, never code units, so a
//! family emoji or a combined kana sequence counts as what the user
//! sees.

use super::FieldValidationResult;
use crate::config;
use chrono::{DateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

/// User-perceived length of a string
pub fn grapheme_len(value: &str) -> usize {
    value.graphemes(true).count()
}

/// A required free-text field: must be present, non-blank after trim,
/// and within the length limit.
pub fn required_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> FieldValidationResult {
    match value {
        None => FieldValidationResult::invalid(field, format!("{} is required", field)),
        Some(s) if s.trim().is_empty() => {
            FieldValidationResult::invalid(field, format!("{} must not be blank", field))
        }
        Some(s) => text_length(field, s, max_len),
    }
}

/// An optional free-text field: blank is fine, length is still enforced.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> FieldValidationResult {
    match value {
        None => FieldValidationResult::valid(field),
        Some(s) => text_length(field, s, max_len),
    }
}

fn text_length(field: &str, value: &str, max_len: usize) -> FieldValidationResult {
    let len = grapheme_len(value);
    if len > max_len {
        FieldValidationResult::invalid(
            field,
            format!("{} exceeds {} characters ({})", field, max_len, len),
        )
    } else {
        FieldValidationResult::valid(field)
    }
}

/// The catch date: required; a date after `now` is suspicious but legal,
/// so it warns instead of failing.
pub fn catch_date(value: Option<DateTime<Utc>>, now: DateTime<Utc>) -> FieldValidationResult {
    match value {
        None => FieldValidationResult::invalid("caught_at", "caught_at is required"),
        Some(date) if date > now => {
            FieldValidationResult::valid_with_warning("caught_at", "date is in the future")
        }
        Some(_) => FieldValidationResult::valid("caught_at"),
    }
}

/// A bounded numeric field. Absent is valid; present values must be
/// finite (NaN and infinities fail) and inside `[min, max]` inclusive.
/// A present zero is valid.
pub fn bounded_number(
    field: &str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> FieldValidationResult {
    let v = match value {
        None => return FieldValidationResult::valid(field),
        Some(v) => v,
    };

    if !v.is_finite() {
        return FieldValidationResult::invalid(field, format!("{} must be a finite number", field));
    }
    if v < min || v > max {
        return FieldValidationResult::invalid(
            field,
            format!("{} must be between {} and {}", field, min, max),
        );
    }

    FieldValidationResult::valid(field)
}

/// Water temperature: hard-bounded like any numeric field, with an
/// extra warning band for readings that are legal but unusual.
pub fn water_temperature(value: Option<f64>) -> FieldValidationResult {
    let result = bounded_number(
        "water_temp_c",
        value,
        config::MIN_WATER_TEMP_C,
        config::MAX_WATER_TEMP_C,
    );
    if !result.is_valid {
        return result;
    }

    match value {
        Some(v) if v < config::TYPICAL_WATER_TEMP_MIN_C || v > config::TYPICAL_WATER_TEMP_MAX_C => {
            FieldValidationResult::valid_with_warning(
                "water_temp_c",
                "water temperature is outside the typical range",
            )
        }
        _ => result,
    }
}

/// GPS fix validation.
///
/// Both components must be present together, finite, and within the
/// global ranges (boundary values are valid). Accuracy, if given, must
/// be non-negative. A valid fix outside the expected fishing region
/// produces a warning on the synthetic "coordinates" field.
pub fn coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
    accuracy: Option<f64>,
) -> Vec<FieldValidationResult> {
    let mut results = Vec::new();

    if latitude.is_none() && longitude.is_none() {
        if accuracy.is_some() {
            results.push(FieldValidationResult::invalid(
                "gps_accuracy",
                "gps_accuracy requires a coordinate",
            ));
        }
        return results;
    }

    let lat = component("latitude", latitude, -90.0, 90.0);
    let lon = component("longitude", longitude, -180.0, 180.0);
    let fix_ok = lat.is_valid && lon.is_valid && latitude.is_some() && longitude.is_some();
    results.push(lat);
    results.push(lon);

    if let Some(acc) = accuracy {
        if !acc.is_finite() || acc < 0.0 {
            results.push(FieldValidationResult::invalid(
                "gps_accuracy",
                "gps_accuracy must be a non-negative number",
            ));
        } else {
            results.push(FieldValidationResult::valid("gps_accuracy"));
        }
    }

    if fix_ok {
        let (lat_v, lon_v) = (latitude.unwrap_or_default(), longitude.unwrap_or_default());
        let in_region = (config::REGION_LAT_MIN..=config::REGION_LAT_MAX).contains(&lat_v)
            && (config::REGION_LON_MIN..=config::REGION_LON_MAX).contains(&lon_v);
        if !in_region {
            results.push(FieldValidationResult::valid_with_warning(
                "coordinates",
                "coordinates are outside the expected region",
            ));
        }
    }

    results
}

fn component(field: &str, value: Option<f64>, min: f64, max: f64) -> FieldValidationResult {
    match value {
        None => FieldValidationResult::invalid(
            field,
            format!("{} is required when the other coordinate is set", field),
        ),
        Some(v) if !v.is_finite() => {
            FieldValidationResult::invalid(field, format!("{} must be a finite number", field))
        }
        Some(v) if v < min || v > max => FieldValidationResult::invalid(
            field,
            format!("{} must be between {} and {}", field, min, max),
        ),
        Some(_) => FieldValidationResult::valid(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_absent_and_blank() {
        assert!(!required_text("location", None, 100).is_valid);
        assert!(!required_text("location", Some("   "), 100).is_valid);
        assert!(required_text("location", Some("Pier 7"), 100).is_valid);
    }

    #[test]
    fn test_grapheme_length_counts_user_perceived_characters() {
        // Family emoji is a single grapheme built from multiple scalars
        let family = "👨‍👩‍👧‍👦";
        assert_eq!(grapheme_len(family), 1);

        // 100 emoji are exactly at the limit, 101 are over it
        let at_limit = family.repeat(100);
        let over_limit = family.repeat(101);
        assert!(required_text("location", Some(&at_limit), 100).is_valid);
        assert!(!required_text("location", Some(&over_limit), 100).is_valid);
    }

    #[test]
    fn test_cjk_text_counts_per_character() {
        let species = "真鯛".repeat(50); // 100 characters
        assert!(required_text("species", Some(&species), 100).is_valid);

        let too_long = "真鯛".repeat(51);
        assert!(!required_text("species", Some(&too_long), 100).is_valid);
    }

    #[test]
    fn test_optional_text_accepts_absence() {
        assert!(optional_text("notes", None, 500).is_valid);
        assert!(optional_text("notes", Some("short note"), 500).is_valid);
        let long = "a".repeat(501);
        assert!(!optional_text("notes", Some(&long), 500).is_valid);
    }

    #[test]
    fn test_catch_date_future_warns_but_stays_valid() {
        let now = Utc::now();

        let future = catch_date(Some(now + chrono::Duration::days(1)), now);
        assert!(future.is_valid);
        assert_eq!(future.warning.as_deref(), Some("date is in the future"));

        let past = catch_date(Some(now - chrono::Duration::days(1)), now);
        assert!(past.is_valid);
        assert!(past.warning.is_none());

        assert!(!catch_date(None, now).is_valid);
    }

    #[test]
    fn test_bounded_number_boundaries_inclusive() {
        assert!(bounded_number("size_cm", Some(0.0), 0.0, 999.0).is_valid);
        assert!(bounded_number("size_cm", Some(999.0), 0.0, 999.0).is_valid);
        assert!(!bounded_number("size_cm", Some(-1.0), 0.0, 999.0).is_valid);
        assert!(!bounded_number("size_cm", Some(1000.0), 0.0, 999.0).is_valid);
    }

    #[test]
    fn test_bounded_number_rejects_nan_and_infinity() {
        assert!(!bounded_number("weight_g", Some(f64::NAN), 0.0, 99_999.0).is_valid);
        assert!(!bounded_number("weight_g", Some(f64::INFINITY), 0.0, 99_999.0).is_valid);
        assert!(!bounded_number("weight_g", Some(f64::NEG_INFINITY), 0.0, 99_999.0).is_valid);
    }

    #[test]
    fn test_absent_optional_number_is_valid() {
        assert!(bounded_number("weight_g", None, 0.0, 99_999.0).is_valid);
    }

    #[test]
    fn test_water_temperature_warning_band() {
        let cold = water_temperature(Some(3.0));
        assert!(cold.is_valid);
        assert!(cold.warning.is_some());

        let hot = water_temperature(Some(40.0));
        assert!(hot.is_valid);
        assert!(hot.warning.is_some());

        let normal = water_temperature(Some(18.0));
        assert!(normal.is_valid);
        assert!(normal.warning.is_none());

        assert!(!water_temperature(Some(55.0)).is_valid);
        assert!(!water_temperature(Some(f64::NAN)).is_valid);
    }

    #[test]
    fn test_coordinates_boundary_values_valid() {
        let results = coordinates(Some(90.0), Some(-180.0), None);
        assert!(results.iter().all(|r| r.is_valid));
    }

    #[test]
    fn test_coordinates_out_of_range_invalid() {
        let results = coordinates(Some(90.5), Some(0.0), None);
        assert!(results.iter().any(|r| r.field == "latitude" && !r.is_valid));

        let results = coordinates(Some(0.0), Some(-180.5), None);
        assert!(results.iter().any(|r| r.field == "longitude" && !r.is_valid));
    }

    #[test]
    fn test_lone_coordinate_component_invalid() {
        let results = coordinates(Some(35.0), None, None);
        assert!(results.iter().any(|r| r.field == "longitude" && !r.is_valid));
    }

    #[test]
    fn test_negative_accuracy_invalid() {
        let results = coordinates(Some(35.0), Some(139.0), Some(-1.0));
        assert!(results
            .iter()
            .any(|r| r.field == "gps_accuracy" && !r.is_valid));
    }

    #[test]
    fn test_fix_outside_region_warns_only() {
        // Valid fix, but nowhere near the home waters
        let results = coordinates(Some(-33.8), Some(151.2), None);
        assert!(results
            .iter()
            .filter(|r| r.field != "coordinates")
            .all(|r| r.is_valid));
        assert!(results
            .iter()
            .any(|r| r.field == "coordinates" && r.warning.is_some()));
    }

    #[test]
    fn test_fix_inside_region_has_no_warning() {
        let results = coordinates(Some(35.3), Some(139.6), Some(10.0));
        assert!(results.iter().all(|r| r.is_valid && r.warning.is_none()));
    }

    #[test]
    fn test_no_coordinates_at_all_is_valid() {
        assert!(coordinates(None, None, None).is_empty());
    }

    #[test]
    fn test_accuracy_without_fix_invalid() {
        let results = coordinates(None, None, Some(5.0));
        assert!(results
            .iter()
            .any(|r| r.field == "gps_accuracy" && !r.is_valid));
    }
}
