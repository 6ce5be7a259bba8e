//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Record Field Limits =====

/// Maximum length of the location field in grapheme clusters
pub const MAX_LOCATION_LEN: usize = 100;

/// Maximum length of the species field in grapheme clusters
pub const MAX_SPECIES_LEN: usize = 100;

/// Maximum length of the notes field in grapheme clusters
pub const MAX_NOTES_LEN: usize = 500;

/// Valid size range for a catch in centimetres (inclusive)
pub const MIN_SIZE_CM: f64 = 0.0;
pub const MAX_SIZE_CM: f64 = 999.0;

/// Valid weight range in grams (inclusive)
pub const MIN_WEIGHT_G: f64 = 0.0;
pub const MAX_WEIGHT_G: f64 = 99_999.0;

/// Valid water temperature range in degrees Celsius (inclusive)
pub const MIN_WATER_TEMP_C: f64 = 0.0;
pub const MAX_WATER_TEMP_C: f64 = 50.0;

/// Water temperatures outside this band are legal but unusual enough
/// to warn the user about (likely a typo or a sensor glitch).
pub const TYPICAL_WATER_TEMP_MIN_C: f64 = 5.0;
pub const TYPICAL_WATER_TEMP_MAX_C: f64 = 35.0;

// ===== Expected Fishing Region =====

/// Bounding box for the waters this app is normally used in.
/// A GPS fix outside this box is valid but produces a warning so the
/// user can catch swapped or mistyped coordinates.
pub const REGION_LAT_MIN: f64 = 20.0;
pub const REGION_LAT_MAX: f64 = 46.0;
pub const REGION_LON_MIN: f64 = 122.0;
pub const REGION_LON_MAX: f64 = 154.0;

// ===== Photo Limits =====

/// Hard upper limit for an uploaded photo in bytes (10 MiB)
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Photos larger than this (5 MiB) are accepted with a warning
pub const LARGE_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted photo MIME types
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// ===== Data Versioning =====

/// Settings key under which the serialized data version is persisted
pub const DATA_VERSION_KEY: &str = "data_version";

/// Schema version the engine currently targets. Bumped whenever a new
/// migration is added to the catalog.
pub const CURRENT_SCHEMA_VERSION: i64 = 3;

// ===== Statistics =====

/// Number of equal-width buckets in the size distribution
pub const SIZE_DISTRIBUTION_BUCKETS: usize = 10;
