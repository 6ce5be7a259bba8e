//! Overall statistics
//!
//! Headline numbers for the stats dashboard: totals, uniques, date
//! coverage, and how many records carry a photo or a GPS fix.

use super::{mean_measured_size, round1, DateRange, OverallStats};
use crate::database::CatchRecord;
use std::collections::HashSet;

/// Compute the overall view of the record set
pub fn overall_stats(records: &[CatchRecord]) -> OverallStats {
    let total_weight: f64 = records
        .iter()
        .filter_map(|r| r.weight_g)
        .filter(|w| *w > 0.0)
        .sum();

    let unique_locations: HashSet<&str> = records
        .iter()
        .map(|r| r.location.trim())
        .filter(|l| !l.is_empty())
        .collect();
    let unique_species: HashSet<&str> = records
        .iter()
        .map(|r| r.species.trim())
        .filter(|s| !s.is_empty())
        .collect();

    OverallStats {
        total_records: records.len(),
        average_size_cm: mean_measured_size(records.iter().map(|r| r.size_cm)),
        total_weight_g: round1(total_weight),
        unique_locations: unique_locations.len(),
        unique_species: unique_species.len(),
        date_range: date_range(records),
        records_with_photo: records.iter().filter(|r| r.photo_id.is_some()).count(),
        records_with_gps: records
            .iter()
            .filter(|r| r.latitude.is_some() && r.longitude.is_some())
            .count(),
    }
}

fn date_range(records: &[CatchRecord]) -> DateRange {
    let earliest = records.iter().map(|r| r.caught_at).min();
    let latest = records.iter().map(|r| r.caught_at).max();

    let days_covered = match (earliest, latest) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 0,
    };

    DateRange {
        earliest,
        latest,
        days_covered,
    }
}
