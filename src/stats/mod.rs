//! Statistics module
//!
//! Pure aggregate views computed over an in-memory record set. No I/O,
//! no shared state; every function takes the full input and returns a
//! fresh result, so callers may recompute on every read.
//!
//! Size averages throughout this module exclude zero values even though
//! validation accepts size 0 as input. This asymmetry is a deliberate
//! business rule carried over from the app's history (a zero size means
//! "not measured" in old records) and is covered by regression tests —
//! do not unify it with the validation semantics.

pub mod breakdowns;
pub mod overall;
pub mod size_distribution;
pub mod time_analysis;

pub use breakdowns::{location_stats, species_stats, weather_stats};
pub use overall::overall_stats;
pub use size_distribution::size_distribution;
pub use time_analysis::time_analysis;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Span of catch dates in the record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    /// Calendar days touched by the range: zero for an empty set, at
    /// least one otherwise.
    pub days_covered: i64,
}

/// Headline numbers over the whole record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_records: usize,
    pub average_size_cm: f64,
    pub total_weight_g: f64,
    pub unique_locations: usize,
    pub unique_species: usize,
    pub date_range: DateRange,
    pub records_with_photo: usize,
    pub records_with_gps: usize,
}

/// One (year, month) bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub average_size_cm: f64,
    pub total_weight_g: f64,
    /// Distinct species seen this month, sorted
    pub species: Vec<String>,
    /// Distinct locations fished this month, sorted
    pub locations: Vec<String>,
}

/// Catch counts per season
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonBreakdown {
    pub spring: usize,
    pub summer: usize,
    pub autumn: usize,
    pub winter: usize,
}

/// One entry of the year-over-year trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTrend {
    pub year: i32,
    pub count: usize,
    pub average_size_cm: f64,
}

/// Time-bucketed view of the record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAnalysis {
    pub monthly: Vec<MonthlyStats>,
    pub seasons: SeasonBreakdown,
    pub yearly: Vec<YearlyTrend>,
}

/// One equal-width size bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeBucket {
    pub min_cm: f64,
    pub max_cm: f64,
    pub count: usize,
}

/// Interpolated order-statistic percentiles of catch sizes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// Histogram plus percentiles of catch sizes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeDistribution {
    pub ranges: Vec<SizeBucket>,
    pub percentiles: Percentiles,
}

/// Per-species aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesStats {
    pub species: String,
    pub count: usize,
    pub average_size_cm: f64,
    pub max_size_cm: f64,
    pub min_size_cm: f64,
    pub total_weight_g: f64,
    /// Share of all records, in percent
    pub percentage: f64,
}

/// Per-location aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationStats {
    pub location: String,
    pub count: usize,
    pub average_size_cm: f64,
    pub total_weight_g: f64,
    pub percentage: f64,
}

/// Per-weather-condition aggregate; blank conditions group as "unknown"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherStats {
    pub weather: String,
    pub count: usize,
    pub average_size_cm: f64,
    pub percentage: f64,
}

/// Round to one decimal place, the precision every derived figure is
/// reported at.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean of the measured (> 0) sizes in an iterator, zero if none
pub(crate) fn mean_measured_size<I>(sizes: I) -> f64
where
    I: Iterator<Item = Option<f64>>,
{
    let measured: Vec<f64> = sizes.flatten().filter(|s| *s > 0.0).collect();
    if measured.is_empty() {
        return 0.0;
    }
    round1(measured.iter().sum::<f64>() / measured.len() as f64)
}
