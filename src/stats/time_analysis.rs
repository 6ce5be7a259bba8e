//! Time-bucketed statistics
//!
//! Groups the record set by calendar month, season, and year. Months
//! and years come out sorted ascending; seasons are fixed buckets with
//! winter wrapping the year end (December through February).

use super::{mean_measured_size, round1, MonthlyStats, SeasonBreakdown, TimeAnalysis, YearlyTrend};
use crate::database::CatchRecord;
use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};

/// Compute monthly, seasonal, and yearly views of the record set
pub fn time_analysis(records: &[CatchRecord]) -> TimeAnalysis {
    TimeAnalysis {
        monthly: monthly_buckets(records),
        seasons: season_breakdown(records),
        yearly: yearly_trend(records),
    }
}

struct MonthAccumulator {
    records: Vec<usize>,
    species: BTreeSet<String>,
    locations: BTreeSet<String>,
}

fn monthly_buckets(records: &[CatchRecord]) -> Vec<MonthlyStats> {
    let mut buckets: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = (record.caught_at.year(), record.caught_at.month());
        let acc = buckets.entry(key).or_insert_with(|| MonthAccumulator {
            records: Vec::new(),
            species: BTreeSet::new(),
            locations: BTreeSet::new(),
        });
        acc.records.push(idx);
        acc.species.insert(record.species.trim().to_string());
        acc.locations.insert(record.location.trim().to_string());
    }

    // BTreeMap iteration gives ascending (year, month) for free
    buckets
        .into_iter()
        .map(|((year, month), acc)| {
            let total_weight: f64 = acc
                .records
                .iter()
                .filter_map(|&i| records[i].weight_g)
                .filter(|w| *w > 0.0)
                .sum();

            MonthlyStats {
                year,
                month,
                count: acc.records.len(),
                average_size_cm: mean_measured_size(
                    acc.records.iter().map(|&i| records[i].size_cm),
                ),
                total_weight_g: round1(total_weight),
                species: acc.species.into_iter().collect(),
                locations: acc.locations.into_iter().collect(),
            }
        })
        .collect()
}

/// Season of a calendar month: spring is March through May, summer June
/// through August, autumn September through November, winter the rest.
fn season_of(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

fn season_breakdown(records: &[CatchRecord]) -> SeasonBreakdown {
    let mut seasons = SeasonBreakdown::default();

    for record in records {
        match season_of(record.caught_at.month()) {
            Season::Spring => seasons.spring += 1,
            Season::Summer => seasons.summer += 1,
            Season::Autumn => seasons.autumn += 1,
            Season::Winter => seasons.winter += 1,
        }
    }

    seasons
}

fn yearly_trend(records: &[CatchRecord]) -> Vec<YearlyTrend> {
    let mut years: BTreeMap<i32, Vec<usize>> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        years.entry(record.caught_at.year()).or_default().push(idx);
    }

    years
        .into_iter()
        .map(|(year, indices)| YearlyTrend {
            year,
            count: indices.len(),
            average_size_cm: mean_measured_size(indices.iter().map(|&i| records[i].size_cm)),
        })
        .collect()
}
