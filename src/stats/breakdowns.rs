//! Group-by breakdowns
//!
//! Per-species, per-location, and per-weather aggregates. Every view
//! reports the group's share of the whole record set and is sorted by
//! count, busiest group first.

use super::{mean_measured_size, round1, LocationStats, SpeciesStats, WeatherStats};
use crate::database::CatchRecord;
use std::collections::BTreeMap;

/// Per-species aggregates, sorted descending by count
pub fn species_stats(records: &[CatchRecord]) -> Vec<SpeciesStats> {
    let groups = group_indices(records, |r| {
        let name = r.species.trim();
        (!name.is_empty()).then(|| name.to_string())
    });

    let mut stats: Vec<SpeciesStats> = groups
        .into_iter()
        .map(|(species, indices)| {
            let sizes: Vec<f64> = indices
                .iter()
                .filter_map(|&i| records[i].size_cm)
                .collect();
            let total_weight: f64 = indices
                .iter()
                .filter_map(|&i| records[i].weight_g)
                .filter(|w| *w > 0.0)
                .sum();
            let max_size = sizes.iter().copied().fold(0.0, f64::max);
            let min_size = if sizes.is_empty() {
                0.0
            } else {
                sizes.iter().copied().fold(f64::INFINITY, f64::min)
            };

            SpeciesStats {
                species,
                count: indices.len(),
                average_size_cm: mean_measured_size(indices.iter().map(|&i| records[i].size_cm)),
                max_size_cm: max_size,
                min_size_cm: min_size,
                total_weight_g: round1(total_weight),
                percentage: share(indices.len(), records.len()),
            }
        })
        .collect();

    sort_by_count(&mut stats, |s| s.count, |s| s.species.clone());
    stats
}

/// Per-location aggregates, sorted descending by count
pub fn location_stats(records: &[CatchRecord]) -> Vec<LocationStats> {
    let groups = group_indices(records, |r| {
        let name = r.location.trim();
        (!name.is_empty()).then(|| name.to_string())
    });

    let mut stats: Vec<LocationStats> = groups
        .into_iter()
        .map(|(location, indices)| {
            let total_weight: f64 = indices
                .iter()
                .filter_map(|&i| records[i].weight_g)
                .filter(|w| *w > 0.0)
                .sum();

            LocationStats {
                location,
                count: indices.len(),
                average_size_cm: mean_measured_size(indices.iter().map(|&i| records[i].size_cm)),
                total_weight_g: round1(total_weight),
                percentage: share(indices.len(), records.len()),
            }
        })
        .collect();

    sort_by_count(&mut stats, |s| s.count, |s| s.location.clone());
    stats
}

/// Per-weather aggregates; records without a usable weather label are
/// grouped under the literal "unknown". Sorted descending by count.
pub fn weather_stats(records: &[CatchRecord]) -> Vec<WeatherStats> {
    let groups = group_indices(records, |r| {
        Some(
            r.weather
                .as_deref()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .unwrap_or("unknown")
                .to_string(),
        )
    });

    let mut stats: Vec<WeatherStats> = groups
        .into_iter()
        .map(|(weather, indices)| WeatherStats {
            weather,
            count: indices.len(),
            average_size_cm: mean_measured_size(indices.iter().map(|&i| records[i].size_cm)),
            percentage: share(indices.len(), records.len()),
        })
        .collect();

    sort_by_count(&mut stats, |s| s.count, |s| s.weather.clone());
    stats
}

/// Record indices grouped by a key; records the key function declines
/// are skipped.
fn group_indices<F>(records: &[CatchRecord], key: F) -> BTreeMap<String, Vec<usize>>
where
    F: Fn(&CatchRecord) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(idx);
        }
    }

    groups
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

fn sort_by_count<T, C, N>(stats: &mut [T], count: C, name: N)
where
    C: Fn(&T) -> usize,
    N: Fn(&T) -> String,
{
    stats.sort_by(|a, b| count(b).cmp(&count(a)).then_with(|| name(a).cmp(&name(b))));
}
