//! Size distribution
//!
//! Ten equal-width histogram buckets over the measured sizes plus
//! interpolated percentiles. Only measured sizes (> 0) participate;
//! records without a size, or with the legacy "not measured" zero,
//! are left out entirely.

use super::{round1, Percentiles, SizeBucket, SizeDistribution};
use crate::config;
use crate::database::CatchRecord;

/// Compute the size histogram and percentiles of the record set
pub fn size_distribution(records: &[CatchRecord]) -> SizeDistribution {
    let mut sizes: Vec<f64> = records
        .iter()
        .filter_map(|r| r.size_cm)
        .filter(|s| *s > 0.0)
        .collect();

    if sizes.is_empty() {
        return SizeDistribution {
            ranges: Vec::new(),
            percentiles: Percentiles::default(),
        };
    }

    sizes.sort_by(|a, b| a.total_cmp(b));
    let max = sizes.last().copied().unwrap_or(0.0);

    SizeDistribution {
        ranges: buckets(&sizes, max),
        percentiles: Percentiles {
            p25: percentile(&sizes, 25.0),
            p50: percentile(&sizes, 50.0),
            p75: percentile(&sizes, 75.0),
            p90: percentile(&sizes, 90.0),
            p95: percentile(&sizes, 95.0),
        },
    }
}

/// Equal-width buckets spanning [0, max] with step ceil(max / buckets).
/// Every bucket is half-open except the last, which includes `max` on
/// both ends.
fn buckets(sorted_sizes: &[f64], max: f64) -> Vec<SizeBucket> {
    let bucket_count = config::SIZE_DISTRIBUTION_BUCKETS;
    let step = (max / bucket_count as f64).ceil();

    (0..bucket_count)
        .map(|i| {
            let lo = i as f64 * step;
            let is_last = i == bucket_count - 1;
            let hi = if is_last { max } else { (i + 1) as f64 * step };

            let count = sorted_sizes
                .iter()
                .filter(|&&s| {
                    if is_last {
                        s >= lo && s <= hi
                    } else {
                        s >= lo && s < hi
                    }
                })
                .count();

            SizeBucket {
                min_cm: round1(lo),
                max_cm: round1(hi),
                count,
            }
        })
        .collect()
}

/// Interpolated percentile over a sorted slice: the value at fractional
/// rank (p/100)·(n-1), linearly interpolated between its neighbours.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    let value = sorted[lower] + (sorted[upper] - sorted[lower]) * frac;
    round1(value)
}
