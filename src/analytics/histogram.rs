use serde::Serialize;

use crate::generator::Dataset;
use crate::numeric::{percent, round_to};

pub const FARE_EDGES: [f64; 9] = [0.0, 10.0, 15.0, 20.0, 25.0, 35.0, 50.0, 75.0, 200.0];
pub const FARE_LABELS: [&str; 8] = [
    "$0-10", "$10-15", "$15-20", "$20-25", "$25-35", "$35-50", "$50-75", "$75+",
];

/// Upper edge sits just above 5.0 so perfect ratings land in the last bin.
pub const RATING_EDGES: [f64; 9] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.01];
pub const RATING_LABELS: [&str; 8] = ["1.0", "1.5", "2.0", "2.5", "3.0", "3.5", "4.0", "4.5+"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareDistribution {
    pub buckets: Vec<&'static str>,
    pub counts: Vec<usize>,
    pub pct: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub buckets: Vec<&'static str>,
    pub counts: Vec<usize>,
}

/// Bin index for `value` under half-open `[edges[i], edges[i + 1])` bins.
///
/// With `open_top` the last bin also takes everything at or above its lower
/// edge. Values below the first edge, or past the last edge without
/// `open_top`, fall outside every bin.
pub(crate) fn bin_index(edges: &[f64], value: f64, open_top: bool) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if bins == 0 || value.is_nan() || value < edges[0] {
        return None;
    }
    let idx = edges.partition_point(|edge| *edge <= value).saturating_sub(1);
    if idx < bins {
        Some(idx)
    } else if open_top {
        Some(bins - 1)
    } else {
        None
    }
}

fn histogram(edges: &[f64], values: impl Iterator<Item = f64>, open_top: bool) -> Vec<usize> {
    let mut counts = vec![0usize; edges.len().saturating_sub(1)];
    for value in values {
        if let Some(idx) = bin_index(edges, value, open_top) {
            counts[idx] += 1;
        }
    }
    counts
}

/// Completed-trip fares. The top bucket is open-ended so every fare is counted.
pub fn fare_distribution(dataset: &Dataset) -> FareDistribution {
    let counts = histogram(&FARE_EDGES, dataset.completed().map(|t| t.fare), true);
    let total: usize = counts.iter().sum();
    FareDistribution {
        buckets: FARE_LABELS.to_vec(),
        pct: counts
            .iter()
            .map(|&c| round_to(percent(c, total), 1))
            .collect(),
        counts,
    }
}

/// Completed-trip ratings; trips without a rating are skipped.
pub fn rating_distribution(dataset: &Dataset) -> RatingDistribution {
    let ratings = dataset.completed().filter_map(|t| t.rating);
    RatingDistribution {
        buckets: RATING_LABELS.to_vec(),
        counts: histogram(&RATING_EDGES, ratings, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::four_trips;
    use crate::generator::{GeneratorConfig, TripGenerator};

    #[test]
    fn test_bin_index_edges() {
        assert_eq!(bin_index(&FARE_EDGES, 0.0, false), Some(0));
        assert_eq!(bin_index(&FARE_EDGES, 9.99, false), Some(0));
        assert_eq!(bin_index(&FARE_EDGES, 10.0, false), Some(1));
        assert_eq!(bin_index(&FARE_EDGES, 199.0, false), Some(7));
        assert_eq!(bin_index(&FARE_EDGES, 250.0, false), None);
        assert_eq!(bin_index(&FARE_EDGES, 250.0, true), Some(7));
        assert_eq!(bin_index(&FARE_EDGES, -1.0, true), None);
        assert_eq!(bin_index(&RATING_EDGES, 5.0, false), Some(7));
        assert_eq!(bin_index(&RATING_EDGES, 4.5, false), Some(7));
        assert_eq!(bin_index(&RATING_EDGES, 4.4, false), Some(6));
        assert_eq!(bin_index(&RATING_EDGES, 1.0, false), Some(0));
    }

    #[test]
    fn test_fixture_histograms() {
        let dataset = four_trips();
        let fares = fare_distribution(&dataset);
        assert_eq!(fares.counts, vec![0, 0, 0, 1, 0, 1, 0, 0]);
        assert_eq!(fares.pct, vec![0.0, 0.0, 0.0, 50.0, 0.0, 50.0, 0.0, 0.0]);

        let ratings = rating_distribution(&dataset);
        assert_eq!(ratings.counts, vec![0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_counts_cover_every_completed_trip() {
        let generator = TripGenerator::new(GeneratorConfig {
            record_count: 5_000,
            seed: 42,
        })
        .unwrap();
        let dataset = Dataset::new(generator.generate());
        let completed = dataset.completed().count();

        let fares = fare_distribution(&dataset);
        assert_eq!(fares.counts.iter().sum::<usize>(), completed);
        let pct_total: f64 = fares.pct.iter().sum();
        assert!((pct_total - 100.0).abs() < 0.5);

        let ratings = rating_distribution(&dataset);
        assert_eq!(ratings.counts.iter().sum::<usize>(), completed);
    }

    #[test]
    fn test_empty_dataset_histograms() {
        let dataset = Dataset::new(Vec::new());
        let fares = fare_distribution(&dataset);
        assert!(fares.counts.iter().all(|&c| c == 0));
        assert!(fares.pct.iter().all(|&p| p == 0.0));
        assert_eq!(rating_distribution(&dataset).counts, vec![0; 8]);
    }
}
