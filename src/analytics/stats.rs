use serde::Serialize;

use crate::generator::Dataset;
use crate::numeric::{self, quantile_sorted, round_opt, sorted_copy};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub p95: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Descriptive statistics over completed trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub fare: FareStats,
    pub distance: DistanceStats,
    pub duration: DurationStats,
    /// Every trip, cancelled included.
    pub total_records: usize,
}

pub fn summary_statistics(dataset: &Dataset) -> SummaryStatistics {
    let fares: Vec<f64> = dataset.completed().map(|t| t.fare).collect();
    let distances: Vec<f64> = dataset.completed().map(|t| t.distance_mi).collect();
    let durations: Vec<u32> = dataset.completed().map(|t| t.duration_min).collect();

    let sorted_fares = sorted_copy(&fares);
    let sorted_distances = sorted_copy(&distances);
    let duration_values: Vec<f64> = durations.iter().map(|&d| d as f64).collect();
    let sorted_durations = sorted_copy(&duration_values);

    SummaryStatistics {
        fare: FareStats {
            min: round_opt(numeric::min(&fares), 2),
            max: round_opt(numeric::max(&fares), 2),
            mean: round_opt(numeric::mean(&fares), 2),
            median: round_opt(quantile_sorted(&sorted_fares, 0.5), 2),
            std: round_opt(numeric::std_dev(&fares), 2),
            p25: round_opt(quantile_sorted(&sorted_fares, 0.25), 2),
            p75: round_opt(quantile_sorted(&sorted_fares, 0.75), 2),
            p95: round_opt(quantile_sorted(&sorted_fares, 0.95), 2),
        },
        distance: DistanceStats {
            min: round_opt(numeric::min(&distances), 2),
            max: round_opt(numeric::max(&distances), 2),
            mean: round_opt(numeric::mean(&distances), 2),
            median: round_opt(quantile_sorted(&sorted_distances, 0.5), 2),
        },
        duration: DurationStats {
            min: durations.iter().copied().min(),
            max: durations.iter().copied().max(),
            mean: round_opt(numeric::mean(&duration_values), 1),
            median: round_opt(quantile_sorted(&sorted_durations, 0.5), 1),
        },
        total_records: dataset.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::four_trips;

    #[test]
    fn test_fixture_statistics() {
        let stats = summary_statistics(&four_trips());
        assert_eq!(stats.total_records, 4);
        assert_eq!(stats.fare.min, Some(20.0));
        assert_eq!(stats.fare.max, Some(40.0));
        assert_eq!(stats.fare.mean, Some(30.0));
        assert_eq!(stats.fare.median, Some(30.0));
        assert_eq!(stats.fare.std, Some(14.14));
        assert_eq!(stats.fare.p25, Some(25.0));
        assert_eq!(stats.fare.p95, Some(39.0));
        assert_eq!(stats.distance.median, Some(9.0));
        assert_eq!(stats.duration.min, Some(18));
        assert_eq!(stats.duration.max, Some(40));
        assert_eq!(stats.duration.mean, Some(29.0));
    }

    #[test]
    fn test_empty_statistics_are_null() {
        let stats = summary_statistics(&Dataset::new(Vec::new()));
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.fare.mean, None);
        assert_eq!(stats.fare.std, None);
        assert_eq!(stats.duration.min, None);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["fare"]["p95"].is_null());
    }
}
