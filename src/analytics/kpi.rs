use serde::Serialize;

use crate::generator::Dataset;
use crate::numeric::{mean, percent, round_opt, round_to};

/// Headline numbers for the dashboard.
///
/// `total_trips` and `cancel_rate` cover every trip; the money, distance,
/// rating, duration and surge figures cover completed trips only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_trips: usize,
    pub total_revenue: f64,
    pub avg_fare: Option<f64>,
    pub avg_distance: Option<f64>,
    pub cancel_rate: f64,
    pub avg_rating: Option<f64>,
    pub avg_duration: Option<f64>,
    pub surge_pct: f64,
}

pub fn kpi_summary(dataset: &Dataset) -> KpiSummary {
    let total_trips = dataset.len();
    let cancelled = dataset.trips().iter().filter(|t| t.cancelled).count();

    let mut fares = Vec::with_capacity(total_trips);
    let mut distances = Vec::with_capacity(total_trips);
    let mut durations = Vec::with_capacity(total_trips);
    let mut ratings = Vec::with_capacity(total_trips);
    let mut surged = 0usize;
    for trip in dataset.completed() {
        fares.push(trip.fare);
        distances.push(trip.distance_mi);
        durations.push(trip.duration_min as f64);
        if let Some(rating) = trip.rating {
            ratings.push(rating);
        }
        if trip.has_surge() {
            surged += 1;
        }
    }

    KpiSummary {
        total_trips,
        total_revenue: round_to(fares.iter().sum(), 2),
        avg_fare: round_opt(mean(&fares), 2),
        avg_distance: round_opt(mean(&distances), 2),
        cancel_rate: round_to(percent(cancelled, total_trips), 2),
        avg_rating: round_opt(mean(&ratings), 2),
        avg_duration: round_opt(mean(&durations), 1),
        surge_pct: round_to(percent(surged, fares.len()), 1),
    }
}
