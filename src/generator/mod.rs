//! Synthetic trip generation
//!
//! Produces a fixed-size, reproducible dataset of ride-hailing trips whose
//! fields are correlated the way real trips are: demand follows time of day,
//! surge follows rush hour / weekend nights / airports, fares follow tier,
//! distance and surge, durations follow distance and traffic.
//!
//! Each record draws the same fixed sequence of random values from its own
//! stream (see [`TripRng`]), whether or not a given condition fires. That
//! keeps generation deterministic and lets records be built in parallel.

pub mod rng;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::distributions::WeightedIndex;
use rayon::prelude::*;
use statrs::distribution::{Exp, Normal};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    is_airport_zone, is_late_night, is_rush_hour, is_weekend, Category, TripDraft, TripRecord,
    ZONES,
};
use crate::numeric::round_to;

pub use rng::TripRng;
pub use validate::{invariant_violations, validate_trip};

/// Relative demand per hour of day. Two commute humps and a late-evening peak.
pub const HOUR_WEIGHTS: [f64; 24] = [
    0.40, 0.25, 0.18, 0.15, 0.19, 0.48, 1.24, 1.92, 1.78, 1.34, 1.10, 1.26, 1.38, 1.20, 1.18,
    1.22, 1.38, 1.62, 1.82, 2.10, 1.94, 1.64, 1.24, 0.82,
];

pub const DAYS_IN_RANGE: usize = 365;
pub const MEAN_DISTANCE_MI: f64 = 4.2;
pub const MIN_DISTANCE_MI: f64 = 0.5;
pub const MAX_DISTANCE_MI: f64 = 45.0;
pub const MIN_FARE: f64 = 5.0;
pub const MIN_DURATION_MIN: u32 = 3;
/// Free-flow speed used to turn distance into drive time.
pub const FREE_FLOW_MPH: f64 = 18.0;

pub const BASE_CANCEL_PROB: f64 = 0.028;
pub const RUSH_CANCEL_PROB: f64 = 0.075;
pub const LATE_NIGHT_CANCEL_PROB: f64 = 0.045;

const TRIP_ID_OFFSET: usize = 1_000_000;

/// Generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub record_count: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            record_count: 50_000,
            seed: 42,
        }
    }
}

/// Builds trips. Holds only immutable distribution tables, so it is shared
/// freely across rayon workers.
#[derive(Debug, Clone)]
pub struct TripGenerator {
    config: GeneratorConfig,
    start: NaiveDateTime,
    hour_dist: WeightedIndex<f64>,
    category_dist: WeightedIndex<f64>,
    distance_dist: Exp,
    fare_noise: Normal,
    duration_noise: Normal,
    rating_dist: Normal,
}

impl TripGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .context("Invalid generation start date")?;

        Ok(Self {
            config,
            start,
            hour_dist: WeightedIndex::new(HOUR_WEIGHTS).context("Invalid hour weights")?,
            category_dist: WeightedIndex::new(Category::ALL.map(|c| c.selection_weight()))
                .context("Invalid category weights")?,
            distance_dist: Exp::new(1.0 / MEAN_DISTANCE_MI)
                .context("Invalid distance distribution")?,
            fare_noise: Normal::new(0.0, 1.5).context("Invalid fare noise")?,
            duration_noise: Normal::new(3.0, 2.0).context("Invalid duration noise")?,
            rating_dist: Normal::new(4.4, 0.5).context("Invalid rating distribution")?,
        })
    }

    /// Generate the full dataset. Output order is record index order.
    pub fn generate(&self) -> Vec<TripRecord> {
        let started = std::time::Instant::now();
        let trips: Vec<TripRecord> = (0..self.config.record_count)
            .into_par_iter()
            .map(|index| self.trip(index))
            .collect();
        debug!(
            records = trips.len(),
            seed = self.config.seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated trip records"
        );
        trips
    }

    /// Build the record at `index`. Depends only on the seed and the index.
    pub fn trip(&self, index: usize) -> TripRecord {
        let mut rng = TripRng::for_record(self.config.seed, index as u64);

        // Fixed draw order: every draw happens for every record.
        let hour = rng.sample::<usize, _>(&self.hour_dist) as u32;
        let day = rng.index_below(DAYS_IN_RANGE) as i64;
        let minute = rng.index_below(60) as i64;
        let second = rng.index_below(60) as i64;
        let category = Category::ALL[rng.sample::<usize, _>(&self.category_dist)];
        let raw_distance: f64 = rng.sample(&self.distance_dist);
        let pickup_idx = rng.index_below(ZONES.len());
        let dropoff_draw = rng.index_below(ZONES.len() - 1);
        let rush_surge = rng.uniform(1.1, 1.8);
        let late_night_surge = rng.uniform(1.5, 2.8);
        let airport_surge = rng.uniform(1.0, 1.6);
        let fare_noise: f64 = rng.sample(&self.fare_noise);
        let traffic = rng.uniform(1.3, 1.9);
        let duration_noise: f64 = rng.sample(&self.duration_noise);
        let cancel_roll = rng.uniform(0.0, 1.0);
        let raw_rating: f64 = rng.sample(&self.rating_dist);

        let timestamp = self.start
            + Duration::days(day)
            + Duration::hours(hour as i64)
            + Duration::minutes(minute)
            + Duration::seconds(second);
        let weekday = timestamp.weekday();
        let weekend = is_weekend(weekday);
        let rush = is_rush_hour(hour);
        let late_night = is_late_night(hour);

        let distance = round_to(raw_distance.clamp(MIN_DISTANCE_MI, MAX_DISTANCE_MI), 1);

        // Dropoff is drawn over the 19 zones left after removing the pickup.
        let dropoff_idx = if dropoff_draw >= pickup_idx {
            dropoff_draw + 1
        } else {
            dropoff_draw
        };
        let pickup = ZONES[pickup_idx];
        let dropoff = ZONES[dropoff_idx];
        let airport = is_airport_zone(pickup) || is_airport_zone(dropoff);

        let surge = surge_multiplier(
            rush && !weekend,
            late_night && weekend,
            airport,
            SurgeDraws {
                rush: rush_surge,
                late_night: late_night_surge,
                airport: airport_surge,
            },
        );

        let fare = (category.base_fare() + category.per_mile_rate() * distance) * surge;
        let fare = round_to(fare + fare_noise, 2).max(MIN_FARE);

        let traffic_factor = if rush { traffic } else { 1.0 };
        let duration = (distance / FREE_FLOW_MPH) * 60.0 * traffic_factor + duration_noise;
        let duration = (duration.round().max(MIN_DURATION_MIN as f64)) as u32;

        let cancelled = cancel_roll < cancel_probability(rush, late_night);
        let rating = if cancelled {
            None
        } else {
            Some(round_to(raw_rating.clamp(1.0, 5.0), 1))
        };

        TripRecord::from(TripDraft {
            trip_id: format!("TRP{}", TRIP_ID_OFFSET + index),
            timestamp,
            pickup_zone: pickup.to_string(),
            dropoff_zone: dropoff.to_string(),
            category,
            distance_mi: distance,
            duration_min: duration,
            fare,
            surge_multiplier: surge,
            rating,
        })
    }
}

/// Pre-drawn uniforms for the three surge conditions.
#[derive(Debug, Clone, Copy)]
pub struct SurgeDraws {
    pub rush: f64,
    pub late_night: f64,
    pub airport: f64,
}

/// Sequential override: weekday rush sets surge, weekend late night sets it
/// again, then airports raise it to at least their own draw. Each step rounds
/// to one decimal.
pub fn surge_multiplier(
    weekday_rush: bool,
    weekend_late_night: bool,
    airport: bool,
    draws: SurgeDraws,
) -> f64 {
    let mut surge = 1.0;
    if weekday_rush {
        surge = round_to(draws.rush, 1);
    }
    if weekend_late_night {
        surge = round_to(draws.late_night, 1);
    }
    if airport {
        surge = round_to(surge.max(draws.airport), 1);
    }
    surge
}

/// Rush hour wins over late night; the two hour sets never overlap.
pub fn cancel_probability(rush: bool, late_night: bool) -> f64 {
    if rush {
        RUSH_CANCEL_PROB
    } else if late_night {
        LATE_NIGHT_CANCEL_PROB
    } else {
        BASE_CANCEL_PROB
    }
}

/// The immutable trip snapshot served by the query layer.
///
/// Built once at startup and shared behind an `Arc`; queries only ever read it.
#[derive(Debug, Clone)]
pub struct Dataset {
    trips: Arc<[TripRecord]>,
    /// Trip indices, newest timestamp first; equal timestamps keep generation order.
    by_recency: Arc<[usize]>,
}

impl Dataset {
    pub fn new(trips: Vec<TripRecord>) -> Self {
        let mut by_recency: Vec<usize> = (0..trips.len()).collect();
        by_recency.sort_by(|&a, &b| trips[b].timestamp.cmp(&trips[a].timestamp));
        Self {
            trips: trips.into(),
            by_recency: by_recency.into(),
        }
    }

    pub fn generate(config: GeneratorConfig) -> Result<Self> {
        let generator = TripGenerator::new(config)?;
        let started = std::time::Instant::now();
        let dataset = Self::new(generator.generate());
        info!(
            records = dataset.len(),
            seed = config.seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset ready"
        );
        Ok(dataset)
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn completed(&self) -> impl Iterator<Item = &TripRecord> + '_ {
        self.trips.iter().filter(|t| t.is_completed())
    }

    /// All trips, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &TripRecord> + '_ {
        self.by_recency.iter().map(|&i| &self.trips[i])
    }
}
