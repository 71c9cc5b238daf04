//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::OnceLock;
use tower::ServiceExt;

use ridepulse_backend::models::{Category, TripDraft, TripRecord};
use ridepulse_backend::{Dataset, GeneratorConfig};

pub const FULL_COUNT: usize = 50_000;

/// The default 50k/seed-42 dataset, generated once per test binary.
pub fn full_dataset() -> Dataset {
    static DATASET: OnceLock<Dataset> = OnceLock::new();
    DATASET
        .get_or_init(|| {
            Dataset::generate(GeneratorConfig {
                record_count: FULL_COUNT,
                seed: 42,
            })
            .expect("generate dataset")
        })
        .clone()
}

fn trip(
    id: usize,
    day: u32,
    hour: u32,
    pickup: &str,
    dropoff: &str,
    fare: f64,
    rating: Option<f64>,
) -> TripRecord {
    TripRecord::from(TripDraft {
        trip_id: format!("TRP{}", 1_000_000 + id),
        timestamp: NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        pickup_zone: pickup.to_string(),
        dropoff_zone: dropoff.to_string(),
        category: Category::UberX,
        distance_mi: 5.0,
        duration_min: 20,
        fare,
        surge_multiplier: 1.0,
        rating,
    })
}

/// Four trips: two completed (rated 4.8 and 3.6), two cancelled.
pub fn four_trip_dataset() -> Dataset {
    Dataset::new(vec![
        trip(0, 6, 8, "Harlem", "Chelsea", 22.0, Some(4.8)),
        trip(1, 7, 12, "Chelsea", "SoHo", 18.0, Some(3.6)),
        trip(2, 8, 18, "SoHo", "Bronx", 30.0, None),
        trip(3, 9, 23, "Bronx", "Harlem", 14.0, None),
    ])
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
