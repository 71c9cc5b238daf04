use super::{MAX_DISTANCE_MI, MIN_DISTANCE_MI, MIN_DURATION_MIN, MIN_FARE};
use crate::models::TripRecord;

/// Checks one trip against the schema invariants.
/// Returns an error message if validation fails, None if valid.
pub fn validate_trip(trip: &TripRecord) -> Option<String> {
    if trip.pickup_zone == trip.dropoff_zone {
        return Some(format!(
            "Trip {}: pickup_zone equals dropoff_zone ({})",
            trip.trip_id, trip.pickup_zone
        ));
    }
    if trip.rating.is_some() == trip.cancelled {
        return Some(format!(
            "Trip {}: rating {:?} inconsistent with cancelled={}",
            trip.trip_id, trip.rating, trip.cancelled
        ));
    }
    if let Some(rating) = trip.rating {
        if !(1.0..=5.0).contains(&rating) {
            return Some(format!("Trip {}: rating {} outside [1, 5]", trip.trip_id, rating));
        }
    }
    if !(MIN_DISTANCE_MI..=MAX_DISTANCE_MI).contains(&trip.distance_mi) {
        return Some(format!(
            "Trip {}: distance_mi {} outside [{}, {}]",
            trip.trip_id, trip.distance_mi, MIN_DISTANCE_MI, MAX_DISTANCE_MI
        ));
    }
    if trip.duration_min < MIN_DURATION_MIN {
        return Some(format!(
            "Trip {}: duration_min {} below {}",
            trip.trip_id, trip.duration_min, MIN_DURATION_MIN
        ));
    }
    if trip.fare < MIN_FARE {
        return Some(format!(
            "Trip {}: fare {} below {}",
            trip.trip_id, trip.fare, MIN_FARE
        ));
    }
    if trip.surge_multiplier < 1.0 {
        return Some(format!(
            "Trip {}: surge_multiplier {} below 1.0",
            trip.trip_id, trip.surge_multiplier
        ));
    }
    None
}

/// Every violation across `trips`, in record order.
pub fn invariant_violations(trips: &[TripRecord]) -> Vec<String> {
    trips.iter().filter_map(validate_trip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, TripGenerator};

    #[test]
    fn test_generated_trips_pass() {
        let generator = TripGenerator::new(GeneratorConfig {
            record_count: 10_000,
            seed: 42,
        })
        .unwrap();
        let violations = invariant_violations(&generator.generate());
        assert!(violations.is_empty(), "{:?}", violations.first());
    }

    #[test]
    fn test_detects_broken_trips() {
        let generator = TripGenerator::new(GeneratorConfig::default()).unwrap();
        let good = generator.trip(0);

        let mut loop_trip = good.clone();
        loop_trip.dropoff_zone = loop_trip.pickup_zone.clone();
        assert!(validate_trip(&loop_trip).unwrap().contains("pickup_zone"));

        let mut rated_cancel = good.clone();
        rated_cancel.cancelled = true;
        rated_cancel.rating = Some(4.0);
        assert!(validate_trip(&rated_cancel).unwrap().contains("rating"));

        let mut cheap = good.clone();
        cheap.fare = 4.99;
        assert!(validate_trip(&cheap).unwrap().contains("fare"));

        let mut short = good;
        short.duration_min = 2;
        assert!(validate_trip(&short).unwrap().contains("duration_min"));
    }
}
