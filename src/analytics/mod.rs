//! Read-only aggregate views over a [`Dataset`].
//!
//! Every function here is a pure function of the dataset plus request
//! parameters. Results are plain serde structs with `f64`/`usize`/`Option`
//! fields, so the JSON encoder never sees anything but standard numbers.

pub mod breakdowns;
pub mod histogram;
pub mod kpi;
pub mod listing;
pub mod stats;

pub use breakdowns::{
    category_breakdown, day_of_week_breakdown, hourly_breakdown, monthly_breakdown, surge_by_hour,
    top_routes, top_zones, CategoryBreakdown, DayOfWeekBreakdown, HourlyBreakdown,
    MonthlyBreakdown, RouteSummary, RoutesResponse, SurgeBreakdown, ZoneBreakdown,
};
pub use histogram::{fare_distribution, rating_distribution, FareDistribution, RatingDistribution};
pub use kpi::{kpi_summary, KpiSummary};
pub use listing::{
    filter_options, list_trips, FilterOptions, PageRequest, StatusFilter, TripFilter, TripPage,
    TripRow,
};
pub use stats::{summary_statistics, SummaryStatistics};

use crate::numeric::round_to;

/// Running count and fare total for one group.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FareTally {
    pub trips: usize,
    pub revenue: f64,
}

impl FareTally {
    pub fn add(&mut self, fare: f64) {
        self.trips += 1;
        self.revenue += fare;
    }

    pub fn avg_fare(&self) -> Option<f64> {
        if self.trips == 0 {
            None
        } else {
            Some(self.revenue / self.trips as f64)
        }
    }

    pub fn revenue_thousands(&self) -> f64 {
        round_to(self.revenue / 1000.0, 1)
    }
}

pub(crate) fn hour_label(hour: u32) -> String {
    format!("{hour}:00")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::generator::Dataset;
    use crate::models::{Category, TripDraft, TripRecord};
    use chrono::NaiveDate;

    #[allow(clippy::too_many_arguments)]
    pub fn trip(
        id: usize,
        ymd_hms: (i32, u32, u32, u32, u32, u32),
        pickup: &str,
        dropoff: &str,
        category: Category,
        distance_mi: f64,
        duration_min: u32,
        fare: f64,
        surge_multiplier: f64,
        rating: Option<f64>,
    ) -> TripRecord {
        let (y, mo, d, h, mi, s) = ymd_hms;
        TripRecord::from(TripDraft {
            trip_id: format!("TRP{}", 1_000_000 + id),
            timestamp: NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap(),
            pickup_zone: pickup.to_string(),
            dropoff_zone: dropoff.to_string(),
            category,
            distance_mi,
            duration_min,
            fare,
            surge_multiplier,
            rating,
        })
    }

    /// Two completed and two cancelled trips.
    pub fn four_trips() -> Dataset {
        Dataset::new(vec![
            trip(0, (2024, 1, 15, 8, 10, 0), "Chelsea", "JFK Airport", Category::UberX, 12.0, 40, 40.0, 1.5, Some(5.0)),
            trip(1, (2024, 1, 20, 23, 0, 0), "SoHo", "Harlem", Category::Black, 6.0, 18, 20.0, 1.0, Some(4.0)),
            trip(2, (2024, 2, 5, 8, 30, 0), "Chelsea", "Bronx", Category::UberX, 3.0, 12, 15.0, 1.3, None),
            trip(3, (2024, 3, 9, 14, 45, 0), "Harlem", "Chelsea", Category::Comfort, 2.0, 9, 11.0, 1.0, None),
        ])
    }
}
