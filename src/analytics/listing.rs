//! Raw trip listing and filter options.

use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::generator::Dataset;
use crate::models::{Category, TripRecord};

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Cancelled,
}

impl StatusFilter {
    /// `completed` and `cancelled` filter; anything else lists every trip.
    pub fn from_param(value: &str) -> Self {
        match value {
            "completed" => StatusFilter::Completed,
            "cancelled" => StatusFilter::Cancelled,
            _ => StatusFilter::All,
        }
    }

    fn matches(&self, trip: &TripRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => !trip.cancelled,
            StatusFilter::Cancelled => trip.cancelled,
        }
    }
}

/// Listing filters. Unknown category or zone values match nothing.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub category: Option<String>,
    /// Matches either end of the trip.
    pub zone: Option<String>,
    pub status: StatusFilter,
}

impl TripFilter {
    pub fn matches(&self, trip: &TripRecord) -> bool {
        if let Some(name) = &self.category {
            if Category::from_name(name) != Some(trip.category) {
                return false;
            }
        }
        if let Some(zone) = &self.zone {
            if !trip.touches_zone(zone) {
                return false;
            }
        }
        self.status.matches(trip)
    }
}

/// 1-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate raw parameters. `per_page` above the cap is clamped.
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Result<Self> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
        if page == 0 {
            bail!("page must be at least 1");
        }
        if per_page == 0 {
            bail!("per_page must be at least 1");
        }
        Ok(Self {
            page,
            per_page: per_page.min(MAX_PER_PAGE),
        })
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Listed columns of a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow<'a> {
    pub trip_id: &'a str,
    pub timestamp: String,
    pub pickup_zone: &'a str,
    pub dropoff_zone: &'a str,
    pub category: Category,
    pub distance_mi: f64,
    pub duration_min: u32,
    pub fare: f64,
    pub surge_multiplier: f64,
    pub cancelled: bool,
    pub rating: Option<f64>,
}

impl<'a> From<&'a TripRecord> for TripRow<'a> {
    fn from(trip: &'a TripRecord) -> Self {
        Self {
            trip_id: &trip.trip_id,
            timestamp: trip.timestamp_string(),
            pickup_zone: &trip.pickup_zone,
            dropoff_zone: &trip.dropoff_zone,
            category: trip.category,
            distance_mi: trip.distance_mi,
            duration_min: trip.duration_min,
            fare: trip.fare,
            surge_multiplier: trip.surge_multiplier,
            cancelled: trip.cancelled,
            rating: trip.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPage<'a> {
    pub trips: Vec<TripRow<'a>>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
}

/// Filtered trips, newest first, one page at a time.
///
/// A page past the end is an empty page, not an error.
pub fn list_trips<'a>(dataset: &'a Dataset, filter: &TripFilter, page: PageRequest) -> TripPage<'a> {
    let offset = page.offset();
    let mut total = 0usize;
    let mut trips = Vec::with_capacity(page.per_page.min(dataset.len()));
    for trip in dataset.newest_first().filter(|t| filter.matches(t)) {
        if total >= offset && trips.len() < page.per_page {
            trips.push(TripRow::from(trip));
        }
        total += 1;
    }

    TripPage {
        trips,
        total,
        page: page.page,
        per_page: page.per_page,
        pages: total.div_ceil(page.per_page),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<&'static str>,
    pub zones: Vec<String>,
}

/// Distinct categories and pickup zones present in the data, sorted.
pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    let categories: BTreeSet<&'static str> =
        dataset.trips().iter().map(|t| t.category.as_str()).collect();
    let zones: BTreeSet<&str> = dataset
        .trips()
        .iter()
        .map(|t| t.pickup_zone.as_str())
        .collect();

    FilterOptions {
        categories: categories.into_iter().collect(),
        zones: zones.into_iter().map(str::to_string).collect(),
    }
}
