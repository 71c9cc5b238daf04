//! Grouped breakdowns: by month, hour, weekday, category, zone, route.

use chrono::Weekday;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::{hour_label, FareTally};
use crate::generator::Dataset;
use crate::models::{Category, MONTH_ABBREVIATIONS};
use crate::numeric::{percent, round_opt, round_to};

const TOP_N: usize = 10;
const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBreakdown {
    pub months: Vec<&'static str>,
    pub trips: Vec<usize>,
    /// Thousands of dollars.
    pub revenue: Vec<f64>,
    pub avg_fare: Vec<Option<f64>>,
}

/// Completed trips per calendar month, months without trips omitted.
pub fn monthly_breakdown(dataset: &Dataset) -> MonthlyBreakdown {
    let mut groups: BTreeMap<u32, FareTally> = BTreeMap::new();
    for trip in dataset.completed() {
        groups.entry(trip.month).or_default().add(trip.fare);
    }

    let mut out = MonthlyBreakdown {
        months: Vec::with_capacity(groups.len()),
        trips: Vec::with_capacity(groups.len()),
        revenue: Vec::with_capacity(groups.len()),
        avg_fare: Vec::with_capacity(groups.len()),
    };
    for (month, tally) in groups {
        out.months.push(MONTH_ABBREVIATIONS[(month as usize).saturating_sub(1) % 12]);
        out.trips.push(tally.trips);
        out.revenue.push(tally.revenue_thousands());
        out.avg_fare.push(round_opt(tally.avg_fare(), 2));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBreakdown {
    pub hours: Vec<String>,
    pub trips: Vec<usize>,
    /// Percent of trips cancelled.
    pub cancel_rate: Vec<f64>,
    pub avg_fare: Vec<Option<f64>>,
}

/// All trips per hour of day, hours without trips omitted.
pub fn hourly_breakdown(dataset: &Dataset) -> HourlyBreakdown {
    let mut groups: BTreeMap<u32, (FareTally, usize)> = BTreeMap::new();
    for trip in dataset.trips() {
        let (tally, cancelled) = groups.entry(trip.hour).or_default();
        tally.add(trip.fare);
        if trip.cancelled {
            *cancelled += 1;
        }
    }

    let mut out = HourlyBreakdown {
        hours: Vec::with_capacity(groups.len()),
        trips: Vec::with_capacity(groups.len()),
        cancel_rate: Vec::with_capacity(groups.len()),
        avg_fare: Vec::with_capacity(groups.len()),
    };
    for (hour, (tally, cancelled)) in groups {
        out.hours.push(hour_label(hour));
        out.trips.push(tally.trips);
        out.cancel_rate.push(round_to(percent(cancelled, tally.trips), 2));
        out.avg_fare.push(round_opt(tally.avg_fare(), 2));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOfWeekBreakdown {
    pub days: Vec<&'static str>,
    pub trips: Vec<usize>,
    /// Thousands of dollars.
    pub revenue: Vec<f64>,
    pub avg_fare: Vec<Option<f64>>,
}

/// All trips per weekday, always Monday through Sunday.
pub fn day_of_week_breakdown(dataset: &Dataset) -> DayOfWeekBreakdown {
    let mut days = [FareTally::default(); 7];
    for trip in dataset.trips() {
        days[weekday_index(trip.weekday())].add(trip.fare);
    }

    DayOfWeekBreakdown {
        days: DAY_LABELS.to_vec(),
        trips: days.iter().map(|d| d.trips).collect(),
        revenue: days.iter().map(|d| d.revenue_thousands()).collect(),
        avg_fare: days.iter().map(|d| round_opt(d.avg_fare(), 2)).collect(),
    }
}

fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<&'static str>,
    pub trips: Vec<usize>,
    pub revenue: Vec<f64>,
    pub avg_fare: Vec<Option<f64>>,
    /// Share of completed trips, percent.
    pub pct: Vec<f64>,
}

/// Completed trips per category, busiest first.
pub fn category_breakdown(dataset: &Dataset) -> CategoryBreakdown {
    let mut groups: HashMap<Category, FareTally> = HashMap::new();
    for trip in dataset.completed() {
        groups.entry(trip.category).or_default().add(trip.fare);
    }
    let completed: usize = groups.values().map(|t| t.trips).sum();

    let mut rows: Vec<(Category, FareTally)> = groups.into_iter().collect();
    rows.sort_by(|a, b| {
        b.1.trips
            .cmp(&a.1.trips)
            .then_with(|| a.0.as_str().cmp(b.0.as_str()))
    });

    CategoryBreakdown {
        categories: rows.iter().map(|(c, _)| c.as_str()).collect(),
        trips: rows.iter().map(|(_, t)| t.trips).collect(),
        revenue: rows.iter().map(|(_, t)| round_to(t.revenue, 2)).collect(),
        avg_fare: rows.iter().map(|(_, t)| round_opt(t.avg_fare(), 2)).collect(),
        pct: rows
            .iter()
            .map(|(_, t)| round_to(percent(t.trips, completed), 1))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBreakdown {
    pub zones: Vec<String>,
    pub trips: Vec<usize>,
    /// Thousands of dollars.
    pub revenue: Vec<f64>,
    pub avg_fare: Vec<Option<f64>>,
}

/// Top pickup zones by trip count, over all trips.
pub fn top_zones(dataset: &Dataset) -> ZoneBreakdown {
    let mut groups: BTreeMap<&str, FareTally> = BTreeMap::new();
    for trip in dataset.trips() {
        groups.entry(trip.pickup_zone.as_str()).or_default().add(trip.fare);
    }

    let mut rows: Vec<(&str, FareTally)> = groups.into_iter().collect();
    // Stable sort over name-ordered groups: ties stay alphabetical.
    rows.sort_by(|a, b| b.1.trips.cmp(&a.1.trips));
    rows.truncate(TOP_N);

    ZoneBreakdown {
        zones: rows.iter().map(|(z, _)| z.to_string()).collect(),
        trips: rows.iter().map(|(_, t)| t.trips).collect(),
        revenue: rows.iter().map(|(_, t)| t.revenue_thousands()).collect(),
        avg_fare: rows.iter().map(|(_, t)| round_opt(t.avg_fare(), 2)).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route: String,
    pub pickup: String,
    pub dropoff: String,
    pub trips: usize,
    pub avg_fare: f64,
    pub avg_duration: f64,
    pub avg_distance: f64,
    /// Percent of trips on this route with surge above 1.0.
    pub surge_freq: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Default)]
struct RouteTally {
    trips: usize,
    fare: f64,
    duration: f64,
    distance: f64,
    surged: usize,
}

/// Busiest (pickup, dropoff) pairs among completed trips.
pub fn top_routes(dataset: &Dataset) -> RoutesResponse {
    let mut groups: BTreeMap<(&str, &str), RouteTally> = BTreeMap::new();
    for trip in dataset.completed() {
        let tally = groups
            .entry((trip.pickup_zone.as_str(), trip.dropoff_zone.as_str()))
            .or_default();
        tally.trips += 1;
        tally.fare += trip.fare;
        tally.duration += trip.duration_min as f64;
        tally.distance += trip.distance_mi;
        if trip.has_surge() {
            tally.surged += 1;
        }
    }

    let mut rows: Vec<((&str, &str), RouteTally)> = groups.into_iter().collect();
    rows.sort_by(|a, b| b.1.trips.cmp(&a.1.trips));
    rows.truncate(TOP_N);

    let routes = rows
        .into_iter()
        .map(|((pickup, dropoff), tally)| {
            // Groups only exist once a trip was added, so trips >= 1.
            let n = tally.trips as f64;
            RouteSummary {
                route: format!("{pickup} → {dropoff}"),
                pickup: pickup.to_string(),
                dropoff: dropoff.to_string(),
                trips: tally.trips,
                avg_fare: round_to(tally.fare / n, 2),
                avg_duration: round_to(tally.duration / n, 0),
                avg_distance: round_to(tally.distance / n, 1),
                surge_freq: round_to(percent(tally.surged, tally.trips), 1),
            }
        })
        .collect();

    RoutesResponse { routes }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurgeBreakdown {
    pub hours: Vec<String>,
    pub avg_surge: Vec<f64>,
    pub max_surge: Vec<f64>,
    /// Percent of trips with surge above 1.0.
    pub surge_pct: Vec<f64>,
}

#[derive(Debug, Default)]
struct SurgeTally {
    trips: usize,
    total: f64,
    max: f64,
    surged: usize,
}

/// Surge profile per hour of day over completed trips.
pub fn surge_by_hour(dataset: &Dataset) -> SurgeBreakdown {
    let mut groups: BTreeMap<u32, SurgeTally> = BTreeMap::new();
    for trip in dataset.completed() {
        let tally = groups.entry(trip.hour).or_default();
        tally.trips += 1;
        tally.total += trip.surge_multiplier;
        tally.max = tally.max.max(trip.surge_multiplier);
        if trip.has_surge() {
            tally.surged += 1;
        }
    }

    let mut out = SurgeBreakdown {
        hours: Vec::with_capacity(groups.len()),
        avg_surge: Vec::with_capacity(groups.len()),
        max_surge: Vec::with_capacity(groups.len()),
        surge_pct: Vec::with_capacity(groups.len()),
    };
    for (hour, tally) in groups {
        out.hours.push(hour_label(hour));
        out.avg_surge.push(round_to(tally.total / tally.trips as f64, 2));
        out.max_surge.push(round_to(tally.max, 2));
        out.surge_pct.push(round_to(percent(tally.surged, tally.trips), 1));
    }
    out
}
