use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

/// Pickup/dropoff zones, in generation table order.
pub const ZONES: [&str; 20] = [
    "Midtown Manhattan",
    "JFK Airport",
    "Upper East Side",
    "LGA Airport",
    "Lower Manhattan",
    "Brooklyn Heights",
    "Williamsburg",
    "Astoria",
    "Upper West Side",
    "EWR Airport",
    "East Village",
    "Harlem",
    "Flushing Queens",
    "Staten Island",
    "Bronx",
    "Park Slope",
    "Long Island City",
    "Chelsea",
    "SoHo",
    "Tribeca",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn is_airport_zone(zone: &str) -> bool {
    zone.contains("Airport")
}

pub fn is_rush_hour(hour: u32) -> bool {
    matches!(hour, 7 | 8 | 9 | 17 | 18 | 19)
}

pub fn is_late_night(hour: u32) -> bool {
    matches!(hour, 22 | 23 | 0 | 1 | 2)
}

/// Ride product tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "UberX")]
    UberX,
    #[serde(rename = "Comfort")]
    Comfort,
    #[serde(rename = "UberXL")]
    UberXl,
    #[serde(rename = "Black")]
    Black,
    #[serde(rename = "Black SUV")]
    BlackSuv,
    #[serde(rename = "Green")]
    Green,
}

impl Category {
    /// All tiers, in the order their selection weights are declared.
    pub const ALL: [Category; 6] = [
        Category::UberX,
        Category::Comfort,
        Category::UberXl,
        Category::Black,
        Category::BlackSuv,
        Category::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::UberX => "UberX",
            Category::Comfort => "Comfort",
            Category::UberXl => "UberXL",
            Category::Black => "Black",
            Category::BlackSuv => "Black SUV",
            Category::Green => "Green",
        }
    }

    /// Exact, case-sensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn selection_weight(&self) -> f64 {
        match self {
            Category::UberX => 0.61,
            Category::Comfort => 0.14,
            Category::UberXl => 0.13,
            Category::Black => 0.07,
            Category::BlackSuv => 0.03,
            Category::Green => 0.02,
        }
    }

    pub fn base_fare(&self) -> f64 {
        match self {
            Category::UberX => 12.0,
            Category::Comfort => 16.0,
            Category::UberXl => 18.0,
            Category::Black => 28.0,
            Category::BlackSuv => 38.0,
            Category::Green => 10.0,
        }
    }

    pub fn per_mile_rate(&self) -> f64 {
        match self {
            Category::UberX => 1.8,
            Category::Comfort => 2.1,
            Category::UberXl => 2.3,
            Category::Black => 3.2,
            Category::BlackSuv => 3.8,
            Category::Green => 1.5,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single synthetic trip. Immutable once generated.
///
/// `rating` is present if and only if the trip was completed; every
/// constructor derives `cancelled` from it so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub trip_id: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub day_of_week: String,
    pub hour: u32,
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub category: Category,
    pub distance_mi: f64,
    pub duration_min: u32,
    pub fare: f64,
    pub surge_multiplier: f64,
    pub cancelled: bool,
    pub rating: Option<f64>,
    pub is_airport: bool,
    pub is_weekend: bool,
}

/// The measured parts of a trip; calendar and flag fields are derived from these.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub trip_id: String,
    pub timestamp: NaiveDateTime,
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub category: Category,
    pub distance_mi: f64,
    pub duration_min: u32,
    pub fare: f64,
    pub surge_multiplier: f64,
    /// `None` marks a cancelled trip.
    pub rating: Option<f64>,
}

impl From<TripDraft> for TripRecord {
    fn from(draft: TripDraft) -> Self {
        let ts = draft.timestamp;
        let is_airport = is_airport_zone(&draft.pickup_zone) || is_airport_zone(&draft.dropoff_zone);
        Self {
            trip_id: draft.trip_id,
            timestamp: ts,
            date: ts.format(DATE_FORMAT).to_string(),
            year: ts.year(),
            month: ts.month(),
            month_name: ts.format("%b").to_string(),
            day_of_week: ts.format("%A").to_string(),
            hour: ts.hour(),
            pickup_zone: draft.pickup_zone,
            dropoff_zone: draft.dropoff_zone,
            category: draft.category,
            distance_mi: draft.distance_mi,
            duration_min: draft.duration_min,
            fare: draft.fare,
            surge_multiplier: draft.surge_multiplier,
            cancelled: draft.rating.is_none(),
            rating: draft.rating,
            is_airport,
            is_weekend: is_weekend(ts.weekday()),
        }
    }
}

impl TripRecord {
    pub fn is_completed(&self) -> bool {
        !self.cancelled
    }

    pub fn has_surge(&self) -> bool {
        self.surge_multiplier > 1.0
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    pub fn touches_zone(&self, zone: &str) -> bool {
        self.pickup_zone == zone || self.dropoff_zone == zone
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

pub fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(rating: Option<f64>) -> TripDraft {
        TripDraft {
            trip_id: "TRP1000000".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 16)
                .unwrap()
                .and_hms_opt(23, 5, 9)
                .unwrap(),
            pickup_zone: "JFK Airport".to_string(),
            dropoff_zone: "Chelsea".to_string(),
            category: Category::Comfort,
            distance_mi: 14.2,
            duration_min: 51,
            fare: 48.31,
            surge_multiplier: 1.4,
            rating,
        }
    }

    #[test]
    fn test_calendar_fields_derived_from_timestamp() {
        let trip = TripRecord::from(draft(Some(4.5)));
        assert_eq!(trip.date, "2024-03-16");
        assert_eq!(trip.year, 2024);
        assert_eq!(trip.month, 3);
        assert_eq!(trip.month_name, "Mar");
        assert_eq!(trip.day_of_week, "Saturday");
        assert_eq!(trip.hour, 23);
        assert!(trip.is_weekend);
        assert!(trip.is_airport);
    }

    #[test]
    fn test_cancelled_follows_rating() {
        assert!(!TripRecord::from(draft(Some(4.0))).cancelled);
        assert!(TripRecord::from(draft(None)).cancelled);
    }

    #[test]
    fn test_serializes_plain_json() {
        let value = serde_json::to_value(TripRecord::from(draft(None))).unwrap();
        assert_eq!(value["timestamp"], "2024-03-16 23:05:09");
        assert_eq!(value["category"], "Comfort");
        assert!(value["rating"].is_null());
        assert_eq!(value["cancelled"], true);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_name("uberx"), None);
        let total: f64 = Category::ALL.iter().map(|c| c.selection_weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_flags_are_disjoint() {
        for hour in 0..24 {
            assert!(!(is_rush_hour(hour) && is_late_night(hour)));
        }
        assert_eq!(ZONES.iter().filter(|z| is_airport_zone(z)).count(), 3);
    }
}
