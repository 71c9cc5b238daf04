//! RidePulse Backend Library
//!
//! Synthetic ride-hailing trip generation plus the read-only analytics
//! served over HTTP. Exposes core modules for use by binaries and tests.

pub mod analytics;
pub mod api;
pub mod config;
pub mod generator;
pub mod middleware;
pub mod models;
pub mod numeric;

pub use generator::{Dataset, GeneratorConfig, TripGenerator};
pub use models::{Category, TripRecord};
