//! Server configuration: command line, environment, `.env`.

use anyhow::{bail, Result};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::Path;

use crate::generator::GeneratorConfig;

/// Largest dataset the server will generate at startup.
pub const MAX_TRIP_COUNT: usize = 5_000_000;

/// RidePulse trip analytics server
#[derive(Parser, Debug, Clone)]
#[command(name = "ridepulse")]
#[command(about = "Serve aggregate analytics over a synthetic ride-hailing trip dataset")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "RIDEPULSE_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Number of trips to generate at startup
    #[arg(long, env = "RIDEPULSE_TRIP_COUNT", default_value_t = 50_000)]
    pub trip_count: usize,

    /// Seed for the trip generator
    #[arg(long, env = "RIDEPULSE_SEED", default_value_t = 42)]
    pub seed: u64,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trip_count > MAX_TRIP_COUNT {
            bail!(
                "trip count {} exceeds maximum {}",
                self.trip_count,
                MAX_TRIP_COUNT
            );
        }
        Ok(())
    }

    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            record_count: self.trip_count,
            seed: self.seed,
        }
    }
}

/// Load `.env` from the working directory (and parents), then the crate root.
pub fn load_env() {
    let _ = dotenv();

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
