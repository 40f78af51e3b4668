use crate::commute::{next_departure, CommuteQuery};
use crate::scrapers::FilterCriteria;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Commute constraint for the person the search is run for
#[derive(Debug, Clone)]
pub struct CommuteSettings {
    pub origin_address: String,
    /// Directions API travel mode (`transit`, `driving`, ...)
    pub transit_mode: String,
    pub max_transit_minutes: u32,
    /// Local hour of tomorrow's departure
    pub departure_hour: u32,
    pub timezone: Tz,
}

impl Default for CommuteSettings {
    fn default() -> Self {
        Self {
            origin_address: "City Hall Park, New York, NY 10007".to_string(),
            transit_mode: "transit".to_string(),
            max_transit_minutes: 60,
            departure_hour: 17,
            timezone: chrono_tz::America::Los_Angeles,
        }
    }
}

impl CommuteSettings {
    /// Build a query to `destination`, departing tomorrow at the configured hour
    pub fn query_for(&self, destination: &str) -> Result<CommuteQuery> {
        Ok(CommuteQuery {
            origin: self.origin_address.clone(),
            destination: destination.to_string(),
            mode: self.transit_mode.clone(),
            departure_time: next_departure(Utc::now(), self.timezone, self.departure_hour)?,
            max_minutes: self.max_transit_minutes,
        })
    }
}

/// Run configuration, fixed at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub criteria: FilterCriteria,
    pub commute: CommuteSettings,
    pub google_api_key: String,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            commute: CommuteSettings::default(),
            google_api_key: String::new(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Compiled-in defaults, overridden by environment variables (and `.env`)
    ///
    /// `GOOGLE_API_KEY` is required. Optional overrides: `OUTPUT_DIR`,
    /// `MAX_TRANSIT_MINUTES`, `DEPARTURE_HOUR`, `TRANSIT_MODE`,
    /// `ORIGIN_ADDRESS`, `COMMUTE_TIMEZONE`.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        config.google_api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .context("GOOGLE_API_KEY must be set")?;

        if let Some(dir) = env::var_os("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(minutes) = parse_var("MAX_TRANSIT_MINUTES")? {
            config.commute.max_transit_minutes = minutes;
        }
        if let Some(hour) = parse_var::<u32>("DEPARTURE_HOUR")? {
            if hour > 23 {
                anyhow::bail!("DEPARTURE_HOUR must be between 0 and 23, got {}", hour);
            }
            config.commute.departure_hour = hour;
        }
        if let Ok(mode) = env::var("TRANSIT_MODE") {
            config.commute.transit_mode = mode;
        }
        if let Ok(origin) = env::var("ORIGIN_ADDRESS") {
            config.commute.origin_address = origin;
        }
        if let Some(tz) = parse_var("COMMUTE_TIMEZONE")? {
            config.commute.timezone = tz;
        }

        Ok(config)
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        Err(_) => Ok(None),
    }
}
