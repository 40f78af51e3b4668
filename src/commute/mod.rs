pub mod directions;

pub use directions::DirectionsClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One commute lookup from the fixed origin to a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommuteQuery {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    /// Departure instant in Unix seconds
    pub departure_time: i64,
    pub max_minutes: u32,
}

/// Anything that can project a travel duration for a query
#[async_trait]
pub trait CommuteEstimator: Send + Sync {
    /// Travel time in whole minutes, or `None` when no duration is available
    async fn duration_minutes(&self, query: &CommuteQuery) -> Result<Option<u32>>;
}

/// Tomorrow at `hour:00` local time in `tz`, as Unix seconds.
///
/// "Tomorrow" is relative to the current date in `tz`, not in UTC. A local
/// time skipped by a DST change moves forward one hour; a repeated one
/// resolves to the earlier instant.
pub fn next_departure(now: DateTime<Utc>, tz: Tz, hour: u32) -> Result<i64> {
    let tomorrow = now
        .with_timezone(&tz)
        .date_naive()
        .succ_opt()
        .context("Date overflow computing departure day")?;
    let local = tomorrow
        .and_hms_opt(hour, 0, 0)
        .with_context(|| format!("Invalid departure hour: {}", hour))?;

    let departure = match tz.from_local_datetime(&local) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .with_context(|| format!("No valid local time near {} in {}", local, tz))?,
    };

    Ok(departure.timestamp())
}
