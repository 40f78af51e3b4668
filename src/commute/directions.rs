use crate::commute::{CommuteEstimator, CommuteQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const GOOGLE_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: Duration,
}

#[derive(Debug, Deserialize)]
struct Duration {
    /// Seconds
    value: u64,
}

/// Google Directions API client
pub struct DirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GOOGLE_DIRECTIONS_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl CommuteEstimator for DirectionsClient {
    /// Duration of the first leg of the first (best) route, floored to minutes
    async fn duration_minutes(&self, query: &CommuteQuery) -> Result<Option<u32>> {
        let departure_time = query.departure_time.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", query.origin.as_str()),
                ("destination", query.destination.as_str()),
                ("mode", query.mode.as_str()),
                ("key", self.api_key.as_str()),
                ("departure_time", departure_time.as_str()),
            ])
            .send()
            .await
            // the request URL carries the API key
            .map_err(|e| e.without_url())
            .context("Failed to reach directions service")?;

        if !response.status().is_success() {
            warn!(
                "Error with the transit time request to {}: {}",
                query.destination,
                response.status()
            );
            return Ok(None);
        }

        let directions: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to decode directions response")?;

        let Some(route) = directions.routes.first() else {
            warn!(
                "No route found between {} and {}",
                query.origin, query.destination
            );
            return Ok(None);
        };

        let leg = route
            .legs
            .first()
            .with_context(|| format!("Route to {} has no legs", query.destination))?;
        let minutes = u32::try_from(leg.duration.value / 60)
            .context("Commute duration out of range")?;

        debug!("{} -> {}: {} min", query.origin, query.destination, minutes);

        Ok(Some(minutes))
    }
}
