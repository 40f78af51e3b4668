use crate::models::{ListingRecord, Source};
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::{FilterCriteria, ZILLOW_SEARCH_URL};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// Path from a top-level `__NEXT_DATA__` value down to the result list
const LIST_RESULTS_PATH: &str = "/pageProps/searchPageState/cat1/searchResults/listResults";

/// Zillow rentals scraper
pub struct ZillowScraper {
    client: Client,
    search_url: Url,
    laundry: bool,
    air_conditioning: bool,
}

impl ZillowScraper {
    /// Create a scraper for the New York rentals search page
    pub fn new(criteria: &FilterCriteria) -> Result<Self> {
        Self::with_base_url(criteria, ZILLOW_SEARCH_URL)
    }

    /// Create a scraper against a different search page (used by tests)
    pub fn with_base_url(criteria: &FilterCriteria, base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        // accept-encoding is advertised by reqwest itself (gzip, br, deflate)
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            search_url: criteria.search_url(base)?,
            laundry: criteria.laundry_required,
            air_conditioning: criteria.ac_required,
        })
    }

    /// Download the raw search page
    pub async fn fetch_page(&self) -> Result<String> {
        debug!("Fetching URL: {}", self.search_url);

        let response = self
            .client
            .get(self.search_url.clone())
            .send()
            .await
            .context("Failed to fetch Zillow search page")?;

        if !response.status().is_success() {
            warn!("Zillow returned status: {}", response.status());
            anyhow::bail!("Failed to fetch Zillow search page: {}", response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());

        Ok(html)
    }
}

#[async_trait]
impl ListingSource for ZillowScraper {
    async fn listings(&self) -> Result<Vec<ListingRecord>> {
        info!("Starting Zillow rentals scrape");

        let html = self.fetch_page().await?;
        let listings = parse_listings(&html, self.laundry, self.air_conditioning)?;

        if listings.is_empty() {
            warn!("No listings found on the search page");
        } else {
            info!("Parsed {} listings from Zillow", listings.len());
        }

        Ok(listings)
    }

    fn source(&self) -> Source {
        Source::Zillow
    }
}

/// Extract listings from the `__NEXT_DATA__` block of a search page.
///
/// Every top-level object is probed for a result list; values without one are
/// skipped. Entries missing any field are dropped, so the output holds only
/// complete records, in encounter order.
pub fn parse_listings(html: &str, laundry: bool, air_conditioning: bool) -> Result<Vec<ListingRecord>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__")
        .map_err(|e| anyhow!("Invalid selector: {:?}", e))?;

    let script = document
        .select(&selector)
        .next()
        .context("Page has no __NEXT_DATA__ script block")?;
    let text = script.text().collect::<String>();
    let data: Value = serde_json::from_str(&text).context("Failed to decode __NEXT_DATA__ JSON")?;

    let mut listings = Vec::new();
    let mut skipped = 0;

    let Some(top_level) = data.as_object() else {
        return Ok(listings);
    };

    for (key, value) in top_level {
        if !value.is_object() {
            continue;
        }
        let Some(entries) = value.pointer(LIST_RESULTS_PATH).and_then(Value::as_array) else {
            debug!("No listing results under '{}'", key);
            continue;
        };

        for entry in entries {
            match RawListing::from_value(entry).into_record(laundry, air_conditioning) {
                Some(record) => listings.push(record),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        debug!("Discarded {} incomplete listings", skipped);
    }

    Ok(listings)
}

/// Listing fields as found on the page, each independently optional
#[derive(Debug, Default)]
struct RawListing {
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
    detail_path: Option<String>,
    available_date: Option<String>,
    price: Option<i64>,
    beds: Option<f64>,
    baths: Option<f64>,
}

impl RawListing {
    fn from_value(entry: &Value) -> Self {
        Self {
            latitude: entry.pointer("/latLong/latitude").and_then(Value::as_f64),
            longitude: entry.pointer("/latLong/longitude").and_then(Value::as_f64),
            address: string_field(entry, "address"),
            detail_path: string_field(entry, "detailUrl"),
            available_date: string_field(entry, "availabilityDate"),
            price: int_field(entry, "unformattedPrice"),
            beds: count_field(entry, "beds"),
            baths: count_field(entry, "baths"),
        }
    }

    fn is_complete(&self) -> bool {
        self.latitude.is_some()
            && self.longitude.is_some()
            && self.address.is_some()
            && self.detail_path.is_some()
            && self.available_date.is_some()
            && self.price.is_some()
            && self.beds.is_some()
            && self.baths.is_some()
    }

    fn into_record(self, laundry: bool, air_conditioning: bool) -> Option<ListingRecord> {
        if !self.is_complete() {
            return None;
        }

        Some(ListingRecord {
            latitude: self.latitude?,
            longitude: self.longitude?,
            address: self.address?,
            detail_path: self.detail_path?,
            available_date: self.available_date?,
            price: self.price?,
            beds: self.beds?,
            baths: self.baths?,
            laundry,
            air_conditioning,
        })
    }
}

fn string_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Room count such as `4`, `2.0` or `2.5`
fn count_field(entry: &Value, key: &str) -> Option<f64> {
    entry
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
}

/// Integer field that may be serialized as `2` or `2.0`
fn int_field(entry: &Value, key: &str) -> Option<i64> {
    let value = entry.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
