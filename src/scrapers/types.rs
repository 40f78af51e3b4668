use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rentals search page for New York
pub const ZILLOW_SEARCH_URL: &str = "https://www.zillow.com/new-york-ny/rentals/";

/// Geographic bounding box of the search map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Search criteria embedded in the listings request.
///
/// None of these are checked client-side: the listings source applies them
/// and only matching listings come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Maximum monthly rent (USD)
    pub max_price: u32,
    pub min_beds: u32,
    pub min_baths: u32,
    pub laundry_required: bool,
    pub ac_required: bool,
    /// Minimum size in square feet
    pub min_sqft: u32,
    /// Cap on the listing's sale-price filter (`price`), separate from rent
    pub max_list_price: u32,
    pub map_bounds: MapBounds,
    pub region_id: u32,
    pub search_term: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            max_price: 6000,
            min_beds: 4,
            min_baths: 2,
            laundry_required: true,
            ac_required: true,
            min_sqft: 2000,
            max_list_price: 778_217,
            map_bounds: MapBounds {
                north: 41.06799488951523,
                south: 40.32564014061633,
                east: -73.26419638085937,
                west: -74.69516561914062,
            },
            region_id: 6181,
            search_term: "New York NY".to_string(),
        }
    }
}

impl FilterCriteria {
    /// The `searchQueryState` document understood by the Zillow search page
    pub fn search_query_state(&self) -> Value {
        let bounds = &self.map_bounds;
        json!({
            "pagination": {},
            "mapBounds": {
                "north": bounds.north,
                "south": bounds.south,
                "east": bounds.east,
                "west": bounds.west,
            },
            "regionSelection": [{ "regionId": self.region_id, "regionType": 6 }],
            "isMapVisible": true,
            "filterState": {
                "mapZoom": 11,
                "usersSearchTerm": self.search_term,
                "fore": { "value": false },
                "lau": { "value": self.laundry_required },
                "ah": { "value": true },
                "auc": { "value": false },
                "nc": { "value": false },
                "fr": { "value": true },
                "fsbo": { "value": false },
                "cmsn": { "value": false },
                "fsba": { "value": false },
                "ac": { "value": self.ac_required },
                "mp": { "max": self.max_price },
                "price": { "max": self.max_list_price },
                "beds": { "min": self.min_beds },
                "baths": { "min": self.min_baths },
                "apco": { "value": false },
                "apa": { "value": false },
                "con": { "value": false },
                "sqft": { "min": self.min_sqft },
            },
            "isListVisible": true,
        })
    }

    /// Full search URL with the criteria URL-encoded into the query string
    pub fn search_url(&self, base: &str) -> Result<Url> {
        let state = self.search_query_state().to_string();
        Url::parse_with_params(base, &[("searchQueryState", state)])
            .with_context(|| format!("Invalid search base URL: {}", base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_round_trips_criteria() {
        let criteria = FilterCriteria {
            max_price: 4500,
            min_beds: 3,
            ..FilterCriteria::default()
        };

        let url = criteria.search_url(ZILLOW_SEARCH_URL).unwrap();
        assert_eq!(url.path(), "/new-york-ny/rentals/");

        let (_, state) = url
            .query_pairs()
            .find(|(k, _)| k == "searchQueryState")
            .unwrap();
        let state: Value = serde_json::from_str(&state).unwrap();

        assert_eq!(state["filterState"]["mp"]["max"], 4500);
        assert_eq!(state["filterState"]["beds"]["min"], 3);
        assert_eq!(state["filterState"]["baths"]["min"], 2);
        assert_eq!(state["filterState"]["lau"]["value"], true);
        assert_eq!(state["filterState"]["sqft"]["min"], 2000);
        assert_eq!(state["filterState"]["price"]["max"], 778_217);
        assert_eq!(state["filterState"]["mapZoom"], 11);
        assert_eq!(state["filterState"]["usersSearchTerm"], "New York NY");
        assert_eq!(state["regionSelection"][0]["regionId"], 6181);
        assert!(state.get("mapZoom").is_none());
    }

    #[test]
    fn search_url_rejects_bad_base() {
        assert!(FilterCriteria::default().search_url("not a url").is_err());
    }
}
