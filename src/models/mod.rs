use geo::Point;
use serde::{Deserialize, Serialize};

/// Source of the rental listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Source {
    Zillow,
}

impl Source {
    /// Origin that relative detail paths are resolved against
    pub fn origin(&self) -> &'static str {
        match self {
            Source::Zillow => "https://www.zillow.com",
        }
    }
}

/// One fully populated rental listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    /// Relative URL of the listing's detail page
    pub detail_path: String,
    pub available_date: String,
    pub price: i64,
    /// Bedroom count; Zillow can report fractional values
    pub beds: f64,
    /// Bathroom count, e.g. `2.5` for two full baths and a half bath
    pub baths: f64,
    pub laundry: bool,
    pub air_conditioning: bool,
}

impl ListingRecord {
    /// Point geometry in (longitude, latitude) order
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// A listing that survived the commute filter.
///
/// `url` and `commute_minutes` are set together when the commute lookup
/// succeeded, and both left empty when it could not be resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilteredListing {
    pub record: ListingRecord,
    pub url: Option<String>,
    pub commute_minutes: Option<u32>,
}

impl FilteredListing {
    pub fn unannotated(record: ListingRecord) -> Self {
        Self {
            record,
            url: None,
            commute_minutes: None,
        }
    }

    pub fn annotated(record: ListingRecord, url: String, commute_minutes: u32) -> Self {
        Self {
            record,
            url: Some(url),
            commute_minutes: Some(commute_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_uses_longitude_as_x() {
        let record = ListingRecord {
            latitude: 40.71,
            longitude: -74.01,
            address: "1 Main St".to_string(),
            detail_path: "/homedetails/1".to_string(),
            available_date: "2024-05-01".to_string(),
            price: 5000,
            beds: 4.0,
            baths: 2.0,
            laundry: true,
            air_conditioning: true,
        };

        let point = record.point();
        assert_eq!(point.x(), -74.01);
        assert_eq!(point.y(), 40.71);
    }
}
