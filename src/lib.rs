//! Rental scout: finds rentals on Zillow that are within commuting distance
//! of a fixed address and exports them as a point shapefile.

pub mod commute;
pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod scrapers;

pub use commute::{CommuteEstimator, CommuteQuery, DirectionsClient};
pub use config::{CommuteSettings, Config};
pub use models::{FilteredListing, ListingRecord, Source};
pub use pipeline::{filter_by_commute, run, RunSummary};
pub use scrapers::{FilterCriteria, ListingSource, ZillowScraper};
