pub mod traits;
pub mod types;
pub mod zillow;

pub use traits::ListingSource;
pub use types::{FilterCriteria, MapBounds};
pub use zillow::{parse_listings, ZillowScraper};
