use crate::commute::CommuteEstimator;
use crate::config::{CommuteSettings, Config};
use crate::export::export_shapefile;
use crate::models::{FilteredListing, ListingRecord, Source};
use crate::scrapers::ListingSource;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Result of one end-to-end run
#[derive(Debug)]
pub struct RunSummary {
    pub scraped: usize,
    pub kept: Vec<FilteredListing>,
    pub output: PathBuf,
}

/// Fetch, filter by commute, and export in one pass
pub async fn run(
    config: &Config,
    source: &dyn ListingSource,
    estimator: &dyn CommuteEstimator,
) -> Result<RunSummary> {
    let listings = source.listings().await?;
    let scraped = listings.len();

    let kept = filter_by_commute(listings, source.source(), &config.commute, estimator).await?;
    let output = export_shapefile(&kept, &config.output_dir)?;

    Ok(RunSummary {
        scraped,
        kept,
        output,
    })
}

/// Keep the listings that are within commuting distance.
///
/// Each listing is looked up once, in order. Listings over the limit are
/// dropped. Listings whose commute could not be resolved are kept as they
/// were, without a URL or duration.
pub async fn filter_by_commute(
    listings: Vec<ListingRecord>,
    source: Source,
    settings: &CommuteSettings,
    estimator: &dyn CommuteEstimator,
) -> Result<Vec<FilteredListing>> {
    let total = listings.len();
    let mut kept = Vec::with_capacity(total);

    for record in listings {
        let url = format!("{}{}", source.origin(), record.detail_path);
        let query = settings.query_for(&record.address)?;

        match estimator.duration_minutes(&query).await? {
            Some(minutes) if minutes <= query.max_minutes => {
                debug!("Keeping {} ({} min)", record.address, minutes);
                kept.push(FilteredListing::annotated(record, url, minutes));
            }
            Some(minutes) => {
                info!(
                    "Dropping {} because transit time = {}",
                    record.address, minutes
                );
            }
            None => {
                debug!("Keeping {} with unknown commute", record.address);
                kept.push(FilteredListing::unannotated(record));
            }
        }
    }

    info!("{} of {} listings passed the commute filter", kept.len(), total);

    Ok(kept)
}
