use rental_scout::{run, Config, DirectionsClient, ZillowScraper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Rental Scout - Zillow commute filter");
    info!("=======================================");

    let config = Config::from_env()?;

    let scraper = ZillowScraper::new(&config.criteria)?;
    let directions = DirectionsClient::new(config.google_api_key.clone());

    info!(
        "Searching rentals within {} min by {} of {}",
        config.commute.max_transit_minutes, config.commute.transit_mode, config.commute.origin_address
    );

    let summary = run(&config, &scraper, &directions).await?;

    info!(
        "✅ {} of {} listings passed the commute filter",
        summary.kept.len(),
        summary.scraped
    );

    for (i, listing) in summary.kept.iter().enumerate() {
        let record = &listing.record;
        println!("{}. {} (${}/mo)", i + 1, record.address, record.price);
        println!("   {} bd, {} ba, available {}", record.beds, record.baths, record.available_date);
        match listing.commute_minutes {
            Some(minutes) => println!("   Commute: {} min", minutes),
            None => println!("   Commute: unknown"),
        }
        if let Some(url) = &listing.url {
            println!("   URL: {}", url);
        }
        println!();
    }

    info!("💾 Saved shapefile to {}", summary.output.display());

    Ok(())
}
