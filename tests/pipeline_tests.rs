// End-to-end tests for the rental scout pipeline

use mockito::{Matcher, Server};
use rental_scout::{run, Config, DirectionsClient, FilterCriteria, ZillowScraper};
use serde_json::{json, Value};

fn listing(address: &str, zpid: u32, latitude: f64, longitude: f64) -> Value {
    json!({
        "zpid": zpid.to_string(),
        "latLong": { "latitude": latitude, "longitude": longitude },
        "address": address,
        "detailUrl": format!("/homedetails/{}_zpid/", zpid),
        "availabilityDate": "2024-07-01",
        "unformattedPrice": 5750,
        "beds": 4,
        "baths": 2
    })
}

fn search_page(entries: Vec<Value>) -> String {
    let data = json!({
        "props": {
            "pageProps": {
                "searchPageState": {
                    "cat1": { "searchResults": { "listResults": entries } }
                }
            }
        },
        "page": "/rentals"
    });
    format!(
        r#"<!DOCTYPE html><html><head><title>Rentals</title></head><body><div id="__next"></div><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        data
    )
}

fn directions_body(seconds: u64) -> String {
    json!({ "routes": [{ "legs": [{ "duration": { "text": "", "value": seconds } }] }] }).to_string()
}

async fn mock_directions(server: &mut Server, destination: &str, status: usize, body: String) {
    server
        .mock("GET", "/maps/api/directions/json")
        .match_query(Matcher::UrlEncoded("destination".into(), destination.into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_end_to_end_filter_and_export() {
    let mut server = Server::new_async().await;

    let mut half_bath = listing("50 Limit Blvd", 5, 40.75, -73.99);
    half_bath["baths"] = json!(2.5);

    let page = search_page(vec![
        listing("10 Near St", 1, 40.71, -74.00),
        listing("20 Far Ave", 2, 40.80, -73.95),
        json!({ "address": "30 Broken Rd", "beds": 4 }),
        listing("40 Mystery Pl", 4, 40.65, -73.97),
        half_bath,
    ]);
    let search = server
        .mock("GET", "/new-york-ny/rentals/")
        .match_query(Matcher::Regex("searchQueryState=".into()))
        .match_header("accept-language", "en-US,en;q=0.9")
        .match_header("user-agent", Matcher::Regex(r"^Mozilla/5\.0 .*Chrome/".into()))
        .match_header("accept", Matcher::Regex("^text/html,application/xhtml\\+xml".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page)
        .create_async()
        .await;

    mock_directions(&mut server, "10 Near St", 200, directions_body(1800)).await;
    mock_directions(&mut server, "20 Far Ave", 200, directions_body(61 * 60)).await;
    mock_directions(&mut server, "40 Mystery Pl", 200, r#"{"routes":[]}"#.to_string()).await;
    mock_directions(&mut server, "50 Limit Blvd", 200, directions_body(60 * 60 + 59)).await;

    let output = tempfile::tempdir().unwrap();
    let config = Config {
        google_api_key: "test-key".to_string(),
        output_dir: output.path().to_path_buf(),
        ..Config::default()
    };

    let scraper = ZillowScraper::with_base_url(
        &config.criteria,
        &format!("{}/new-york-ny/rentals/", server.url()),
    )
    .unwrap();
    let directions = DirectionsClient::with_base_url(
        config.google_api_key.clone(),
        format!("{}/maps/api/directions/json", server.url()),
    );

    let summary = run(&config, &scraper, &directions).await.unwrap();
    search.assert_async().await;

    assert_eq!(summary.scraped, 4);

    let addresses: Vec<_> = summary.kept.iter().map(|l| l.record.address.as_str()).collect();
    assert_eq!(addresses, vec!["10 Near St", "40 Mystery Pl", "50 Limit Blvd"]);

    let near = &summary.kept[0];
    assert_eq!(near.commute_minutes, Some(30));
    assert_eq!(near.url.as_deref(), Some("https://www.zillow.com/homedetails/1_zpid/"));

    let mystery = &summary.kept[1];
    assert_eq!(mystery.commute_minutes, None);
    assert_eq!(mystery.url, None);

    assert_eq!(summary.kept[2].commute_minutes, Some(60));
    assert_eq!(summary.kept[2].record.baths, 2.5);

    let points = shapefile::read_shapes_as::<_, shapefile::Point>(&summary.output).unwrap();
    let coords: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(coords, vec![(-74.00, 40.71), (-73.97, 40.65), (-73.99, 40.75)]);
}

#[tokio::test]
async fn test_blocked_search_page_is_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Any)
        .with_status(403)
        .with_body("captcha")
        .create_async()
        .await;

    let output = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: output.path().to_path_buf(),
        ..Config::default()
    };

    let scraper = ZillowScraper::with_base_url(&FilterCriteria::default(), &server.url()).unwrap();
    let directions = DirectionsClient::with_base_url("k".to_string(), server.url());

    assert!(run(&config, &scraper, &directions).await.is_err());
    assert!(!output.path().join("filtered_zillow_listings.shp").exists());
}
