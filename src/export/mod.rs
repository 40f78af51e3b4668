use crate::models::FilteredListing;
use anyhow::{anyhow, Context, Result};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const OUTPUT_FILE_NAME: &str = "filtered_zillow_listings.shp";

/// WGS 84 (EPSG:4326) in the ESRI WKT dialect expected in `.prj` files
const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// dBase character fields cap out at 254 bytes
const MAX_CHARACTER_LEN: u8 = 254;

/// Write the listings as a point shapefile in `output_dir`.
///
/// Produces `.shp`, `.shx`, `.dbf` and `.prj` files and returns the path of
/// the `.shp`. Points are (longitude, latitude).
pub fn export_shapefile(listings: &[FilteredListing], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let shp_path = output_dir.join(OUTPUT_FILE_NAME);
    let mut writer = shapefile::Writer::from_path(&shp_path, table_builder()?)
        .with_context(|| format!("Failed to create {}", shp_path.display()))?;

    for listing in listings {
        let point = listing.record.point();
        let shape = shapefile::Point::new(point.x(), point.y());
        writer
            .write_shape_and_record(&shape, &attributes(listing))
            .with_context(|| format!("Failed to write {}", listing.record.address))?;
    }
    // headers and the index are finalized on drop
    drop(writer);

    let prj_path = shp_path.with_extension("prj");
    fs::write(&prj_path, WGS84_PRJ)
        .with_context(|| format!("Failed to write {}", prj_path.display()))?;

    info!("Exported {} listings to {}", listings.len(), shp_path.display());

    Ok(shp_path)
}

fn field(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|e| anyhow!("Invalid dBase field name {}: {:?}", name, e))
}

fn table_builder() -> Result<TableWriterBuilder> {
    Ok(TableWriterBuilder::new()
        .add_numeric_field(field("Latitude")?, 18, 10)
        .add_numeric_field(field("Longitude")?, 18, 10)
        .add_character_field(field("Address")?, MAX_CHARACTER_LEN)
        .add_character_field(field("URL")?, MAX_CHARACTER_LEN)
        .add_character_field(field("DateAvail")?, 32)
        .add_numeric_field(field("Price")?, 12, 0)
        .add_numeric_field(field("Beds")?, 6, 1)
        .add_numeric_field(field("Baths")?, 6, 1)
        .add_logical_field(field("Laundry")?)
        .add_logical_field(field("AC")?)
        .add_character_field(field("detailUrl")?, MAX_CHARACTER_LEN)
        .add_numeric_field(field("MinTransit")?, 6, 0))
}

fn attributes(listing: &FilteredListing) -> Record {
    let r = &listing.record;
    let mut record = Record::default();

    record.insert("Latitude".to_string(), FieldValue::Numeric(Some(r.latitude)));
    record.insert("Longitude".to_string(), FieldValue::Numeric(Some(r.longitude)));
    record.insert("Address".to_string(), text(&r.address, MAX_CHARACTER_LEN));
    record.insert("URL".to_string(), text(&r.detail_path, MAX_CHARACTER_LEN));
    record.insert("DateAvail".to_string(), text(&r.available_date, 32));
    record.insert("Price".to_string(), FieldValue::Numeric(Some(r.price as f64)));
    record.insert("Beds".to_string(), FieldValue::Numeric(Some(r.beds)));
    record.insert("Baths".to_string(), FieldValue::Numeric(Some(r.baths)));
    record.insert("Laundry".to_string(), FieldValue::Logical(Some(r.laundry)));
    record.insert("AC".to_string(), FieldValue::Logical(Some(r.air_conditioning)));
    record.insert(
        "detailUrl".to_string(),
        FieldValue::Character(
            listing
                .url
                .as_deref()
                .map(|url| truncate(url, MAX_CHARACTER_LEN).to_string()),
        ),
    );
    record.insert(
        "MinTransit".to_string(),
        FieldValue::Numeric(listing.commute_minutes.map(f64::from)),
    );

    record
}

fn text(value: &str, max_len: u8) -> FieldValue {
    FieldValue::Character(Some(truncate(value, max_len).to_string()))
}

/// Longest prefix of at most `max_len` bytes ending on a char boundary
fn truncate(value: &str, max_len: u8) -> &str {
    let max_len = usize::from(max_len);
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
