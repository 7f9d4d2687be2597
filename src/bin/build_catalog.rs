use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use starhop_engine::catalog::catalog::StarCatalog;
use starhop_engine::catalog::loader::{entry_from_row, RawStarRow};
use starhop_engine::data::write_catalog_to_file;
use tempfile::NamedTempFile;

/// Stars beyond this distance are not part of the neighborhood bundle.
const LOAD_CUTOFF_LY: f32 = 20.0;

const NAME_COLUMN: &str = "Common Name";
const DISTANCE_COLUMN: &str = "Distance (ly)";
const MAGNITUDE_COLUMN: &str = "Abs Mag";
const GALACTIC_L_COLUMN: &str = "Galactic Coordinates (l\u{b0})";
const GALACTIC_B_COLUMN: &str = "Galactic Coordinates (b\u{b0})";
const GALACTIC_COMBINED_COLUMN: &str = "Galactic Coordinates (l\u{b0} b\u{b0})";

#[derive(Debug, Serialize)]
struct CatalogMetadata {
    source: String,
    stars: usize,
    skipped_rows: usize,
    load_cutoff_ly: f32,
    generated_at_epoch: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let source = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: build_catalog <stars.csv path or URL>"))?;

    let (catalog, skipped) = if source.starts_with("http://") || source.starts_with("https://") {
        let temp_file = download_source(&source)?;
        build_catalog_from_csv(temp_file.path())
            .with_context(|| format!("failed to build catalog from {source}"))?
    } else {
        build_catalog_from_csv(Path::new(&source))
            .with_context(|| format!("failed to build catalog from {source}"))?
    };

    let output_dir = PathBuf::from("data");
    fs::create_dir_all(&output_dir).context("failed to create data output directory")?;
    let bundle_path = output_dir.join("catalog.bin");
    write_catalog_to_file(&catalog, &bundle_path)
        .with_context(|| format!("failed to write catalog to {}", bundle_path.display()))?;

    let metadata = CatalogMetadata {
        source,
        stars: catalog.len(),
        skipped_rows: skipped,
        load_cutoff_ly: LOAD_CUTOFF_LY,
        generated_at_epoch: current_epoch_seconds(),
    };
    let metadata_path = output_dir.join("catalog.meta.json");
    let metadata_json = serde_json::to_vec_pretty(&metadata)?;
    fs::write(&metadata_path, metadata_json)
        .with_context(|| format!("failed to write metadata to {}", metadata_path.display()))?;

    info!(
        "Wrote catalog bundle to {} ({} stars, {} rows skipped)",
        bundle_path.display(),
        metadata.stars,
        metadata.skipped_rows
    );

    Ok(())
}

fn download_source(url: &str) -> Result<NamedTempFile> {
    let client = Client::builder()
        .user_agent("starhop-engine-catalog-builder/0.1")
        .build()?;
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to download {url}"))?
        .error_for_status()
        .context("catalog download returned an error status")?;
    let mut file = NamedTempFile::new()?;
    response.copy_to(&mut file)?;
    Ok(file)
}

fn build_catalog_from_csv(path: &Path) -> Result<(StarCatalog, usize)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open CSV at {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("CSV has no header row")?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let mut stars = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let row = match raw_row_from_record(&headers, &record) {
            Some(row) => row,
            None => {
                skipped += 1;
                continue;
            }
        };
        let name = row.name.clone();
        match entry_from_row(row, LOAD_CUTOFF_LY) {
            Some(entry) => stars.push(entry),
            None => {
                warn!("skipping row for {name:?}: missing distance or beyond cutoff");
                skipped += 1;
            }
        }
    }

    Ok((StarCatalog::new(stars), skipped))
}

fn raw_row_from_record(headers: &[String], record: &csv::StringRecord) -> Option<RawStarRow> {
    let mut columns: HashMap<&str, &str> = HashMap::new();
    for (header, value) in headers.iter().zip(record.iter()) {
        let value = value.trim();
        if !value.is_empty() && value != "--" {
            columns.insert(header.as_str(), value);
        }
    }

    let name = (*columns.get(NAME_COLUMN)?).to_owned();

    // Coordinates arrive either as two columns or one combined "l, b" cell.
    let (galactic_l_deg, galactic_b_deg) = match (
        columns.get(GALACTIC_L_COLUMN),
        columns.get(GALACTIC_B_COLUMN),
    ) {
        (Some(l), Some(b)) => (l.parse().ok(), b.parse().ok()),
        _ => match columns.get(GALACTIC_COMBINED_COLUMN) {
            Some(combined) => parse_combined_coordinates(combined),
            None => (None, None),
        },
    };

    let side_data = columns
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();

    Some(RawStarRow {
        name,
        distance_ly: columns.get(DISTANCE_COLUMN).and_then(|v| v.parse().ok()),
        abs_magnitude: columns.get(MAGNITUDE_COLUMN).and_then(|v| v.parse().ok()),
        galactic_l_deg,
        galactic_b_deg,
        side_data,
    })
}

fn parse_combined_coordinates(combined: &str) -> (Option<f32>, Option<f32>) {
    let mut parts = combined.split(',');
    let l = parts.next().and_then(|p| p.trim().parse().ok());
    let b = parts.next().and_then(|p| p.trim().parse().ok());
    (l, b)
}

fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
