use exif_reveal::{
    Coords, DeniedLocation, ImageSelection, LocalFiles, LocationProvider, MetadataHarvester,
    OfflineLocation, PositionReading, SessionStore, format_for_display,
};
use exiftool::ExifTool;
use std::path::Path;

// Usage: cargo run --example reveal_photo -- <photo> [latitude longitude]

async fn reveal<L: LocationProvider>(location: L, selection: &ImageSelection) -> color_eyre::Result<()> {
    let harvester = MetadataHarvester::builder()
        .location(location)
        .files(LocalFiles)
        .build();
    let store = SessionStore::new();
    let metadata = harvester.select_image(&store, selection).await;

    println!("Risk findings:");
    for finding in &metadata.risk_assessment {
        println!("  [{:?}] {}: {}", finding.level, finding.category, finding.data);
    }
    for section in format_for_display(&metadata) {
        println!("{} ({})", section.title, section.icon);
        for row in section.rows {
            println!("  {}: {}", row.label, row.value);
        }
    }
    println!("{}", serde_json::to_string_pretty(&store.statistics())?);

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first().map(Path::new) else {
        color_eyre::eyre::bail!("usage: reveal_photo <image> [latitude longitude]");
    };
    let mut exiftool = ExifTool::new()?;
    let selection = ImageSelection::from_file(&mut exiftool, path)?;

    match (args.get(1), args.get(2)) {
        (Some(lat), Some(lon)) => {
            let reading = PositionReading {
                coords: Coords {
                    latitude: lat.parse()?,
                    longitude: lon.parse()?,
                    altitude: None,
                    accuracy: Some(10.0),
                },
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            reveal(OfflineLocation::new(reading), &selection).await
        }
        _ => reveal(DeniedLocation, &selection).await,
    }
}
