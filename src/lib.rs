//! # Exif Reveal
//!
//! Show what a photo and its surroundings give away.
//!
//! This crate takes what a platform image picker and geolocation API hand
//! back for a selected photo, normalizes it into one [`Metadata`] record, and
//! derives the privacy risks that record exposes. It is the core of an
//! educational "look what this app just collected" demo: no image is
//! modified and nothing leaves the process.
//!
//! ## Pipeline
//!
//! - **Capture normalization**: picker fields and the EXIF block become
//!   [`ExtractedData`] and [`FileInfo`], with every absent EXIF tag set to the
//!   `"Not available"` sentinel.
//! - **Location resolution**: one permission check, one position read and one
//!   reverse-geocode lookup, each best-effort.
//! - **Risk assessment**: a fixed, ordered rule list producing [`RiskFinding`]s.
//! - **Display projection**: [`format_for_display`] turns a record into titled
//!   label/value sections.
//! - **Session store**: [`SessionStore`] keeps every record of the session and
//!   aggregate [`SessionStatistics`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exif_reveal::{LocalFiles, MetadataHarvester, OfflineLocation, SessionStore};
//! use exif_reveal::{Coords, ImageSelection, PositionReading, format_for_display};
//!
//! #[tokio::main]
//! async fn main() {
//!     let harvester = MetadataHarvester::builder()
//!         .location(OfflineLocation::new(PositionReading {
//!             coords: Coords { latitude: 52.37, longitude: 4.89, altitude: None, accuracy: Some(10.0) },
//!             timestamp: 1_717_243_200_000,
//!         }))
//!         .files(LocalFiles)
//!         .build();
//!     let store = SessionStore::new();
//!
//!     let selection = ImageSelection { uri: "file:///tmp/photo.jpg".into(), ..Default::default() };
//!     let metadata = harvester.select_image(&store, &selection).await;
//!
//!     for finding in &metadata.risk_assessment {
//!         println!("[{:?}] {}: {}", finding.level, finding.category, finding.data);
//!     }
//!     for section in format_for_display(&metadata) {
//!         println!("{}: {} rows", section.title, section.rows.len());
//!     }
//!     println!("{:?}", store.statistics());
//! }
//! ```

mod error;
pub mod features;
pub mod reveal;
pub mod session;
pub mod structs;

pub use error::RevealError;
pub use features::capture::{
    ExifData, ExtractedData, FileInfo, ImageSelection, NOT_AVAILABLE, RawFileInfo,
    format_file_size,
};
pub use features::device::{DeviceInfo, OsVersion};
pub use features::display::{DisplayRow, DisplaySection, format_for_display};
pub use features::files::{FileInfoSource, LocalFiles};
pub use features::location::{
    Address, Coords, DeniedLocation, LocationData, LocationProvider, OfflineLocation,
    PermissionStatus, PositionReading,
};
pub use features::outcome::StepOutcome;
pub use features::risk::{RiskFinding, RiskLevel, assess_risks};
pub use reveal::MetadataHarvester;
pub use session::{HarvestEntry, SessionStatistics, SessionStore};
pub use structs::Metadata;
