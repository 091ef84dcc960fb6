//! Privacy-risk findings derived from a harvested [`Metadata`] record.
//!
//! The rules run in a fixed order and independently of each other, so
//! several findings can fire for one record. The order of [`RULES`] is the
//! order of the resulting list.

use crate::features::capture::ExifData;
use crate::features::display::NOT_APPLICABLE;
use crate::structs::Metadata;
use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Badge colour used when rendering the level.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Medium => "#eab308",
            Self::High => "#f97316",
            Self::Critical => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RiskFinding {
    pub level: RiskLevel,
    pub category: String,
    pub description: String,
    /// The exposed value that triggered the finding.
    pub data: String,
}

impl RiskFinding {
    fn new(level: RiskLevel, category: &str, description: &str, data: String) -> Self {
        Self {
            level,
            category: category.to_string(),
            description: description.to_string(),
            data,
        }
    }
}

type Rule = fn(&Metadata) -> Option<RiskFinding>;

const RULES: [Rule; 6] = [
    location_tracking,
    address_exposure,
    photo_location,
    device_fingerprinting,
    timestamp_analysis,
    platform_information,
];

fn location_tracking(metadata: &Metadata) -> Option<RiskFinding> {
    let location = metadata.location_data.as_ref()?;
    Some(RiskFinding::new(
        RiskLevel::High,
        "Location Tracking",
        "Your current GPS location was captured. An attacker could track your movements.",
        format!("{}, {}", location.latitude, location.longitude),
    ))
}

fn address_exposure(metadata: &Metadata) -> Option<RiskFinding> {
    let address = metadata.location_data.as_ref()?.address.as_ref()?;
    let or_na = |part: &Option<String>| part.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string());
    Some(RiskFinding::new(
        RiskLevel::Critical,
        "Address Exposure",
        "Your physical address could be determined from GPS coordinates.",
        format!("{}, {}", or_na(&address.street), or_na(&address.city)),
    ))
}

fn photo_location(metadata: &Metadata) -> Option<RiskFinding> {
    ExifData::known(&metadata.exif()?.gps_latitude)?;
    Some(RiskFinding::new(
        RiskLevel::High,
        "Photo Location",
        "The photo contains embedded GPS coordinates showing where it was taken.",
        "GPS data embedded in image EXIF".to_string(),
    ))
}

fn device_fingerprinting(metadata: &Metadata) -> Option<RiskFinding> {
    let exif = metadata.exif()?;
    let make = ExifData::known(&exif.make)?;
    Some(RiskFinding::new(
        RiskLevel::Medium,
        "Device Fingerprinting",
        "Camera make and model reveals device information for fingerprinting.",
        format!("{make} {}", exif.model),
    ))
}

fn timestamp_analysis(metadata: &Metadata) -> Option<RiskFinding> {
    let date_time = ExifData::known(&metadata.exif()?.date_time)?;
    Some(RiskFinding::new(
        RiskLevel::Medium,
        "Timestamp Analysis",
        "Photo timestamp reveals when the image was taken.",
        date_time.to_string(),
    ))
}

fn platform_information(metadata: &Metadata) -> Option<RiskFinding> {
    let device = metadata.device_info.as_ref()?;
    Some(RiskFinding::new(
        RiskLevel::Low,
        "Platform Information",
        "Device platform and OS version collected.",
        format!("{} {}", device.platform, device.version),
    ))
}

/// Evaluates every rule against `metadata`, in order.
///
/// The record's own `risk_assessment` is ignored, so this can run on a
/// record whose other fields are final.
pub fn assess_risks(metadata: &Metadata) -> Vec<RiskFinding> {
    RULES.iter().filter_map(|rule| rule(metadata)).collect()
}
