use crate::features::capture::{ExifData, ExtractedData, FileInfo};
use crate::features::device::DeviceInfo;
use crate::features::location::LocationData;
use crate::features::risk::RiskFinding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything harvested from one image selection.
///
/// Built once by [`crate::MetadataHarvester::harvest`] and never changed
/// afterwards. `risk_assessment` is derived last, from the other fields.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Capture time.
    pub timestamp: DateTime<Utc>,
    pub extracted_data: Option<ExtractedData>,
    pub device_info: Option<DeviceInfo>,
    pub location_data: Option<LocationData>,
    pub file_info: Option<FileInfo>,
    pub risk_assessment: Vec<RiskFinding>,
    /// Set when a collection step failed and the record is partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Metadata {
    /// An empty record stamped with `timestamp`.
    pub const fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            extracted_data: None,
            device_info: None,
            location_data: None,
            file_info: None,
            risk_assessment: Vec::new(),
            error: None,
        }
    }

    pub fn exif(&self) -> Option<&ExifData> {
        self.extracted_data.as_ref()?.exif.as_ref()
    }
}
