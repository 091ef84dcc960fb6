use crate::features::capture::ExifData;
use crate::structs::Metadata;
use serde::{Deserialize, Serialize};

/// Row value shown for anything missing at display time.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

impl DisplayRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    fn or_na(label: &str, value: Option<impl ToString>) -> Self {
        Self::new(
            label,
            value.map_or_else(|| NOT_APPLICABLE.to_string(), |v| v.to_string()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplaySection {
    pub title: String,
    pub icon: String,
    pub rows: Vec<DisplayRow>,
}

impl DisplaySection {
    fn new(title: &str, icon: &str, rows: Vec<DisplayRow>) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            rows,
        }
    }
}

/// Groups a record into titled label/value sections for rendering.
///
/// Never fails: "Image Properties" and "Device Fingerprint" are always
/// present, with `N/A` rows for whatever the record lacks. EXIF values are
/// shown verbatim, including the `Not available` sentinel.
pub fn format_for_display(metadata: &Metadata) -> Vec<DisplaySection> {
    let mut sections = Vec::new();

    if let Some(location) = &metadata.location_data {
        let mut rows = vec![
            DisplayRow::new("Latitude", format!("{:.6}", location.latitude)),
            DisplayRow::new("Longitude", format!("{:.6}", location.longitude)),
            DisplayRow::or_na("Accuracy", location.accuracy.map(|a| format!("{}m", a.round()))),
        ];
        if let Some(address) = &location.address {
            rows.extend([
                DisplayRow::or_na("Street", address.street.as_deref()),
                DisplayRow::or_na("City", address.city.as_deref()),
                DisplayRow::or_na("Region", address.region.as_deref()),
                DisplayRow::or_na("Country", address.country.as_deref()),
            ]);
        }
        sections.push(DisplaySection::new("Current Location", "location", rows));
    }

    if let Some(exif) = metadata.exif() {
        sections.push(DisplaySection::new(
            "Camera/Device Info",
            "camera",
            vec![
                DisplayRow::new("Make", &exif.make),
                DisplayRow::new("Model", &exif.model),
                DisplayRow::new("Software", &exif.software),
                DisplayRow::new("Date Taken", &exif.date_time),
            ],
        ));

        if ExifData::known(&exif.gps_latitude).is_some() {
            sections.push(DisplaySection::new(
                "Photo GPS Location",
                "map",
                vec![
                    DisplayRow::new("Latitude", &exif.gps_latitude),
                    DisplayRow::new("Longitude", &exif.gps_longitude),
                    DisplayRow::new("Altitude", &exif.gps_altitude),
                ],
            ));
        }
    }

    let extracted = metadata.extracted_data.as_ref();
    let dimensions = extracted
        .and_then(|e| e.width.zip(e.height))
        .map(|(w, h)| format!("{w}x{h}"));
    sections.push(DisplaySection::new(
        "Image Properties",
        "image",
        vec![
            DisplayRow::or_na("Dimensions", dimensions),
            DisplayRow::or_na("File Name", extracted.map(|e| &e.file_name)),
            DisplayRow::or_na("File Size", extracted.map(|e| &e.file_size)),
            DisplayRow::or_na("Type", extracted.map(|e| &e.mime_type)),
        ],
    ));

    let device = metadata.device_info.as_ref();
    sections.push(DisplaySection::new(
        "Device Fingerprint",
        "phone",
        vec![
            DisplayRow::or_na("Platform", device.map(|d| &d.platform)),
            DisplayRow::or_na("OS Version", device.map(|d| d.version.to_string())),
        ],
    ));

    sections
}
