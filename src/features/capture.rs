use crate::features::error::SelectionError;
use crate::RevealError;
use exiftool::ExifTool;
use mime_guess::MimeGuess;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Fallback for any EXIF field the capture did not provide.
pub const NOT_AVAILABLE: &str = "Not available";

/// Fallback for file name, MIME type and file size.
pub const UNKNOWN: &str = "Unknown";

const DEFAULT_KIND: &str = "image";

/// Raw image-selection result handed over by a picker or camera.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSelection {
    pub uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub exif: Option<Map<String, Value>>,
}

/// Raw result of a file-system info lookup.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawFileInfo {
    pub size: Option<u64>,
    pub exists: bool,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExifData {
    pub make: String,
    pub model: String,
    pub software: String,
    pub date_time: String,
    pub gps_latitude: String,
    pub gps_longitude: String,
    pub gps_altitude: String,
    pub orientation: String,
    pub flash: String,
    pub focal_length: String,
    pub exposure_time: String,
    pub aperture: String,
    pub iso: String,
}

impl ExifData {
    /// Returns `value` unless it is the [`NOT_AVAILABLE`] sentinel.
    pub fn known(value: &str) -> Option<&str> {
        (value != NOT_AVAILABLE).then_some(value)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_name: String,
    pub file_size: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifData>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub uri: String,
    pub size: String,
    pub exists: bool,
    pub is_directory: bool,
}

type ExifSetter = fn(&mut ExifData, String);

/// Output field, upstream tag names in order of preference.
const EXIF_FIELDS: [(ExifSetter, &[&str]); 13] = [
    (|e, v| e.make = v, &["Make"]),
    (|e, v| e.model = v, &["Model"]),
    (|e, v| e.software = v, &["Software"]),
    (|e, v| e.date_time = v, &["DateTime", "DateTimeOriginal"]),
    (|e, v| e.gps_latitude = v, &["GPSLatitude"]),
    (|e, v| e.gps_longitude = v, &["GPSLongitude"]),
    (|e, v| e.gps_altitude = v, &["GPSAltitude"]),
    (|e, v| e.orientation = v, &["Orientation"]),
    (|e, v| e.flash = v, &["Flash"]),
    (|e, v| e.focal_length = v, &["FocalLength"]),
    (|e, v| e.exposure_time = v, &["ExposureTime"]),
    (|e, v| e.aperture = v, &["FNumber", "ApertureValue"]),
    (|e, v| e.iso = v, &["ISOSpeedRatings", "ISO"]),
];

/// Formats a byte count as kilobytes with two decimals, e.g. `2048` -> `"2.00 KB"`.
/// Ties round up: `128` -> `"0.13 KB"`.
pub fn format_file_size(bytes: Option<u64>) -> String {
    bytes.map_or_else(
        || UNKNOWN.to_string(),
        |b| {
            let hundredths = (b as f64 * 100.0 / 1024.0).round();
            format!("{:.2} KB", hundredths / 100.0)
        },
    )
}

fn exif_value(exif: &Map<String, Value>, key: &str) -> Option<String> {
    match exif.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolves every EXIF field from the first present source tag, or the sentinel.
pub fn normalize_exif(exif: &Map<String, Value>) -> ExifData {
    let mut data = ExifData {
        make: NOT_AVAILABLE.to_string(),
        model: NOT_AVAILABLE.to_string(),
        software: NOT_AVAILABLE.to_string(),
        date_time: NOT_AVAILABLE.to_string(),
        gps_latitude: NOT_AVAILABLE.to_string(),
        gps_longitude: NOT_AVAILABLE.to_string(),
        gps_altitude: NOT_AVAILABLE.to_string(),
        orientation: NOT_AVAILABLE.to_string(),
        flash: NOT_AVAILABLE.to_string(),
        focal_length: NOT_AVAILABLE.to_string(),
        exposure_time: NOT_AVAILABLE.to_string(),
        aperture: NOT_AVAILABLE.to_string(),
        iso: NOT_AVAILABLE.to_string(),
    };
    for (set, sources) in EXIF_FIELDS {
        if let Some(value) = sources.iter().find_map(|key| exif_value(exif, key)) {
            set(&mut data, value);
        }
    }
    data
}

pub fn normalize_extracted(selection: &ImageSelection) -> ExtractedData {
    let or_default = |value: &Option<String>, fallback: &str| {
        value
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    ExtractedData {
        width: selection.width,
        height: selection.height,
        kind: or_default(&selection.kind, DEFAULT_KIND),
        file_name: or_default(&selection.file_name, UNKNOWN),
        file_size: format_file_size(selection.file_size),
        mime_type: or_default(&selection.mime_type, UNKNOWN),
        exif: selection.exif.as_ref().map(normalize_exif),
    }
}

pub fn normalize_file_info(uri: &str, raw: &RawFileInfo) -> FileInfo {
    FileInfo {
        uri: uri.to_string(),
        size: format_file_size(raw.size),
        exists: raw.exists,
        is_directory: raw.is_directory,
    }
}

fn get_u32(tags: &Map<String, Value>, key: &str) -> Option<u32> {
    tags.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn get_string(tags: &Map<String, Value>, key: &str) -> Option<String> {
    tags.get(key).and_then(Value::as_str).map(str::to_owned)
}

impl ImageSelection {
    /// Builds a selection result for a photo on disk, the way a gallery picker
    /// with EXIF enabled would report it.
    ///
    /// Reads numeric (`-n`) exiftool output, so GPS coordinates arrive as signed
    /// decimal degrees and `FileSize` as a byte count.
    ///
    /// # Errors
    ///
    /// * [`RevealError::Exiftool`] if exiftool cannot read the file.
    /// * [`RevealError::Selection`] if the file is not an image or exiftool
    ///   returned no tags.
    pub fn from_file(exiftool: &mut ExifTool, path: &Path) -> Result<Self, RevealError> {
        let numeric_exif = exiftool.json(path, &["-n"])?;
        Ok(Self::from_exiftool_json(path, numeric_exif)?)
    }

    /// Maps one file's `exiftool -n -json` object onto a selection result.
    ///
    /// The MIME type falls back to a guess from the file extension when
    /// exiftool does not report one.
    pub fn from_exiftool_json(path: &Path, numeric_exif: Value) -> Result<Self, SelectionError> {
        let Value::Object(mut tags) = numeric_exif else {
            return Err(SelectionError::NoTags);
        };

        let mime_type = get_string(&tags, "MIMEType").unwrap_or_else(|| {
            MimeGuess::from_path(path)
                .first_or_octet_stream()
                .to_string()
        });
        if !mime_type.starts_with("image/") {
            return Err(SelectionError::UnsupportedFileType(mime_type));
        }

        // Pickers report the modification stamp as `DateTime`; exiftool names it `ModifyDate`.
        if !tags.contains_key("DateTime") {
            if let Some(modified) = tags.get("ModifyDate").cloned() {
                tags.insert("DateTime".to_string(), modified);
            }
        }

        Ok(Self {
            uri: format!("file://{}", path.display()),
            width: get_u32(&tags, "ImageWidth"),
            height: get_u32(&tags, "ImageHeight"),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            file_size: tags.get("FileSize").and_then(Value::as_u64),
            mime_type: Some(mime_type),
            kind: Some(DEFAULT_KIND.to_string()),
            exif: Some(tags),
        })
    }
}
