use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileInfoError {
    #[error("Could not read file info for {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission request failed: {0}")]
    Permission(String),

    #[error("Current position is unavailable: {0}")]
    Position(String),

    #[error("Reverse geocoding failed: {0}")]
    Geocode(String),
}

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Exiftool returned no tag object for the file")]
    NoTags,

    #[error("Unsupported file type for image selection: {0}")]
    UnsupportedFileType(String),
}
