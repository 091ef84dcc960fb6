use thiserror::Error;

/// The primary error type for the exif-reveal crate.
///
/// Collection failures inside the harvest pipeline never surface here; they
/// degrade to a partial [`crate::Metadata`] record instead. This type covers
/// the calls a user makes directly.
#[derive(Error, Debug)]
pub enum RevealError {
    #[error("Exiftool failed to execute or process the file")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("Image selection failed: {0}")]
    Selection(#[from] crate::features::error::SelectionError),

    // --- User input errors ---
    #[error("Please select an image first")]
    NoImageSelected,

    #[error("Please enter a prompt describing how to edit the image")]
    EmptyPrompt,
}
