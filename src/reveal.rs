use crate::RevealError;
use crate::features::capture::{ImageSelection, RawFileInfo, normalize_extracted, normalize_file_info};
use crate::features::device::DeviceInfo;
use crate::features::files::FileInfoSource;
use crate::features::location::{LocationProvider, resolve_location};
use crate::features::outcome::StepOutcome;
use crate::features::risk::assess_risks;
use crate::session::SessionStore;
use crate::structs::Metadata;
use bon::bon;
use chrono::Utc;
use std::time::Duration;

/// The main entry point for the harvest pipeline.
///
/// Holds the platform collaborators (file-system lookup, geolocation) and the
/// device descriptor. Create it once per session and reuse it for every
/// selected image.
///
/// ```rust
/// # use exif_reveal::{DeniedLocation, LocalFiles, MetadataHarvester};
/// let harvester = MetadataHarvester::builder()
///     .location(DeniedLocation)
///     .files(LocalFiles)
///     .build();
/// ```
pub struct MetadataHarvester<L, F> {
    location: L,
    files: F,
    device_info: DeviceInfo,
    processing_delay: Duration,
}

#[bon]
impl<L: LocationProvider, F: FileInfoSource> MetadataHarvester<L, F> {
    /// Constructs a `MetadataHarvester` via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `location: L` - Geolocation provider. Use [`crate::DeniedLocation`] when the platform has none.
    /// * `files: F` - File-info lookup for selected URIs.
    /// * `device_info: DeviceInfo` - (Default: [`DeviceInfo::current`]) The device descriptor attached to every record.
    /// * `processing_delay: Duration` - (Default: 2 s) How long the placeholder edit in [`Self::process_image`] takes.
    #[builder]
    pub fn new(
        location: L,
        files: F,
        #[builder(default = DeviceInfo::current())] device_info: DeviceInfo,
        #[builder(default = Duration::from_secs(2))] processing_delay: Duration,
    ) -> Self {
        Self {
            location,
            files,
            device_info,
            processing_delay,
        }
    }

    /// Builds the [`Metadata`] record for one image selection.
    ///
    /// Stages run in order: file info, capture normalization, device info,
    /// location, then risk assessment over the finished fields. A failed
    /// file-info lookup is recorded in `error` and the remaining stages still
    /// run; a missing or failed location leaves `location_data` empty.
    pub async fn harvest(&self, selection: &ImageSelection) -> Metadata {
        let mut metadata = Metadata::empty(Utc::now());

        let file_info: StepOutcome<RawFileInfo> =
            self.files.file_info(&selection.uri).await.into();
        match file_info {
            StepOutcome::Available(raw) => {
                metadata.file_info = Some(normalize_file_info(&selection.uri, &raw));
            }
            StepOutcome::Failed(reason) => {
                log::error!("Error extracting metadata: {reason}");
                metadata.error = Some(reason);
            }
            StepOutcome::Unavailable => {}
        }

        metadata.extracted_data = Some(normalize_extracted(selection));
        metadata.device_info = Some(self.device_info.clone());
        metadata.location_data = resolve_location(&self.location).await.ok();
        metadata.risk_assessment = assess_risks(&metadata);

        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string_pretty(&metadata) {
                log::debug!("Metadata harvested: {json}");
            }
        }
        metadata
    }

    /// Makes `selection` the current image, harvests it and records the
    /// result in `store` as both the newest entry and the current metadata.
    pub async fn select_image(&self, store: &SessionStore, selection: &ImageSelection) -> Metadata {
        store.set_current_image(&selection.uri);
        let metadata = self.harvest(selection).await;
        let id = store.record(metadata.clone());
        log::info!(
            "Harvested entry {id}: {} risk finding(s)",
            metadata.risk_assessment.len()
        );
        metadata
    }

    /// Placeholder "AI edit" of the current image.
    ///
    /// Waits the configured delay and returns the current image unchanged as
    /// the processed result. Once started the wait runs to completion.
    ///
    /// # Errors
    ///
    /// * [`RevealError::NoImageSelected`] if the store has no current image.
    /// * [`RevealError::EmptyPrompt`] if `prompt` is blank.
    pub async fn process_image(
        &self,
        store: &SessionStore,
        prompt: &str,
    ) -> Result<String, RevealError> {
        let image = store.current_image().ok_or(RevealError::NoImageSelected)?;
        if prompt.trim().is_empty() {
            return Err(RevealError::EmptyPrompt);
        }

        log::info!("Processing image with prompt {:?}", prompt.trim());
        tokio::time::sleep(self.processing_delay).await;
        store.set_processed_image(image.clone());
        Ok(image)
    }
}
