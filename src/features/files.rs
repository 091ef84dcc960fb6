use crate::features::capture::RawFileInfo;
use crate::features::error::FileInfoError;
use std::future::Future;
use std::io::ErrorKind;

/// Platform file-system lookup for a selected image's URI.
pub trait FileInfoSource {
    fn file_info(&self, uri: &str) -> impl Future<Output = Result<RawFileInfo, FileInfoError>> + Send;
}

/// Looks up local paths and `file://` URIs with `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileInfoSource for LocalFiles {
    async fn file_info(&self, uri: &str) -> Result<RawFileInfo, FileInfoError> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(RawFileInfo {
                size: meta.is_file().then_some(meta.len()),
                exists: true,
                is_directory: meta.is_dir(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RawFileInfo::default()),
            Err(source) => Err(FileInfoError::Io {
                uri: uri.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_file_reports_size() {
        let path = std::env::temp_dir().join("exif_reveal_files_test.bin");
        tokio::fs::write(&path, vec![0u8; 2048]).await.unwrap();

        let uri = format!("file://{}", path.display());
        let info = LocalFiles.file_info(&uri).await.unwrap();

        assert_eq!(
            info,
            RawFileInfo {
                size: Some(2048),
                exists: true,
                is_directory: false
            }
        );
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let info = LocalFiles
            .file_info("file:///definitely/not/here/photo.jpg")
            .await
            .unwrap();
        assert!(!info.exists);
        assert!(info.size.is_none());
    }

    #[tokio::test]
    async fn test_directory() {
        let dir = std::env::temp_dir();
        let info = LocalFiles.file_info(&dir.to_string_lossy()).await.unwrap();
        assert!(info.exists);
        assert!(info.is_directory);
        assert!(info.size.is_none());
    }
}
