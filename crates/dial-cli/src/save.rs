//! Persisting generated images to disk

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use dial_client::{extension_for_mime, Attachment, BucketClient};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Pick a file extension from the attachment MIME type, then from the image header
pub fn file_extension(attachment: &Attachment, bytes: &[u8]) -> &'static str {
    extension_for_mime(&attachment.mime_type)
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .and_then(|format| format.extensions_str().first().copied())
        })
        .unwrap_or("png")
}

/// Format: `generated_image_YYYYmmdd_HHMMSS_<idx>.<ext>`
pub fn image_filename(timestamp: &DateTime<Local>, idx: usize, extension: &str) -> String {
    format!(
        "generated_image_{}_{}.{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        idx,
        extension
    )
}

/// Write one downloaded attachment into `out_dir`
pub async fn write_image(
    out_dir: &Path,
    attachment: &Attachment,
    idx: usize,
    bytes: &[u8],
) -> Result<PathBuf> {
    let filename = image_filename(&Local::now(), idx, file_extension(attachment, bytes));
    let path = out_dir.join(filename);

    fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Saved image: {} ({} bytes)", path.display(), bytes.len());

    Ok(path)
}

/// Outcome of saving a batch of attachments
///
/// `saved` lists every file written before `failure` stopped the batch.
#[derive(Debug, Default)]
pub struct SavedImages {
    pub saved: Vec<PathBuf>,
    pub failure: Option<anyhow::Error>,
}

impl SavedImages {
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.saved),
        }
    }
}

/// Download every uploaded attachment and save it locally
pub async fn save_attachments(
    client: &BucketClient,
    attachments: &[Attachment],
    out_dir: &Path,
) -> SavedImages {
    let mut result = SavedImages::default();

    if let Err(e) = fs::create_dir_all(out_dir).await {
        result.failure =
            Some(anyhow::Error::new(e).context(format!("Failed to create {}", out_dir.display())));
        return result;
    }

    for (idx, attachment) in attachments.iter().enumerate() {
        match save_one(client, attachment, idx, out_dir).await {
            Ok(Some(path)) => result.saved.push(path),
            Ok(None) => {}
            Err(e) => {
                result.failure = Some(e);
                break;
            }
        }
    }

    result
}

async fn save_one(
    client: &BucketClient,
    attachment: &Attachment,
    idx: usize,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(url) = attachment.url.as_deref() else {
        warn!("Attachment '{}' has no URL, skipping", attachment.title);
        return Ok(None);
    };

    let bytes = client
        .get_file(url)
        .await
        .with_context(|| format!("Failed to download {}", url))?;
    Ok(Some(write_image(out_dir, attachment, idx, &bytes).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_image_filename_format() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            image_filename(&timestamp, 2, "png"),
            "generated_image_20240309_140507_2.png"
        );
    }

    #[test]
    fn test_file_extension_from_mime() {
        let attachment = Attachment::new("Image", "image/jpeg");
        assert_eq!(file_extension(&attachment, &PNG_SIGNATURE), "jpg");
    }

    #[test]
    fn test_file_extension_sniffed_from_bytes() {
        let attachment = Attachment::new("Image", "application/octet-stream");
        assert_eq!(file_extension(&attachment, &PNG_SIGNATURE), "png");
        assert_eq!(file_extension(&attachment, b"GIF89a......"), "gif");
    }

    #[test]
    fn test_file_extension_fallback() {
        let attachment = Attachment::new("Image", "application/octet-stream");
        assert_eq!(file_extension(&attachment, b"????"), "png");
    }

    #[tokio::test]
    async fn test_write_image() {
        let temp_dir = tempdir().unwrap();
        let attachment = Attachment::new("Image", "image/png").with_url("files/b/img.png");

        let path = write_image(temp_dir.path(), &attachment, 0, &PNG_SIGNATURE)
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), PNG_SIGNATURE.to_vec());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("generated_image_"));
        assert!(name.ends_with("_0.png"));
    }

    #[tokio::test]
    async fn test_save_attachments_skips_missing_urls() {
        let temp_dir = tempdir().unwrap();
        let out_dir = temp_dir.path().join("images");
        let client = BucketClient::open("key", "http://127.0.0.1:9").unwrap();

        let saved = save_attachments(
            &client,
            &[Attachment::new("pending.png", "image/png")],
            &out_dir,
        )
        .await
        .into_result()
        .unwrap();

        assert!(saved.is_empty());
        assert!(out_dir.exists());
    }

    #[tokio::test]
    async fn test_save_attachments_keeps_files_written_before_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/files/b/first.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_SIGNATURE.to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/files/b/second.png"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let client = BucketClient::open("key", &server.uri()).unwrap();
        let attachments = [
            Attachment::new("first.png", "image/png").with_url("files/b/first.png"),
            Attachment::new("second.png", "image/png").with_url("files/b/second.png"),
            Attachment::new("third.png", "image/png").with_url("files/b/third.png"),
        ];

        let result = save_attachments(&client, &attachments, temp_dir.path()).await;

        assert_eq!(result.saved.len(), 1);
        assert!(result.saved[0].exists());
        assert!(result.saved[0].to_str().unwrap().ends_with("_0.png"));
        let failure = result.failure.expect("second download fails");
        assert!(failure.to_string().contains("files/b/second.png"));
    }
}
