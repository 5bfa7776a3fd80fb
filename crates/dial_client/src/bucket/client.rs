//! Bucket client for uploading and downloading DIAL files

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{check_status, DialError, Result};
use crate::model::Attachment;

/// Metadata returned by the store after an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Location of the stored object, usable as an attachment URL
    pub url: String,
    /// Remaining fields reported by the store (name, parent path, etc.)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct BucketInfo {
    bucket: String,
}

/// Session against the DIAL file store
///
/// The underlying HTTP session is acquired by [`BucketClient::open`] and
/// released when the client is dropped or [`BucketClient::close`]d, on every
/// exit path. `close` consumes the client so it cannot be used afterward.
pub struct BucketClient {
    base_url: Url,
    http: reqwest::Client,
}

impl BucketClient {
    /// Open a session against the store at `base_url`
    pub fn open(api_key: &str, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DialError::InvalidRequest(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DialError::InvalidRequest(format!(
                "base URL cannot hold paths: {}",
                base_url
            )));
        }

        let mut api_key = HeaderValue::from_str(api_key)?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("api-key", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        debug!("Bucket session opened: {}", base_url);

        Ok(Self { base_url, http })
    }

    /// Release the session
    pub fn close(self) {
        drop(self);
    }

    /// Name of the bucket owned by the API key
    pub async fn bucket(&self) -> Result<String> {
        let url = self.endpoint(&["v1", "bucket"]);
        let response = check_status(self.http.get(url).send().await?).await?;
        let info: BucketInfo = serde_json::from_str(&response.text().await?)?;
        Ok(info.bucket)
    }

    /// Upload `content` under `name` in the caller's bucket
    pub async fn put_file(
        &self,
        name: &str,
        mime_type: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<FileMetadata> {
        let bucket = self.bucket().await?;

        let mut segments = vec!["v1", "files", bucket.as_str()];
        segments.extend(name.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(&segments);

        let content = content.into();
        let size = content.len();
        let part = Part::bytes(content)
            .file_name(name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);

        debug!("Uploading {} ({} bytes, {})", name, size, mime_type);

        let response = check_status(self.http.put(url).multipart(form).send().await?).await?;
        let metadata: FileMetadata = serde_json::from_str(&response.text().await?)?;

        info!("Uploaded {} to {}", name, metadata.url);

        Ok(metadata)
    }

    /// Upload an attachment's content and return it with its stored URL
    pub async fn put_attachment(
        &self,
        attachment: Attachment,
        content: impl Into<Vec<u8>>,
    ) -> Result<Attachment> {
        let metadata = self
            .put_file(&attachment.title, &attachment.mime_type, content)
            .await?;
        Ok(attachment.with_url(metadata.url))
    }

    /// Download the bytes stored at `url`
    ///
    /// Relative URLs such as `files/<bucket>/<name>` resolve against
    /// `{base_url}/v1/`; absolute URLs are used as-is.
    pub async fn get_file(&self, url: &str) -> Result<Vec<u8>> {
        let target = self.resolve(url)?;
        debug!("Downloading {}", target);

        let response = check_status(self.http.get(target).send().await?).await?;
        let bytes = response.bytes().await?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        Ok(bytes.to_vec())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Url::parse(url)
                .map_err(|e| DialError::InvalidRequest(format!("invalid file URL {}: {}", url, e)));
        }

        let relative = url.trim_start_matches('/');
        let relative = relative.strip_prefix("v1/").unwrap_or(relative);
        let mut base = self.endpoint(&["v1"]);
        base.path_segments_mut()
            .map_err(|_| DialError::InvalidRequest(format!("cannot resolve {}", url)))?
            .push("");
        base.join(relative)
            .map_err(|e| DialError::InvalidRequest(format!("invalid file URL {}: {}", url, e)))
    }
}

impl Drop for BucketClient {
    fn drop(&mut self) {
        debug!("Bucket session closed: {}", self.base_url);
    }
}
