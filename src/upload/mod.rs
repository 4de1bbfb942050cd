/// Image upload to remote object storage
///
/// Forms hand a selected file to an [`ImageUploader`] and use the returned URL as the
/// record's image. [`HttpObjectStorage`] posts the file as multipart form data.

use async_trait::async_trait;
use reqwest::{multipart, Url};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("storage responded with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("storage response has no url")]
    MissingUrl,
    #[error("invalid upload endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("upload task ended unexpectedly: {0}")]
    Aborted(String),
}

/// A file picked by the editor
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// MIME type inferred from the file extension
    pub fn content_type(&self) -> &'static str {
        let ext = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "avif" => "image/avif",
            _ => "application/octet-stream",
        }
    }
}

/// `{file, destination path, filename}` handed to object storage
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: ImageFile,
    /// Folder inside the bucket, e.g. "projects"
    pub destination: String,
    pub filename: String,
}

/// Object storage accepting an image and answering with its public URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

/// Multipart HTTP uploader
///
/// Sends parts `file`, `path` and `name`; expects `{ "url": "..." }` back.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpObjectStorage {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Result<Self, UploadError> {
        let endpoint = Url::parse(endpoint).map_err(|_| UploadError::InvalidEndpoint(endpoint.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ImageUploader for HttpObjectStorage {
    async fn upload(&self, request: UploadRequest) -> Result<String, UploadError> {
        let content_type = request.file.content_type();
        tracing::debug!(
            "📤 Uploading {} ({} bytes, {}) to {}/",
            request.filename,
            request.file.bytes.len(),
            content_type,
            request.destination
        );

        let part = multipart::Part::bytes(request.file.bytes)
            .file_name(request.filename.clone())
            .mime_str(content_type)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("path", request.destination.clone())
            .text("name", request.filename.clone());

        let response = self.client.post(self.endpoint.clone()).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResponse = response.json().await?;
        let url = parsed.url.filter(|u| !u.is_empty()).ok_or(UploadError::MissingUrl)?;
        tracing::info!("📦 Uploaded {}/{} -> {}", request.destination, request.filename, url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(ImageFile::new("logo.PNG", vec![]).content_type(), "image/png");
        assert_eq!(ImageFile::new("a.b.jpeg", vec![]).content_type(), "image/jpeg");
        assert_eq!(ImageFile::new("README", vec![]).content_type(), "application/octet-stream");
    }

    #[test]
    fn endpoint_must_parse() {
        assert!(HttpObjectStorage::new(reqwest::Client::new(), "::").is_err());
        assert!(HttpObjectStorage::new(reqwest::Client::new(), "http://localhost/upload").is_ok());
    }
}
