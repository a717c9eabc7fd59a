//! Google Drive blob store
//!
//! Talks to the Drive v3 files API: multipart upload for new objects, a
//! media upload PATCH for content replacement, and a metadata GET for
//! existence checks. A 401 from any call maps to
//! [`StorageError::CredentialExpired`] so callers can run the one-shot
//! refresh-and-retry.

use crate::blob::{BlobStore, ObjectMetadata, StoredObject};
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use tracing::debug;

const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// Drive v3 implementation of [`BlobStore`]
#[derive(Debug, Clone)]
pub struct DriveStore {
    client: Client,
    upload_url: String,
    files_url: String,
}

impl Default for DriveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveStore {
    pub fn new() -> Self {
        DriveStore {
            client: Client::new(),
            upload_url: DRIVE_UPLOAD_URL.to_string(),
            files_url: DRIVE_FILES_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (test servers)
    pub fn with_base_urls(upload_url: impl Into<String>, files_url: impl Into<String>) -> Self {
        DriveStore {
            client: Client::new(),
            upload_url: upload_url.into(),
            files_url: files_url.into(),
        }
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(StorageError::CredentialExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl BlobStore for DriveStore {
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
        token: &str,
    ) -> Result<StoredObject> {
        debug!(filename, mime_type, len = bytes.len(), "uploading to Drive");
        let metadata = json!({ "name": filename, "mimeType": mime_type });
        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|_| StorageError::Service {
                        status: 0,
                        body: "invalid metadata mime type".to_string(),
                    })?,
            )
            .part(
                "file",
                Part::bytes(bytes.to_vec())
                    .file_name(filename.to_string())
                    .mime_str(mime_type)
                    .map_err(|_| StorageError::Service {
                        status: 0,
                        body: format!("invalid mime type: {mime_type}"),
                    })?,
            );

        let response = self
            .client
            .post(format!(
                "{}?uploadType=multipart&fields=id,webViewLink",
                self.upload_url
            ))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<StoredObject>().await?)
    }

    async fn exists(&self, id: &str, token: &str) -> Result<ObjectMetadata> {
        let response = self
            .client
            .get(format!(
                "{}/{id}?fields=id,name,mimeType,trashed",
                self.files_url
            ))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let metadata = response.json::<ObjectMetadata>().await?;
        if metadata.trashed {
            return Err(StorageError::Trashed(id.to_string()));
        }
        Ok(metadata)
    }

    async fn update(&self, id: &str, bytes: &[u8], token: &str) -> Result<StoredObject> {
        debug!(id, len = bytes.len(), "updating Drive object");
        let response = self
            .client
            .patch(format!(
                "{}/{id}?uploadType=media&fields=id,webViewLink",
                self.upload_url
            ))
            .bearer_auth(token)
            .body(bytes.to_vec())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<StoredObject>().await?)
    }
}
