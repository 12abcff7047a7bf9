//! Client for the external image host.
//!
//! Product images are uploaded before the product document is written; the
//! host returns a public URL and an opaque id usable for later removal.

use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::UploadsConfig;

/// Errors that can occur talking to the image host.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("image host request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("image host rejected upload ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// A stored image as reported by the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Public URL to serve the image from.
    pub url: String,
    /// Host-side id, used for removal.
    pub public_id: String,
}

/// HTTP client for the image host.
#[derive(Clone)]
pub struct ImageHostClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: SecretString,
}

impl ImageHostClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    /// Upload one image, tagging it with the product code as its folder.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Http` on transport failure or
    /// `UploadError::Rejected` when the host answers with an error status.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: String,
        folder: &str,
    ) -> Result<UploadedImage, UploadError> {
        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(filename))
            .text("folder", folder.to_owned())
            .text("api_key", self.api_key.clone());

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(self.api_secret.expose_secret())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, message });
        }

        Ok(response.json::<UploadedImage>().await?)
    }

    /// Remove a previously uploaded image by its host-side id.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Http` on transport failure or
    /// `UploadError::Rejected` when the host answers with an error status.
    #[instrument(skip(self))]
    pub async fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        let response = self
            .http
            .delete(format!("{}/images/{public_id}", self.base_url))
            .bearer_auth(self.api_secret.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, message });
        }

        Ok(())
    }
}
