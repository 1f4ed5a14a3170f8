//! Upload Service
//!
//! Saves a scan (image, user and recognized text) to the backend gallery.

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::{authorize, image_form, read_body, BackendConfig, ServiceError};
use crate::capture::frame::CapturedFrame;
use crate::storage::Session;

/// Route the scan is posted to
pub const UPLOAD_ROUTE: &str = "/image/uploadimage";

/// Reference to the image the backend stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    #[serde(rename = "imagePath")]
    pub image_path: String,
}

/// Persists a scan remotely
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(
        &self,
        frame: &CapturedFrame,
        session: &Session,
        recognition_text: &str,
    ) -> Result<StoredImage, ServiceError>;
}

/// Upload over HTTP as a multipart form
pub struct HttpUploadService {
    client: Client,
    endpoint: String,
}

impl HttpUploadService {
    pub fn new(config: &BackendConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: config.build_client()?,
            endpoint: config.endpoint(UPLOAD_ROUTE),
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Add the user and recognized text fields to the image form
pub fn scan_form(image: Form, session: &Session, recognition_text: &str) -> Form {
    image
        .text("userId", session.user_id_or_empty().to_string())
        .text("result", recognition_text.to_string())
}

#[async_trait]
impl UploadService for HttpUploadService {
    async fn upload(
        &self,
        frame: &CapturedFrame,
        session: &Session,
        recognition_text: &str,
    ) -> Result<StoredImage, ServiceError> {
        let form = scan_form(image_form(frame)?, session, recognition_text);
        debug!("Uploading scan to {}", self.endpoint);

        let request = authorize(self.client.post(&self.endpoint), session).multipart(form);
        let body = read_body(request.send().await?).await?;

        let stored: StoredImage = serde_json::from_str(&body)?;
        info!("Scan stored at {}", stored.image_path);
        Ok(stored)
    }
}
