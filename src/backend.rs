//! Shared plumbing for the backend HTTP services

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::capture::frame::CapturedFrame;
use crate::capture::CaptureError;
use crate::storage::Session;

/// Multipart field name carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Errors from the recognition and upload services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {0}")]
    Status(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("could not prepare image: {0}")]
    Frame(#[from] CaptureError),
}

/// Connection settings for the backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl BackendConfig {
    /// Join the base URL and a route without doubling slashes
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    pub fn build_client(&self) -> reqwest::Result<Client> {
        Client::builder().timeout(self.timeout).build()
    }
}

/// Attach the bearer token when the session has one
pub fn authorize(request: RequestBuilder, session: &Session) -> RequestBuilder {
    match session.bearer() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Multipart form holding the frame as a PNG file part
pub fn image_form(frame: &CapturedFrame) -> Result<Form, ServiceError> {
    let part = Part::bytes(frame.to_png()?)
        .file_name("scan.png")
        .mime_str("image/png")?;
    Ok(Form::new().part(IMAGE_FIELD, part))
}

/// Read the body of a response, turning non-success statuses into errors
pub async fn read_body(response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ServiceError::Status(body_excerpt(status, &body)));
    }
    Ok(body)
}

/// Trim a response body for error messages
pub fn body_excerpt(status: StatusCode, body: &str) -> String {
    const MAX: usize = 200;
    let body = body.trim();
    let excerpt: String = body.chars().take(MAX).collect();
    if excerpt.is_empty() {
        status.to_string()
    } else if body.chars().count() > MAX {
        format!("{}: {}...", status, excerpt)
    } else {
        format!("{}: {}", status, excerpt)
    }
}
