//! Recognition service client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::backend::{authorize, image_form, read_body, BackendConfig, ServiceError};
use crate::capture::frame::CapturedFrame;
use crate::recognition::DetectedRegion;
use crate::storage::Session;

/// Route the frame is posted to
pub const RECOGNIZE_ROUTE: &str = "/image/scan";

/// Turns a still frame into detected text regions
#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(
        &self,
        frame: &CapturedFrame,
        session: &Session,
    ) -> Result<Vec<DetectedRegion>, ServiceError>;
}

/// Recognition over HTTP: multipart image in, JSON regions out
pub struct HttpRecognitionService {
    client: Client,
    endpoint: String,
}

impl HttpRecognitionService {
    pub fn new(config: &BackendConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: config.build_client()?,
            endpoint: config.endpoint(RECOGNIZE_ROUTE),
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionService {
    async fn recognize(
        &self,
        frame: &CapturedFrame,
        session: &Session,
    ) -> Result<Vec<DetectedRegion>, ServiceError> {
        let form = image_form(frame)?;
        debug!("Posting {}x{} frame to {}", frame.width, frame.height, self.endpoint);

        let request = authorize(self.client.post(&self.endpoint), session).multipart(form);
        let body = read_body(request.send().await?).await?;

        let regions = parse_regions(&body)?;
        info!("Recognition returned {} regions", regions.len());
        Ok(regions)
    }
}

/// The backend answers with a bare array, older deployments wrap it
#[derive(Deserialize)]
#[serde(untagged)]
enum RegionsBody {
    Bare(Vec<DetectedRegion>),
    Wrapped { results: Vec<DetectedRegion> },
}

/// Parse a recognition response body
pub fn parse_regions(body: &str) -> Result<Vec<DetectedRegion>, ServiceError> {
    Ok(match serde_json::from_str(body)? {
        RegionsBody::Bare(regions) => regions,
        RegionsBody::Wrapped { results } => results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array_keeps_order() {
        let body = r#"[
            {"id": 1, "characters": "北京", "pinyin": "běi jīng", "translation": "Beijing", "vertices": [{"x": 1, "y": 2}]},
            {"id": 2, "characters": "上海", "pinyin": "shàng hǎi", "translation": "Shanghai", "vertices": [{"x": 3, "y": 4}]}
        ]"#;

        let regions = parse_regions(body).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].source_text, "北京");
        assert_eq!(regions[1].transliteration, "shàng hǎi");
    }

    #[test]
    fn test_parse_wrapped_results() {
        let body = r#"{"results": [{"id": "z", "characters": "茶", "vertices": [{"x": 0, "y": 0}]}]}"#;
        let regions = parse_regions(body).unwrap();
        assert_eq!(regions[0].id, "z");
    }

    #[test]
    fn test_parse_empty_result() {
        assert!(parse_regions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_invalid_response() {
        assert!(matches!(parse_regions("<html>"), Err(ServiceError::InvalidResponse(_))));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = BackendConfig {
            base_url: "https://scan.example.org".to_string(),
            ..Default::default()
        };
        let service = HttpRecognitionService::new(&config).unwrap();
        assert_eq!(service.endpoint(), "https://scan.example.org/image/scan");
    }
}
