//! Azure Face API client.
//!
//! Thin wrapper around the detect endpoint with typed errors and bounded
//! retry for transient failures.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{ApiErrorBody, DetectedFace};
use crate::config::Config;

/// Route of the detect operation, relative to the service endpoint.
const DETECT_PATH: &str = "face/v1.0/detect";

/// Subscription key header used by Cognitive Services.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Default timeout for detect requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 500;

/// Maximum backoff delay
const MAX_BACKOFF_MS: u64 = 5000;

/// Errors that can occur during a detection call
#[derive(Debug, Error)]
pub enum FaceError {
    #[error("authentication rejected by the Face service ({code}): {message}")]
    Auth { code: String, message: String },

    #[error("Face service rejected the request ({status}, {code}): {message}")]
    Service {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("detection request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected detect response: {0}")]
    InvalidResponse(String),
}

/// Attributes the service can be asked to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAttributeType {
    Age,
    Emotion,
    Gender,
}

impl FaceAttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Emotion => "emotion",
            Self::Gender => "gender",
        }
    }
}

/// Recognition model used when computing face IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognitionModel {
    Recognition01,
    #[default]
    Recognition03,
}

impl RecognitionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recognition01 => "recognition_01",
            Self::Recognition03 => "recognition_03",
        }
    }
}

/// Detection model. detection_02 does not support attributes or landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionModel {
    #[default]
    Detection01,
    Detection02,
}

impl DetectionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detection01 => "detection_01",
            Self::Detection02 => "detection_02",
        }
    }
}

/// Parameters of a detect call.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub return_face_id: bool,
    pub return_face_landmarks: bool,
    pub return_recognition_model: bool,
    pub attributes: Vec<FaceAttributeType>,
    pub recognition_model: RecognitionModel,
    pub detection_model: DetectionModel,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            return_face_id: true,
            return_face_landmarks: false,
            return_recognition_model: false,
            attributes: vec![
                FaceAttributeType::Age,
                FaceAttributeType::Emotion,
                FaceAttributeType::Gender,
            ],
            recognition_model: RecognitionModel::default(),
            detection_model: DetectionModel::default(),
        }
    }
}

impl DetectOptions {
    /// Query parameters for the detect call.
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let attributes = self
            .attributes
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("returnFaceId", self.return_face_id.to_string()),
            ("returnFaceLandmarks", self.return_face_landmarks.to_string()),
            ("returnFaceAttributes", attributes),
            ("recognitionModel", self.recognition_model.as_str().to_string()),
            (
                "returnRecognitionModel",
                self.return_recognition_model.to_string(),
            ),
            ("detectionModel", self.detection_model.as_str().to_string()),
        ]
    }
}

fn build_request_body(image_url: &str) -> serde_json::Value {
    serde_json::json!({ "url": image_url })
}

/// Check if a reqwest error is retryable (transient network issues)
fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Calculate backoff delay with exponential increase and jitter
fn calculate_backoff(attempt: u32) -> Duration {
    let base_delay = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let capped_delay = base_delay.min(MAX_BACKOFF_MS);
    let jitter = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_millis() as u64)
        % 100;
    Duration::from_millis(capped_delay + jitter)
}

/// Azure Face API client.
pub struct FaceClient {
    client: reqwest::Client,
    endpoint: String,
    key_header: HeaderValue,
}

impl FaceClient {
    /// Create a client from validated configuration.
    pub fn new(config: &Config) -> Result<Self, FaceError> {
        let key_header =
            HeaderValue::from_str(&config.subscription_key).map_err(|_| FaceError::Auth {
                code: "InvalidSubscriptionKey".to_string(),
                message: "subscription key contains characters that cannot be sent in a header"
                    .to_string(),
            })?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
            key_header,
        })
    }

    /// Submit an image URL for detection and return the detected faces.
    ///
    /// Auth rejections and non-transient service rejections fail
    /// immediately; connect/timeout failures, 5xx and 429 are retried with
    /// exponential backoff.
    pub async fn detect_with_url(
        &self,
        image_url: &str,
        options: &DetectOptions,
    ) -> Result<Vec<DetectedFace>, FaceError> {
        let url = format!("{}/{}", self.endpoint, DETECT_PATH);
        let query = options.to_query();
        let body = build_request_body(image_url);

        debug!("POST {} for {}", url, image_url);

        let mut last_error: Option<FaceError> = None;

        for attempt in 0..DEFAULT_MAX_RETRIES {
            if attempt > 0 {
                let backoff = calculate_backoff(attempt - 1);
                warn!(
                    "Detect attempt {} failed, retrying in {:?}",
                    attempt, backoff
                );
                tokio::time::sleep(backoff).await;
            }

            let response = match self
                .client
                .post(&url)
                .query(&query)
                .header(SUBSCRIPTION_KEY_HEADER, self.key_header.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    if is_retryable_error(&e) {
                        last_error = Some(FaceError::Transport(e));
                        continue;
                    }
                    return Err(FaceError::Transport(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                let faces: Vec<DetectedFace> = response
                    .json()
                    .await
                    .map_err(|e| FaceError::InvalidResponse(e.to_string()))?;
                info!("Face service returned {} face(s)", faces.len());
                return Ok(faces);
            }

            let error = Self::decode_error(status, response).await;
            if is_retryable_status(status) {
                last_error = Some(error);
            } else {
                return Err(error);
            }
        }

        Err(last_error
            .unwrap_or_else(|| FaceError::InvalidResponse("no detect attempt was made".to_string())))
    }

    /// Decode a non-success response into a typed error.
    async fn decode_error(status: StatusCode, response: reqwest::Response) -> FaceError {
        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(decoded) => (decoded.error.code, decoded.error.message),
            Err(_) => (
                status.canonical_reason().unwrap_or("unknown").to_string(),
                body.chars().take(200).collect(),
            ),
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            FaceError::Auth { code, message }
        } else {
            FaceError::Service {
                status,
                code,
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_query() {
        let query = DetectOptions::default().to_query();
        assert!(query.contains(&("returnFaceId", "true".to_string())));
        assert!(query.contains(&("returnFaceLandmarks", "false".to_string())));
        assert!(query.contains(&("returnFaceAttributes", "age,emotion,gender".to_string())));
        assert!(query.contains(&("recognitionModel", "recognition_03".to_string())));
        assert!(query.contains(&("returnRecognitionModel", "false".to_string())));
        assert!(query.contains(&("detectionModel", "detection_01".to_string())));
    }

    #[test]
    fn test_landmarks_flag_in_query() {
        let options = DetectOptions {
            return_face_landmarks: true,
            ..DetectOptions::default()
        };
        let query = options.to_query();
        assert!(query.contains(&("returnFaceLandmarks", "true".to_string())));
    }

    #[test]
    fn test_build_request_body() {
        let body = build_request_body("https://example.com/portrait.jpg");
        assert_eq!(body["url"], "https://example.com/portrait.jpg");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_backoff_is_capped() {
        let backoff = calculate_backoff(10);
        assert!(backoff <= Duration::from_millis(MAX_BACKOFF_MS + 100));
    }

    #[test]
    fn test_client_trims_endpoint_slash() {
        let config = Config::new("key-123", "https://westus.api.cognitive.microsoft.com/").unwrap();
        let client = FaceClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "https://westus.api.cognitive.microsoft.com");
    }

    #[test]
    fn test_client_rejects_unsendable_key() {
        let config = Config::new("key\nwith\nnewlines", "https://example.com").unwrap();
        assert!(matches!(
            FaceClient::new(&config),
            Err(FaceError::Auth { .. })
        ));
    }
}
