//! HTTP client for the PM2.5 prediction backend.
//!
//! Thin blocking wrapper over reqwest with rustls: one request per call,
//! no retry, no backoff. Transport and application failures normalize to
//! a single error carrying a best-effort message.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::AqicastError;
use crate::models::{ChatReply, Prediction, PredictionRequest, SensorSnapshot, Station, StationReading};

/// Prediction API timeout in seconds.
const API_TIMEOUT_SECS: u64 = 15;

/// Chatbot timeout in seconds (intent classification is slower).
const CHATBOT_TIMEOUT_SECS: u64 = 30;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("aqicast/", env!("CARGO_PKG_VERSION"));

/// Default backend base URL; overridable via settings or `--api-url`.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client for the prediction backend.
pub struct ApiClient {
    api: Client,
    chat: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the default base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, AqicastError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a specific base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_base_url(base_url: &str) -> Result<Self, AqicastError> {
        let api = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        let chat = Client::builder()
            .timeout(Duration::from_secs(CHATBOT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            api,
            chat,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit a sensor-feature payload for prediction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, request))]
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, AqicastError> {
        let url = format!("{}/predict", self.base_url);
        debug!("posting prediction request to {}", url);

        let response = self.api.post(&url).json(request).send()?;
        let value = screen_response(response)?;

        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the latest sensor snapshot for a station.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(station = station.as_str()))]
    pub fn fetch_latest(&self, station: Station) -> Result<SensorSnapshot, AqicastError> {
        let url = format!("{}/latest", self.base_url);
        debug!("fetching latest snapshot from {}", url);

        let response = self
            .api
            .get(&url)
            .query(&[("station_id", station.as_str())])
            .send()?;
        let value = screen_response(response)?;

        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the cross-station comparison.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub fn fetch_comparison(&self) -> Result<Vec<StationReading>, AqicastError> {
        let url = format!("{}/comparison", self.base_url);
        debug!("fetching comparison from {}", url);

        let response = self.api.get(&url).send()?;
        let value = screen_response(response)?;

        let rows: Vec<StationReading> = serde_json::from_value(value)?;
        debug!("fetched {} station readings", rows.len());
        Ok(rows)
    }

    /// Send a free-text query to the chatbot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, query))]
    pub fn chatbot_query(
        &self,
        query: &str,
        station: Option<Station>,
    ) -> Result<ChatReply, AqicastError> {
        let url = format!("{}/chatbot/query", self.base_url);
        debug!("posting chatbot query to {}", url);

        let mut request = self.chat.post(&url).query(&[("query", query)]);
        if let Some(station) = station {
            request = request.query(&[("station_id", station.as_str())]);
        }

        let value = screen_response(request.send()?)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Normalize a response into a JSON value or a uniform failure.
///
/// Non-2xx statuses fail with the body's `detail`/`error` field when
/// present. The backend also returns HTTP 200 bodies shaped
/// `{"error": ...}` for `/latest` and `/comparison` failures; those are
/// application failures too.
fn screen_response(response: Response) -> Result<Value, AqicastError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(AqicastError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    let value: Value = response.json()?;
    screen_error_body(value, status.as_u16())
}

/// Reject 2xx bodies that carry an embedded error field.
fn screen_error_body(value: Value, status: u16) -> Result<Value, AqicastError> {
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(AqicastError::Api {
            status,
            message: message.to_string(),
        });
    }
    Ok(value)
}

/// Best-effort error message from a failure body.
///
/// Prefers the JSON `detail` field (FastAPI), then `error`, then the raw
/// body text.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_prefers_detail() {
        let body = r#"{"detail": "No data for station Peenya"}"#;
        assert_eq!(extract_error_message(body), "No data for station Peenya");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_error_field() {
        let body = r#"{"error": "No data available"}"#;
        assert_eq!(extract_error_message(body), "No data available");
    }

    #[test]
    fn test_extract_error_message_raw_body() {
        assert_eq!(extract_error_message("Internal Server Error"), "Internal Server Error");
        assert_eq!(extract_error_message(""), "request failed");
        assert_eq!(extract_error_message("   "), "request failed");
    }

    #[test]
    fn test_screen_error_body_rejects_embedded_error() {
        let value: Value = serde_json::from_str(r#"{"error": "No data available"}"#).unwrap();
        let result = screen_error_body(value, 200);

        match result {
            Err(AqicastError::Api { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "No data available");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_screen_error_body_passes_clean_payloads() {
        let object: Value = serde_json::from_str(r#"{"aqi": 128}"#).unwrap();
        assert!(screen_error_body(object, 200).is_ok());

        // Arrays (the comparison payload) have no error field to inspect.
        let array: Value = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(screen_error_body(array, 200).is_ok());
    }

    #[test]
    fn test_transport_failure_yields_nonempty_message() {
        // Port 9 (discard) is not listening; the request fails at connect.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let result = client.fetch_comparison();

        match result {
            Err(error) => assert!(!error.to_string().is_empty()),
            Ok(_) => panic!("expected transport failure"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_base_url("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
    }
}
