//! Message contract between the extension popup and the content script.

use serde::{Deserialize, Serialize};

use crate::models::ScrapedProduct;

/// A request sent to the content script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Liveness check, lets the caller know the script is injected.
    Ping,
    /// Scrape the loaded page.
    ScrapeFurniture,
}

/// Reply to [`Request::Ping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub success: bool,
    pub loaded: bool,
}

impl PingResponse {
    pub fn loaded() -> Self {
        Self {
            success: true,
            loaded: true,
        }
    }
}

/// Reply to [`Request::ScrapeFurniture`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub confidence: f64,
    pub error: Option<String>,
    pub data: Option<ScrapedProduct>,
}

impl ScrapeResponse {
    pub fn success(confidence: f64, data: ScrapedProduct) -> Self {
        Self {
            success: true,
            confidence,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(confidence: f64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            confidence,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Any reply the content script can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ping(PingResponse),
    Scrape(ScrapeResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing() {
        let ping: Request = serde_json::from_str(r#"{"action":"ping"}"#).unwrap();
        assert_eq!(ping, Request::Ping);

        let scrape: Request = serde_json::from_str(r#"{"action":"scrapeFurniture"}"#).unwrap();
        assert_eq!(scrape, Request::ScrapeFurniture);

        assert!(serde_json::from_str::<Request>(r#"{"action":"dance"}"#).is_err());
    }

    #[test]
    fn test_ping_response_shape() {
        let json = serde_json::to_string(&Response::Ping(PingResponse::loaded())).unwrap();
        assert_eq!(json, r#"{"success":true,"loaded":true}"#);
    }

    #[test]
    fn test_failure_response_shape() {
        let response = Response::Scrape(ScrapeResponse::failure(0.2, "Not a product page"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["confidence"], 0.2);
        assert_eq!(json["error"], "Not a product page");
        assert!(json["data"].is_null());
    }
}
