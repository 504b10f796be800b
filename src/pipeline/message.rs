// src/pipeline/message.rs

//! Content-script message handling.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, PingResponse, Request, Response, ScrapeResponse};
use crate::pipeline::scrape::scrape_page;
use crate::services::Page;

/// The page a content script is attached to, plus its configuration.
///
/// Every request is answered against the same loaded page.
pub struct ContentScript {
    page: Page,
    config: Arc<Config>,
}

impl ContentScript {
    pub fn new(page: Page, config: Arc<Config>) -> Self {
        Self { page, config }
    }

    /// Parse `html` as the page at `url` and attach to it.
    pub fn load(url: &str, html: &str, config: Arc<Config>) -> Result<Self> {
        Ok(Self::new(Page::parse(url, html)?, config))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Ping(PingResponse::loaded()),
            Request::ScrapeFurniture => {
                let response = scrape_page(&self.page, &self.config).unwrap_or_else(|e| {
                    log::error!("Scrape of {} failed: {}", self.page.url(), e);
                    ScrapeResponse::failure(0.0, e.to_string())
                });
                Response::Scrape(response)
            }
        }
    }

    /// Answer one JSON-encoded message. Unknown actions and malformed
    /// messages get a failed scrape response.
    pub fn handle_json(&self, message: &str) -> Result<String> {
        let response = match serde_json::from_str::<Request>(message) {
            Ok(request) => self.handle(request),
            Err(e) => {
                log::warn!("Rejecting message {:?}: {}", message, e);
                Response::Scrape(ScrapeResponse::failure(
                    0.0,
                    format!("Unsupported message: {e}"),
                ))
            }
        };
        Ok(serde_json::to_string(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn script() -> ContentScript {
        let html = r#"
            <script type="application/ld+json">
              {"@type": "Product", "name": "Pello Armchair", "offers": {"price": 129}}
            </script>
            <h1>Pello Armchair</h1>
        "#;
        ContentScript::load(
            "https://www.ikea.com/us/en/p/pello-armchair-00078609/",
            html,
            Arc::new(Config::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_ping() {
        let reply: Value = serde_json::from_str(&script().handle_json(r#"{"action":"ping"}"#).unwrap())
            .unwrap();
        assert_eq!(reply, serde_json::json!({"success": true, "loaded": true}));
    }

    #[test]
    fn test_scrape_furniture() {
        let reply: Value = serde_json::from_str(
            &script()
                .handle_json(r#"{"action":"scrapeFurniture"}"#)
                .unwrap(),
        )
        .unwrap();

        assert_eq!(reply["success"], true);
        assert_eq!(reply["confidence"], 0.65);
        assert_eq!(reply["error"], Value::Null);
        assert_eq!(reply["data"]["name"], "Pello Armchair");
        assert_eq!(reply["data"]["price"], 129.0);
        assert_eq!(reply["data"]["mainImage"], Value::Null);
    }

    #[test]
    fn test_unknown_action() {
        let reply: Value =
            serde_json::from_str(&script().handle_json(r#"{"action":"reload"}"#).unwrap()).unwrap();
        assert_eq!(reply["success"], false);
        assert_eq!(reply["confidence"], 0.0);
        assert_eq!(reply["data"], Value::Null);
        assert!(reply["error"].as_str().unwrap().starts_with("Unsupported message"));
    }

    #[test]
    fn test_malformed_message() {
        let reply: Value =
            serde_json::from_str(&script().handle_json("not json").unwrap()).unwrap();
        assert_eq!(reply["success"], false);
    }
}
