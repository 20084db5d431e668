use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::AlerterError, models::TickerSnapshot};

/// Anything that can quote the current ticker for a pair.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn ticker(&self, pair: &str) -> Result<TickerSnapshot, AlerterError>;
}

#[derive(Debug, Clone)]
pub struct KrakenCredentials {
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Clone)]
pub struct KrakenClient {
    http: Client,
    base_url: String,
    credentials: Option<KrakenCredentials>,
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, TickerSnapshot>,
}

impl KrakenClient {
    pub fn new(base_url: impl Into<String>, credentials: Option<KrakenCredentials>) -> Result<Self, AlerterError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| !c.api_key.is_empty() && !c.api_secret.is_empty())
    }
}

#[async_trait]
impl TickerSource for KrakenClient {
    async fn ticker(&self, pair: &str) -> Result<TickerSnapshot, AlerterError> {
        let url = format!("{}/0/public/Ticker", self.base_url);
        let res = self
            .http
            .get(url)
            .query(&[("pair", pair)])
            .send()
            .await?
            .error_for_status()?;

        let mut body = res.json::<TickerResponse>().await?;

        if !body.error.is_empty() {
            return Err(AlerterError::Exchange(body.error.join(", ")));
        }

        // Kraken keys the result by its canonical name (XBTUSD comes back as XXBTZUSD).
        if let Some(ticker) = body.result.remove(pair) {
            return Ok(ticker);
        }
        if body.result.len() == 1 {
            if let Some(ticker) = body.result.into_values().next() {
                return Ok(ticker);
            }
        }

        Err(AlerterError::MissingPair(pair.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Query, routing::get};
    use serde_json::{Value, json};

    async fn ticker_stub(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        match q.get("pair").map(String::as_str) {
            Some("XETHXXBT") => Json(json!({
                "error": [],
                "result": { "XETHXXBT": { "c": ["0.05205", "0.4"], "o": "0.0515" } }
            })),
            Some("XBTUSD") => Json(json!({
                "error": [],
                "result": { "XXBTZUSD": { "c": ["65000.1", "1"] } }
            })),
            Some("WRONG") => Json(json!({ "error": [], "result": {} })),
            Some("AMBIGUOUS") => Json(json!({
                "error": [],
                "result": { "ONE": { "c": ["1.0", "1"] }, "TWO": { "c": ["2.0", "1"] } }
            })),
            _ => Json(json!({ "error": ["EQuery:Unknown asset pair"] })),
        }
    }

    async fn serve_stub() -> String {
        let app = Router::new().route("/0/public/Ticker", get(ticker_stub));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_pair_ticker() {
        let client = KrakenClient::new(serve_stub().await, None).unwrap();

        let t = client.ticker("XETHXXBT").await.unwrap();
        assert_eq!(t.last_price().unwrap(), 0.05205);
        assert!(!client.has_credentials());
    }

    #[tokio::test]
    async fn surfaces_exchange_errors() {
        let client = KrakenClient::new(serve_stub().await, None).unwrap();

        let err = client.ticker("NOPE").await.unwrap_err();
        assert!(matches!(err, AlerterError::Exchange(ref m) if m.contains("Unknown asset pair")));
    }

    #[tokio::test]
    async fn short_pair_name_resolves_to_canonical_entry() {
        let client = KrakenClient::new(serve_stub().await, None).unwrap();

        let t = client.ticker("XBTUSD").await.unwrap();
        assert_eq!(t.last_price().unwrap(), 65000.1);
    }

    #[tokio::test]
    async fn empty_result_is_missing_pair() {
        let client = KrakenClient::new(serve_stub().await, None).unwrap();

        let err = client.ticker("WRONG").await.unwrap_err();
        assert!(matches!(err, AlerterError::MissingPair(ref p) if p == "WRONG"));
    }

    #[tokio::test]
    async fn several_unmatched_entries_are_missing_pair() {
        let client = KrakenClient::new(serve_stub().await, None).unwrap();

        let err = client.ticker("AMBIGUOUS").await.unwrap_err();
        assert!(matches!(err, AlerterError::MissingPair(_)));
    }
}
