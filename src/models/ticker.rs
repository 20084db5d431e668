use serde::{Deserialize, Serialize};

use crate::error::AlerterError;

/// One pair's entry from Kraken's public `Ticker` endpoint.
///
/// Kraken sends every number as a string; array fields are
/// `[price, whole lot volume, lot volume]` style tuples.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TickerSnapshot {
    // ask
    #[serde(rename = "a", default)]
    pub ask: Vec<String>,
    // bid
    #[serde(rename = "b", default)]
    pub bid: Vec<String>,
    // last trade closed [price, lot volume]
    #[serde(rename = "c", default)]
    pub last: Vec<String>,
    // volume [today, last 24h]
    #[serde(rename = "v", default)]
    pub volume: Vec<String>,
    // volume weighted average price [today, last 24h]
    #[serde(rename = "p", default)]
    pub vwap: Vec<String>,
    // number of trades [today, last 24h]
    #[serde(rename = "t", default)]
    pub trades: Vec<u64>,
    // low [today, last 24h]
    #[serde(rename = "l", default)]
    pub low: Vec<String>,
    // high [today, last 24h]
    #[serde(rename = "h", default)]
    pub high: Vec<String>,
    // today's opening price
    #[serde(rename = "o", default)]
    pub open: String,
}

impl TickerSnapshot {
    pub fn last_price_raw(&self) -> Result<&str, AlerterError> {
        self.last
            .first()
            .map(String::as_str)
            .ok_or(AlerterError::MissingLastPrice)
    }

    pub fn last_price(&self) -> Result<f64, AlerterError> {
        let raw = self.last_price_raw()?;
        raw.parse::<f64>().map_err(|source| AlerterError::InvalidPrice {
            raw: raw.to_string(),
            source,
        })
    }
}
