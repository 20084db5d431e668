use std::num::ParseFloatError;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AlerterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Kraken returned errors: {0}")]
    Exchange(String),

    #[error("pair {0} missing from ticker response")]
    MissingPair(String),

    #[error("ticker has no last trade price")]
    MissingLastPrice,

    #[error("invalid last price {raw:?}: {source}")]
    InvalidPrice {
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("SMS is not configured: {0}")]
    SmsNotConfigured(&'static str),

    #[error("SMS provider rejected message: {status} {body}")]
    SmsRejected { status: u16, body: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
