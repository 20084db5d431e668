//! Library entrypoint for kraken-alerter.
//!
//! Kept separate from `main.rs` so tests under `tests/` can build the app
//! state, routers, controllers and services directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub mod controllers;
pub mod routes;

use crate::{
    config::{ConfigError, Settings},
    models::AlertConfig,
    services::{alerter::Alerter, kraken::TickerSource, twilio::SmsSender},
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub phone: String,
    pub alerter: Arc<Alerter>,
    pub ticker: Arc<dyn TickerSource>,
    pub sms: Arc<dyn SmsSender>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        ticker: Arc<dyn TickerSource>,
        sms: Arc<dyn SmsSender>,
    ) -> Result<Self, ConfigError> {
        let phone = settings.phone()?.to_string();
        let alerter = Alerter::new(AlertConfig::new(
            settings.lower_price_bound,
            settings.upper_price_bound,
            settings.alerts_enabled,
            settings.poll_interval(),
        ));

        Ok(Self {
            settings,
            phone,
            alerter: Arc::new(alerter),
            ticker,
            sms,
        })
    }
}
