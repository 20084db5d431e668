use std::time::Duration;

use clap::{ArgAction, Parser};
use thiserror::Error;

pub const DEFAULT_LOWER_PRICE_BOUND: f64 = 0.0;
pub const DEFAULT_UPPER_PRICE_BOUND: f64 = 10.0;

#[derive(Debug, Clone, Parser)]
#[command(name = "kraken-alerter", about = "Texts you when a Kraken pair leaves its price band")]
pub struct Settings {
    /// Phone number that receives the alerts
    #[arg(long, env = "ALERT_PHONE")]
    pub phone: Option<String>,

    /// Twilio number the alerts are sent from
    #[arg(long = "from", env = "TWILIO_FROM")]
    pub from_number: Option<String>,

    #[arg(
        long = "lower",
        env = "LOWER_PRICE_BOUND",
        default_value_t = DEFAULT_LOWER_PRICE_BOUND,
        allow_negative_numbers = true
    )]
    pub lower_price_bound: f64,

    #[arg(
        long = "upper",
        env = "UPPER_PRICE_BOUND",
        default_value_t = DEFAULT_UPPER_PRICE_BOUND,
        allow_negative_numbers = true
    )]
    pub upper_price_bound: f64,

    #[arg(
        long,
        alias = "enable-alerts",
        env = "ALERTS_ENABLED",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub alerts_enabled: bool,

    #[arg(long, env = "TRADING_PAIR", default_value = "XETHXXBT")]
    pub pair: String,

    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 10)]
    pub poll_interval_secs: u64,

    #[arg(long = "kraken-url", env = "KRAKEN_API_URL", default_value = "https://api.kraken.com")]
    pub kraken_api_url: String,

    // The public ticker needs no keys; accepted so private endpoints can be added later.
    #[arg(long = "kraken-key", env = "KRAKEN_API_KEY")]
    pub kraken_api_key: Option<String>,

    #[arg(long = "kraken-secret", env = "KRAKEN_API_SECRET", hide_env_values = true)]
    pub kraken_api_secret: Option<String>,

    #[arg(long = "twilio-url", env = "TWILIO_API_URL", default_value = "https://api.twilio.com")]
    pub twilio_api_url: String,

    #[arg(long = "twilio-sid", env = "TWILIO_ACCOUNT_SID")]
    pub twilio_account_sid: Option<String>,

    #[arg(long = "twilio-token", env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub twilio_auth_token: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please provide a phone number to alert (--phone or ALERT_PHONE)")]
    MissingPhone,
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The destination phone, or an error when none was configured.
    pub fn phone(&self) -> Result<&str, ConfigError> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingPhone)
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    Settings::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_baseline() {
        let s = Settings::try_parse_from(["kraken-alerter", "--phone", "+15550001111"]).unwrap();

        assert_eq!(s.lower_price_bound, 0.0);
        assert_eq!(s.upper_price_bound, 10.0);
        assert_eq!(s.port, 8080);
        assert_eq!(s.pair, "XETHXXBT");
        assert_eq!(s.poll_interval(), Duration::from_secs(10));
        assert_eq!(s.phone().unwrap(), "+15550001111");
    }

    #[test]
    fn bare_alerts_flag_enables_alerts() {
        let s = Settings::try_parse_from(["kraken-alerter", "--alerts-enabled"]).unwrap();
        assert!(s.alerts_enabled);

        let s = Settings::try_parse_from(["kraken-alerter", "--alerts-enabled", "false"]).unwrap();
        assert!(!s.alerts_enabled);
    }

    #[test]
    fn enable_alerts_alias_and_negative_bounds() {
        let s = Settings::try_parse_from([
            "kraken-alerter",
            "--enable-alerts",
            "--lower",
            "-1.5",
            "--upper",
            "-0.5",
        ])
        .unwrap();

        assert!(s.alerts_enabled);
        assert_eq!(s.lower_price_bound, -1.5);
        assert_eq!(s.upper_price_bound, -0.5);
    }

    #[test]
    fn blank_phone_is_missing() {
        let s = Settings::try_parse_from(["kraken-alerter", "--phone", "  "]).unwrap();
        assert!(matches!(s.phone(), Err(ConfigError::MissingPhone)));
    }
}
