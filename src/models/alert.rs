use std::time::Duration;

use serde::Serialize;

/// Runtime-mutable alerting configuration shared by the monitor and the control API.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub alerts_enabled: bool,

    // None until the first successful poll
    pub last_observed_price: Option<f64>,
    pub last_observed_at: Option<i64>,

    pub poll_interval: Duration,
}

impl AlertConfig {
    pub fn new(lower_bound: f64, upper_bound: f64, alerts_enabled: bool, poll_interval: Duration) -> Self {
        Self {
            lower_bound,
            upper_bound,
            alerts_enabled,
            last_observed_price: None,
            last_observed_at: None,
            poll_interval,
        }
    }

    /// Strictly inside the band. Sitting exactly on a bound counts as outside.
    pub fn within_bounds(&self, price: f64) -> bool {
        self.lower_bound < price && price < self.upper_bound
    }
}

/// What the engine concluded about a single price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    WithinBounds {
        lower: f64,
        upper: f64,
    },
    Breached {
        // the bounds that were broken, before recentering
        lower: f64,
        upper: f64,
        alerts_enabled: bool,
        recentered_to: (f64, f64),
    },
}

impl Observation {
    pub fn should_notify(&self) -> bool {
        matches!(self, Observation::Breached { alerts_enabled: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MonitorState {
    NotStarted,
    Running,
    Stopped { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(lower: f64, upper: f64) -> AlertConfig {
        AlertConfig::new(lower, upper, true, Duration::from_secs(10))
    }

    #[test]
    fn bounds_are_exclusive() {
        let c = cfg(0.018, 0.0181);
        assert!(!c.within_bounds(0.0180));
        assert!(!c.within_bounds(0.0181));
        assert!(c.within_bounds(0.01805));
    }

    #[test]
    fn inverted_bounds_contain_nothing() {
        let c = cfg(10.0, 1.0);
        assert!(!c.within_bounds(5.0));
        assert!(!c.within_bounds(0.5));
        assert!(!c.within_bounds(11.0));
    }

    #[test]
    fn monitor_state_serializes_tagged() {
        let v = serde_json::to_value(MonitorState::Stopped { reason: "boom".into() }).unwrap();
        assert_eq!(v["state"], "stopped");
        assert_eq!(v["reason"], "boom");
    }
}
