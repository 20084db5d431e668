//! Bound and enablement state for the price alerter.
//!
//! One mutex guards the whole [`AlertConfig`], so the control API and the
//! monitor always agree on a consistent `(lower, upper)` pair.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{AlertConfig, MonitorState, Observation};

/// After a breach the band is rebuilt this far either side of the price.
pub const RECENTER_BAND: f64 = 0.05;

pub struct Alerter {
    config: Mutex<AlertConfig>,
    monitor: Mutex<MonitorState>,
}

impl Alerter {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config: Mutex::new(config),
            monitor: Mutex::new(MonitorState::NotStarted),
        }
    }

    // A panic while holding the lock cannot leave the plain-data config half-written.
    fn lock(&self) -> MutexGuard<'_, AlertConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> AlertConfig {
        self.lock().clone()
    }

    pub fn set_bounds(&self, lower: f64, upper: f64) {
        let mut cfg = self.lock();
        cfg.lower_bound = lower;
        cfg.upper_bound = upper;
    }

    pub fn set_lower_bound(&self, lower: f64) {
        self.lock().lower_bound = lower;
    }

    pub fn set_upper_bound(&self, upper: f64) {
        self.lock().upper_bound = upper;
    }

    pub fn set_alerts_enabled(&self, on: bool) {
        self.lock().alerts_enabled = on;
    }

    pub fn bounds(&self) -> (f64, f64) {
        let cfg = self.lock();
        (cfg.lower_bound, cfg.upper_bound)
    }

    /// Records `price` and checks it against the current band.
    ///
    /// A breach captures the band that was broken and the enablement flag,
    /// then recenters the band around `price`. This happens whether or not
    /// alerts are enabled, so a disabled alerter still tracks the market.
    pub fn observe(&self, price: f64, observed_at: i64) -> Observation {
        let mut cfg = self.lock();
        cfg.last_observed_price = Some(price);
        cfg.last_observed_at = Some(observed_at);

        let (lower, upper) = (cfg.lower_bound, cfg.upper_bound);
        if cfg.within_bounds(price) {
            return Observation::WithinBounds { lower, upper };
        }

        let recentered_to = (price * (1.0 - RECENTER_BAND), price * (1.0 + RECENTER_BAND));
        cfg.lower_bound = recentered_to.0;
        cfg.upper_bound = recentered_to.1;

        Observation::Breached {
            lower,
            upper,
            alerts_enabled: cfg.alerts_enabled,
            recentered_to,
        }
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_monitor_state(&self, state: MonitorState) {
        *self.monitor.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread, time::Duration};

    fn alerter(lower: f64, upper: f64, enabled: bool) -> Alerter {
        Alerter::new(AlertConfig::new(lower, upper, enabled, Duration::from_secs(10)))
    }

    #[test]
    fn price_inside_band_is_quiet() {
        let a = alerter(0.0, 10.0, true);

        let obs = a.observe(5.0, 1);
        assert_eq!(obs, Observation::WithinBounds { lower: 0.0, upper: 10.0 });
        assert!(!obs.should_notify());
        assert_eq!(a.snapshot().last_observed_price, Some(5.0));
        assert_eq!(a.bounds(), (0.0, 10.0));
    }

    #[test]
    fn price_on_bound_is_a_breach() {
        let a = alerter(0.018, 0.0181, true);

        let obs = a.observe(0.0180, 1);
        assert!(obs.should_notify());
        match obs {
            Observation::Breached { lower, upper, .. } => {
                assert_eq!((lower, upper), (0.018, 0.0181));
            }
            other => panic!("expected breach, got {other:?}"),
        }
    }

    #[test]
    fn breach_recenters_band() {
        let a = alerter(0.0, 10.0, false);

        let obs = a.observe(20.0, 1);
        assert!(!obs.should_notify());

        let (lower, upper) = a.bounds();
        assert!((lower - 19.0).abs() < 1e-9);
        assert!((upper - 21.0).abs() < 1e-9);
        assert!(a.observe(20.5, 2) == Observation::WithinBounds { lower, upper });
    }

    #[test]
    fn single_bound_setters_keep_the_other() {
        let a = alerter(1.0, 2.0, false);

        a.set_lower_bound(1.5);
        assert_eq!(a.bounds(), (1.5, 2.0));

        a.set_upper_bound(3.0);
        assert_eq!(a.bounds(), (1.5, 3.0));

        // no ordering check
        a.set_lower_bound(4.0);
        assert_eq!(a.bounds(), (4.0, 3.0));
    }

    #[test]
    fn concurrent_readers_never_see_a_torn_pair() {
        let a = Arc::new(alerter(0.0, 1.0, false));

        let writer = {
            let a = a.clone();
            thread::spawn(move || {
                for i in 0..10_000 {
                    let x = i as f64;
                    a.set_bounds(x, x + 1.0);
                }
            })
        };

        for _ in 0..10_000 {
            let (lower, upper) = a.bounds();
            assert_eq!(upper - lower, 1.0);
        }
        writer.join().unwrap();

        a.set_bounds(7.0, 3.0);
        assert_eq!(a.bounds(), (7.0, 3.0));
    }

    #[test]
    fn monitor_state_starts_not_started() {
        let a = alerter(0.0, 1.0, false);
        assert_eq!(a.monitor_state(), MonitorState::NotStarted);

        a.set_monitor_state(MonitorState::Running);
        assert_eq!(a.monitor_state(), MonitorState::Running);
    }
}
