use chrono::Utc;
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::AlerterError,
    models::{MonitorState, Observation},
};

pub fn spawn_price_alert_monitor(state: AppState, cancel: CancellationToken) -> JoinHandle<Result<(), AlerterError>> {
    tokio::spawn(run(state, cancel))
}

/// Polls the ticker until shutdown or the first fetch/parse error.
///
/// Fetch and parse errors are not retried: the monitor records
/// `Stopped` and returns the error, while the control API keeps serving.
pub async fn run(state: AppState, cancel: CancellationToken) -> Result<(), AlerterError> {
    let pair = state.settings.pair.clone();
    state.alerter.set_monitor_state(MonitorState::Running);
    info!(%pair, "price alert monitor started");

    loop {
        let tick = tokio::select! {
            _ = cancel.cancelled() => break,
            res = run_tick(&state) => res,
        };

        if let Err(e) = tick {
            error!(%pair, error = %e, "price alert monitor stopped");
            state.alerter.set_monitor_state(MonitorState::Stopped { reason: e.to_string() });
            return Err(e);
        }

        let interval = state.alerter.snapshot().poll_interval;
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = time::sleep(interval) => {}
        }
    }

    info!(%pair, "price alert monitor shut down");
    state.alerter.set_monitor_state(MonitorState::Stopped { reason: "shutdown".to_string() });
    Ok(())
}

/// One poll: fetch, record, and notify if the band was broken.
pub async fn run_tick(state: &AppState) -> Result<Observation, AlerterError> {
    let pair = state.settings.pair.as_str();

    let ticker = state.ticker.ticker(pair).await?;
    let price = ticker.last_price()?;
    info!(%pair, price, "last price");

    let observation = state.alerter.observe(price, Utc::now().timestamp());

    match observation {
        Observation::WithinBounds { lower, upper } => {
            info!(lower, price, upper, "price is within desired bounds");
        }
        Observation::Breached { lower, upper, recentered_to, .. } => {
            info!(lower, price, upper, "price is outside of desired bounds");

            if observation.should_notify() {
                send_alert(state, &alert_message(pair, price, lower, upper)).await;
            } else {
                info!("alerts are disabled");
            }

            info!(lower = recentered_to.0, upper = recentered_to.1, "bounds recentered");
        }
    }

    Ok(observation)
}

// Delivery is best effort; failures are logged and the loop moves on.
async fn send_alert(state: &AppState, text: &str) {
    let from = state.settings.from_number.as_deref().unwrap_or_default();

    match state.sms.send(from, &state.phone, text).await {
        Ok(sid) => info!(%sid, to = %state.phone, "alert sent"),
        Err(e) => warn!(error = %e, "failed to send SMS alert"),
    }
}

pub fn alert_message(pair: &str, price: f64, lower: f64, upper: f64) -> String {
    let direction = if price <= lower { "at or below" } else { "at or above" };
    let bound = if price <= lower { lower } else { upper };

    format!("{pair} last price {price:.6} is {direction} {bound:.6} (band {lower:.6} - {upper:.6})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_pair_and_direction() {
        let down = alert_message("XETHXXBT", 0.018, 0.018, 0.0181);
        assert!(down.starts_with("XETHXXBT last price 0.018000"));
        assert!(down.contains("at or below 0.018000"));

        let up = alert_message("XETHXXBT", 12.5, 0.0, 10.0);
        assert!(up.contains("at or above 10.000000"));
        assert!(up.contains("band 0.000000 - 10.000000"));
    }
}
