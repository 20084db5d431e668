use std::{process, sync::Arc};

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use kraken_alerter::{
    AppState, config,
    error::AlerterError,
    routes,
    services::{
        alert_monitor,
        kraken::{KrakenClient, KrakenCredentials},
        twilio::TwilioClient,
    },
};

#[tokio::main]
async fn main() {
    let settings = config::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kraken_alerter=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Phone is mandatory
    if let Err(e) = settings.phone() {
        eprintln!("{e}");
        process::exit(1);
    }

    if let Err(e) = serve(settings).await {
        tracing::error!(error = %e, "kraken-alerter exited with error");
        process::exit(1);
    }
}

async fn serve(settings: config::Settings) -> Result<(), AlerterError> {
    tracing::info!(pair = %settings.pair, "starting kraken-alerter");

    let credentials = match (&settings.kraken_api_key, &settings.kraken_api_secret) {
        (Some(key), Some(secret)) => Some(KrakenCredentials {
            api_key: key.clone(),
            api_secret: secret.clone(),
        }),
        _ => None,
    };
    let kraken = KrakenClient::new(&settings.kraken_api_url, credentials)?;
    tracing::info!(authenticated = kraken.has_credentials(), "kraken client ready");

    let twilio = TwilioClient::new(
        &settings.twilio_api_url,
        settings.twilio_account_sid.clone(),
        settings.twilio_auth_token.clone(),
    )?;
    if !twilio.has_credentials() {
        tracing::warn!("twilio credentials missing; alerts will be logged but not delivered");
    }

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    let addr = listener.local_addr()?;

    let state = AppState::new(settings, Arc::new(kraken), Arc::new(twilio))?;

    let shutdown = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown.clone()));

    let monitor = alert_monitor::spawn_price_alert_monitor(state.clone(), shutdown.clone());

    tracing::info!("control API listening on http://{}", addr);

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    // The monitor may already have stopped on its own; its error was logged then.
    shutdown.cancel();
    let _ = monitor.await;

    tracing::info!("kraken-alerter stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel `token`.
#[allow(clippy::expect_used)]
async fn await_shutdown(token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }

    token.cancel();
}
