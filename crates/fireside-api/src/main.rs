//! Fireside server entry point.

use std::error::Error;
use std::sync::Arc;

use fireside_api::collaborators::{HttpNarrator, HttpSpeech};
use fireside_api::config::AppConfig;
use fireside_api::state::AppState;
use fireside_api::telemetry;
use fireside_core::clock::SystemClock;
use fireside_core::rng::SystemRng;
use fireside_dice::KarmicDice;
use fireside_hub::Hub;
use fireside_session::{SessionContext, SessionRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let telemetry = telemetry::init()?;

    tracing::info!("Starting Fireside server");

    let config = AppConfig::from_env()?;
    tokio::fs::create_dir_all(&config.audio_dir).await?;

    let (hub, hub_task) = Hub::spawn();
    let client = reqwest::Client::new();
    let context = SessionContext::new(
        hub,
        Arc::new(HttpNarrator::new(client.clone(), config.narrator_url.clone())),
        Arc::new(HttpSpeech::new(
            client,
            config.speech_url.clone(),
            config.audio_dir.clone(),
        )),
        Arc::new(KarmicDice::new(SystemRng::new())),
        Arc::new(SystemClock),
    )
    .with_collaborator_timeout(config.collaborator_timeout);

    let registry = Arc::new(SessionRegistry::new(context));
    let demo = registry.create_with_id(config.demo_session_id);
    tracing::info!(session_id = %demo.id(), "demo session ready");

    let app = fireside_api::app(AppState::new(Arc::clone(&registry)), &config.audio_dir);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Draining session work");
    registry.drain().await;
    registry.hub().shutdown();
    hub_task.await?;
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
