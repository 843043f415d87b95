//! RFID check-in service.
//!
//! Two processes share a Redis instance and nothing else:
//!
//! - `subscriber` listens on the broker for tag UIDs sent by the readers,
//!   answers each one with a `"1"`/`"0"` verdict, and appends a timestamp to
//!   the attendance log of every accepted tag.
//! - `interface` serves the management page where an operator maps tag UIDs
//!   to labels and reads the attendance logs back.
//!
//! Registry entries live in Redis db 0 (tag UID -> label), attendance logs in
//! db 1 (label -> newline-joined timestamps).

use axum::{Router, routing::get};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod handler;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;
pub mod subscriber;

use routes::{mutate_index, show_index};
use state::AppState;

pub async fn start_interface() {
    init_tracing();

    info!("Initializing state...");
    let state = AppState::new().await;

    let app = Router::new()
        .route("/", get(show_index).post(mutate_index))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.http_port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind interface port");
    info!("Interface running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Interface server failed");

    println!("Interface shutting down...");
}

pub async fn start_subscriber() {
    init_tracing();

    info!("Initializing state...");
    let state = AppState::new().await;

    subscriber::run(&state.config, &state.store).await;
}

fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
