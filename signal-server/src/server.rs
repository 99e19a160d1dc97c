//! HTTP server
//!
//! Routes:
//! - `GET /` - liveness text
//! - `GET /send-busy` - legacy route, sends the default busy message to Note to Self
//! - `POST /send-message` - sends `{recipient, message}`
//!
//! Every request, including unknown paths, passes through the request log and
//! then the source address filter.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use signal_common::{MessageRequest, DEFAULT_MESSAGE, DEFAULT_RECIPIENT, SEND_MESSAGE_PATH};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;
use crate::guard::{canonical_ip, AccessGuard};
use crate::types::{RelayError, RuntimeMode, ServerConfig};

const STATUS_TEXT: &str = "Signal Remote Server is running";
const SENT_TEXT: &str = "Message sending initiated";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Source address filter
    pub guard: Arc<AccessGuard>,
    /// Send pipeline
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(config: ServerConfig, mode: RuntimeMode) -> Self {
        let guard = AccessGuard::new(&config, mode);
        let dispatcher = Dispatcher::new(&config);
        Self {
            guard: Arc::new(guard),
            dispatcher,
        }
    }
}

/// Start the relay on `0.0.0.0:{config.port}` and run until SIGTERM or Ctrl-C
pub async fn serve(config: ServerConfig, mode: RuntimeMode) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Signal Remote Server running on port {}", config.port);
    tracing::info!("Using Signal EXE: {}", config.signal_exe_path.display());
    tracing::info!("Allowed IPs: {}", config.allowed_ips.join(", "));
    if mode.is_development() {
        tracing::warn!("Development mode: IP allow-list is disabled");
    }

    run(listener, AppState::new(config, mode), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = create_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    tracing::info!("HTTP server closed");
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/send-busy", get(send_busy))
        .route(SEND_MESSAGE_PATH, post(send_message))
        .fallback(not_found)
        // Layers run bottom-up: log first, then filter
        .layer(middleware::from_fn_with_state(state.clone(), ip_filter))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Middleware
// ============================================================================

async fn log_request(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    tracing::info!(
        "{} - {} {} from {}",
        Utc::now().to_rfc3339(),
        request.method(),
        request.uri(),
        peer.ip()
    );
    next.run(request).await
}

async fn ip_filter(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if state.guard.is_allowed(peer.ip()) {
        return next.run(request).await;
    }

    tracing::warn!(
        "Rejected request from unauthorized IP: {}",
        canonical_ip(peer.ip())
    );
    (StatusCode::FORBIDDEN, "Access denied").into_response()
}

// ============================================================================
// Handlers
// ============================================================================

async fn status() -> &'static str {
    STATUS_TEXT
}

async fn send_busy(State(state): State<AppState>) -> Result<&'static str, RelayError> {
    tracing::info!("Received legacy request to send busy message");
    state
        .dispatcher
        .send(DEFAULT_RECIPIENT, DEFAULT_MESSAGE)
        .await?;
    Ok(SENT_TEXT)
}

async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) if request.is_complete() => request,
        Ok(_) => return missing_fields(),
        Err(rejection) => {
            tracing::warn!("Unreadable send-message body: {}", rejection.body_text());
            return missing_fields();
        }
    };

    tracing::info!(
        "Received request to send message to {}: \"{}\"",
        request.recipient,
        request.message
    );

    match state
        .dispatcher
        .send(&request.recipient, &request.message)
        .await
    {
        Ok(_) => SENT_TEXT.into_response(),
        Err(e) => e.into_response(),
    }
}

fn missing_fields() -> Response {
    (StatusCode::BAD_REQUEST, "Missing recipient or message").into_response()
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

// ============================================================================
// Shutdown
// ============================================================================

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to set up SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl-C received: closing HTTP server"),
        _ = terminate => tracing::info!("SIGTERM signal received: closing HTTP server"),
    }
}
