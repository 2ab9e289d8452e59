//! HTTP surface for TRMNL devices.
//!
//! | Route            | Method | Handler               |
//! |------------------|--------|-----------------------|
//! | `/api/setup`     | GET    | [`handlers::setup`]   |
//! | `/api/display`   | GET    | [`handlers::display`] |
//! | `/api/log`       | POST   | [`handlers::log`]     |
//! | `/images/{path}` | GET    | `.png`/`.bmp` files   |
//!
//! `OPTIONS` on any path answers 200 with permissive CORS headers.

pub mod device;
pub mod handlers;
pub mod wire;

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, info_span, warn};

use crate::app::SharedState;
use crate::catalog::is_image_path;
use crate::config::ServerConfig;
use crate::error::{Result, TrmnlError};

use self::device::{
    ACCESS_TOKEN_HEADER, BATTERY_VOLTAGE_HEADER, FW_VERSION_HEADER, HEIGHT_HEADER, ID_HEADER,
    RSSI_HEADER, SPECIAL_FUNCTION_HEADER, WIDTH_HEADER,
};

/// Build the router over shared state.
pub fn router(state: SharedState) -> Router {
    let images = Router::<()>::new()
        .fallback_service(ServeDir::new(state.catalog.root()))
        .layer(middleware::from_fn(only_images));

    Router::new()
        .route("/api/setup", get(handlers::setup).options(handlers::preflight))
        .route("/api/setup/", get(handlers::setup).options(handlers::preflight))
        .route("/api/display", get(handlers::display).options(handlers::preflight))
        .route("/api/log", post(handlers::log).options(handlers::preflight))
        .nest_service("/images", images)
        .fallback(fallback)
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let path = req
                        .extensions()
                        .get::<MatchedPath>()
                        .map_or_else(|| req.uri().path(), MatchedPath::as_str);
                    let remote = req
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.to_string());
                    info_span!(
                        "http_request",
                        method = %req.method(),
                        path,
                        remote = remote.as_deref().unwrap_or("-"),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let headers = [
        "content-type",
        ACCESS_TOKEN_HEADER,
        ID_HEADER,
        BATTERY_VOLTAGE_HEADER,
        FW_VERSION_HEADER,
        RSSI_HEADER,
        HEIGHT_HEADER,
        WIDTH_HEADER,
        SPECIAL_FUNCTION_HEADER,
    ]
    .map(HeaderName::from_static);

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers)
}

/// Pass only `.png`/`.bmp` requests through to the file service.
async fn only_images(req: Request<axum::body::Body>, next: Next) -> Response {
    let servable = urlencoding::decode(req.uri().path())
        .is_ok_and(|path| is_image_path(Path::new(path.as_ref())));
    if servable {
        next.run(req).await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn fallback(method: Method) -> StatusCode {
    if method == Method::OPTIONS {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: SharedState) -> Result<()> {
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| TrmnlError::WebServerFailed {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

    let local = listener.local_addr()?;
    info!(addr = %local, "Listening for devices");

    axum::serve(
        listener,
        router(state.clone()).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| TrmnlError::WebServerFailed {
        addr,
        reason: e.to_string(),
    })?;

    let sessions = state.sessions.snapshot();
    info!(devices = sessions.len(), "Server stopped");
    for (device, session) in sessions {
        debug!(
            device = %device,
            cursor = ?session.cursor,
            last_update = ?session.last_update,
            "Device session at shutdown"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
