//! Route handlers. Each one calls into [`AppState`] and encodes the outcome.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::app::SharedState;
use crate::error::TrmnlError;

use super::device::{DeviceHeaders, base_url, image_url};
use super::wire::{DisplayResponse, SetupResponse};

/// `GET /api/setup`
pub async fn setup(
    State(state): State<SharedState>,
    device: DeviceHeaders,
    headers: HeaderMap,
) -> Response {
    match state.provision(device.id()) {
        Ok(result) => {
            let base = base_url(state.public_url.as_deref(), &headers);
            let first = result
                .first_image
                .as_ref()
                .map(|entry| image_url(&base, &entry.path));
            Json(SetupResponse::registered(&result, first)).into_response()
        }
        Err(TrmnlError::MissingIdentifier) => {
            Json(SetupResponse::missing_identifier()).into_response()
        }
        Err(TrmnlError::SetupDisabled) => Json(DisplayResponse::setup_disabled()).into_response(),
        Err(TrmnlError::DeviceNotAllowed { device }) => {
            Json(SetupResponse::not_allowed(&device)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "Setup failed");
            Json(SetupResponse {
                status: 500,
                message: err.to_string(),
                ..SetupResponse::default()
            })
            .into_response()
        }
    }
}

/// `GET /api/display`
pub async fn display(
    State(state): State<SharedState>,
    device: DeviceHeaders,
    headers: HeaderMap,
) -> Json<DisplayResponse> {
    device.log_telemetry();

    match state.display(device.id(), device.access_token()) {
        Ok(result) => {
            let base = base_url(state.public_url.as_deref(), &headers);
            let url = image_url(&base, &result.image_path);
            Json(DisplayResponse::image(&result, url))
        }
        Err(err) => {
            debug!(device = %device.id(), error = %err, "Display request refused");
            Json(DisplayResponse::failure(&err))
        }
    }
}

/// `POST /api/log`
pub async fn log(State(state): State<SharedState>, device: DeviceHeaders, body: Bytes) -> StatusCode {
    match state.accept_log(device.access_token.as_deref(), &body) {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(TrmnlError::MissingCredential) => StatusCode::UNAUTHORIZED,
        Err(err) => {
            debug!(error = %err, "Rejected device log");
            StatusCode::BAD_REQUEST
        }
    }
}

/// Answers any `OPTIONS` request; the CORS layer adds the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
