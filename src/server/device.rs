//! Request headers sent by TRMNL devices.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use tracing::debug;

pub const ID_HEADER: &str = "id";
pub const ACCESS_TOKEN_HEADER: &str = "access-token";
pub const BATTERY_VOLTAGE_HEADER: &str = "battery-voltage";
pub const FW_VERSION_HEADER: &str = "fw-version";
pub const RSSI_HEADER: &str = "rssi";
pub const WIDTH_HEADER: &str = "width";
pub const HEIGHT_HEADER: &str = "height";
pub const SPECIAL_FUNCTION_HEADER: &str = "special-function";

const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Identity and telemetry headers of a device request.
///
/// Extraction never fails; absent or non-UTF-8 headers become `None` and the
/// handler decides what a missing value means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceHeaders {
    pub id: Option<String>,
    pub access_token: Option<String>,
    pub telemetry: Telemetry,
}

/// Informational device readings. Logged, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Telemetry {
    pub battery_voltage: Option<String>,
    pub fw_version: Option<String>,
    pub rssi: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl DeviceHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            id: header_str(headers, ID_HEADER),
            access_token: header_str(headers, ACCESS_TOKEN_HEADER),
            telemetry: Telemetry {
                battery_voltage: header_str(headers, BATTERY_VOLTAGE_HEADER),
                fw_version: header_str(headers, FW_VERSION_HEADER),
                rssi: header_str(headers, RSSI_HEADER),
                width: header_str(headers, WIDTH_HEADER),
                height: header_str(headers, HEIGHT_HEADER),
            },
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }

    pub fn log_telemetry(&self) {
        let t = &self.telemetry;
        debug!(
            device = %self.id(),
            battery = t.battery_voltage.as_deref().unwrap_or("-"),
            fw = t.fw_version.as_deref().unwrap_or("-"),
            rssi = t.rssi.as_deref().unwrap_or("-"),
            width = t.width.as_deref().unwrap_or("-"),
            height = t.height.as_deref().unwrap_or("-"),
            "Device telemetry"
        );
    }
}

impl<S> FromRequestParts<S> for DeviceHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Base URL for links handed to the device.
///
/// The configured public URL wins. Otherwise the request's `Host` is used,
/// with the scheme from `X-Forwarded-Proto` when a proxy supplies it.
pub fn base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url {
        return url.to_string();
    }

    let scheme = header_str(headers, FORWARDED_PROTO_HEADER)
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_ascii_lowercase()))
        .filter(|s| s == "http" || s == "https")
        .unwrap_or_else(|| "http".to_string());
    let host = header_str(headers, header::HOST.as_str()).unwrap_or_else(|| "localhost".to_string());

    format!("{scheme}://{host}")
}

/// URL of a catalog image, with each path segment percent-encoded.
pub fn image_url(base: &str, relative_path: &str) -> String {
    let encoded: Vec<_> = relative_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{base}/images/{}", encoded.join("/"))
}
