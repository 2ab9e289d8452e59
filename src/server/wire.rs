//! JSON bodies exchanged with TRMNL firmware.
//!
//! Setup and display answers always travel with HTTP 200; the firmware reads
//! the outcome from the `status` field.

use serde::Serialize;

use crate::app::{DisplayResult, ProvisionResult};
use crate::catalog::DEFAULT_DURATION_SECS;
use crate::error::TrmnlError;

/// Body of `/api/display` (also used for a disabled `/api/setup`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub refresh_rate: u32,
    pub reset_firmware: bool,
    pub update_firmware: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DisplayResponse {
    pub fn image(result: &DisplayResult, image_url: String) -> Self {
        Self {
            status: 0,
            image_url: Some(image_url),
            filename: Some(result.image_path.clone()),
            refresh_rate: result.refresh_secs,
            ..Self::default()
        }
    }

    /// Map a display failure. Unknown devices are told to reset so they
    /// re-run setup.
    pub fn failure(err: &TrmnlError) -> Self {
        match err {
            TrmnlError::EmptyCatalog => Self {
                status: 404,
                refresh_rate: DEFAULT_DURATION_SECS,
                ..Self::default()
            },
            _ => Self {
                status: 500,
                reset_firmware: true,
                error: Some("Device not found".to_string()),
                ..Self::default()
            },
        }
    }

    pub fn setup_disabled() -> Self {
        Self {
            status: 500,
            error: Some("Setup not enabled".to_string()),
            ..Self::default()
        }
    }
}

/// Body of `/api/setup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupResponse {
    pub status: u16,
    pub api_key: String,
    pub friendly_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub message: String,
}

impl SetupResponse {
    pub fn registered(result: &ProvisionResult, image_url: Option<String>) -> Self {
        Self {
            status: 200,
            api_key: result.credential.to_string(),
            friendly_id: result.friendly_id.to_string(),
            image_url,
            message: result.message.clone(),
        }
    }

    pub fn missing_identifier() -> Self {
        Self {
            status: 404,
            message: "MAC address required in ID header".to_string(),
            ..Self::default()
        }
    }

    pub fn not_allowed(device: &str) -> Self {
        Self {
            status: 403,
            message: format!("Device {device} is not allowed to register"),
            ..Self::default()
        }
    }
}
