//! Error types for trmnld operations.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Primary error type for trmnld operations.
#[derive(Error, Debug)]
pub enum TrmnlError {
    // Device identity errors
    #[error("Device identifier required")]
    MissingIdentifier,

    #[error("Access token required")]
    MissingCredential,

    #[error("Access token does not match device {device}")]
    UnauthorizedCredential { device: String },

    #[error("Device {device} is not on the allow-list")]
    DeviceNotAllowed { device: String },

    #[error("Device provisioning is not enabled")]
    SetupDisabled,

    // Catalog errors
    #[error("No images available")]
    EmptyCatalog,

    #[error("Failed to load image catalog: {0}")]
    CatalogLoad(#[from] CatalogError),

    // Device log errors
    #[error("Malformed device log payload: {0}")]
    MalformedLogPayload(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Web server errors
    #[error("Web server failed to start on {addr}: {reason}")]
    WebServerFailed { addr: String, reason: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl TrmnlError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentifier
                | Self::DeviceNotAllowed { .. }
                | Self::SetupDisabled
                | Self::EmptyCatalog
                | Self::CatalogLoad(_)
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
                | Self::WebServerFailed { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingIdentifier => Some("Pass the device MAC address, e.g. AA:BB:CC:DD:EE:FF"),
            Self::DeviceNotAllowed { .. } => Some("Add the device with --allow <MAC>"),
            Self::SetupDisabled => Some("Restart the server with --setup to allow provisioning"),
            Self::EmptyCatalog => Some("Add .png or .bmp files to the image directory"),
            Self::CatalogLoad(_) => Some("Check that the image directory exists and is readable"),
            Self::ConfigNotFound { .. } => Some("Check the --config path"),
            Self::WebServerFailed { .. } => Some("Use --port to pick a free port"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using TrmnlError.
pub type Result<T> = std::result::Result<T, TrmnlError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| TrmnlError::Other(format!("{}: {e}", f().into())))
    }
}
