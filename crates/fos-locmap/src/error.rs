//! Controller errors

/// Location map error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocMapError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Map is not ready")]
    MapNotReady,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Controller has been disposed")]
    Disposed,
}

pub type Result<T> = std::result::Result<T, LocMapError>;
