//! Navigation errors

use scene_platform::PlatformError;
use scene_state::ShieldState;

use crate::config::ConfigError;

/// Errors produced by the navigator
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// A full-scene load was requested while a fade was running
    #[error("Navigation to {target} rejected while shield is {state}")]
    Rejected {
        /// Requested screen
        target: String,
        /// Shield state at the time of the request
        state: ShieldState,
    },

    /// A required collaborator (e.g. the loading screen) is not available
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(String),

    /// The host failed to load or unload content
    #[error("Host error: {0}")]
    Host(#[from] PlatformError),

    /// The request was dropped before its screen was shown
    #[error("Navigation abandoned before completion")]
    Abandoned,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NavigationError {
    /// Whether this is a rejected navigation rather than a failure
    pub fn is_rejected(&self) -> bool {
        matches!(self, NavigationError::Rejected { .. })
    }
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
