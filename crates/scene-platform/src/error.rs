//! Host failures

/// Errors reported by a [`ContentHost`](crate::ContentHost)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// No content unit exists under this name
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    /// The content unit exists but could not be loaded
    #[error("Failed to load {name}: {reason}")]
    LoadFailed {
        /// Content unit name
        name: String,
        /// Host-provided reason
        reason: String,
    },

    /// The surface is not (or no longer) loaded
    #[error("Unknown surface: {0}")]
    UnknownSurface(u64),

    /// The surface could not be unloaded
    #[error("Failed to unload surface {surface}: {reason}")]
    UnloadFailed {
        /// Surface id
        surface: u64,
        /// Host-provided reason
        reason: String,
    },
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, PlatformError>;
