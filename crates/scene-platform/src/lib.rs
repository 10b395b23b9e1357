//! Host platform interface for Scene Stack
//!
//! The navigator never renders or loads content itself. Everything that
//! touches real surfaces goes through [`ContentHost`], implemented by the
//! embedding application.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod host;
pub mod types;

pub use error::{PlatformError, Result};
pub use host::ContentHost;
pub use types::{LoadMode, SurfaceHandle, Viewport};
