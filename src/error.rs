//! Error types for configuration loading, image decoding and GPU setup.
//!
//! Errors only surface at the edges of a session: loading configuration,
//! decoding a scene's image, or bringing up the GPU. Everything inside the
//! frame loop degrades locally (log + placeholder) instead of returning an error.

use std::path::PathBuf;

/// Errors produced by the panorama library.
#[derive(Debug, thiserror::Error)]
pub enum PanoramaError {
    /// The session configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session configuration is not valid JSON or has a malformed field.
    #[error("failed to parse session config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration with no scenes and no fallback image.
    #[error("session config has no scenes and no image")]
    EmptySceneList,

    /// A scene's image could not be opened or decoded.
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No adapter compatible with the surface was found.
    #[error("failed to find a suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// The logical device could not be created.
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    /// The event loop could not be started or exited with an error.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Shorthand result type for this crate.
pub type Result<T> = std::result::Result<T, PanoramaError>;
