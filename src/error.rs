// Error types for the whole crate
//
// Three families of failure exist:
// - configuration problems, found before anything is drawn
// - a selector that does not resolve to a surface, also found before drawing
// - a draw call failing while the animation is running
//
// The first two stop an invocation outright. The last one only ends the
// triangle task that hit it.

use thiserror::Error;

/// Invalid option values or combinations
///
/// Every variant is detected while resolving options or planning the grid,
/// which always happens before a surface is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: u64,
        value: u64,
    },

    #[error(
        "{axis} axis has no divider points: {extent}px / {weight}px weight leaves fewer than 2 steps"
    )]
    NoDividerPoints {
        axis: &'static str,
        extent: u32,
        weight: u32,
    },
}

/// A failure of the drawing primitive itself
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("surface was detached while drawing")]
    Detached,
}

/// Top level error returned by the library entry points
#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("missing drawing surface: {selector:?}")]
    SurfaceNotFound { selector: String },

    #[error("draw failed: {0}")]
    Draw(#[from] DrawError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("options file error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate
pub type Result<T, E = WeaveError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: WeaveError = ConfigError::TooSmall {
            name: "fillDensity",
            min: 3,
            value: 2,
        }
        .into();

        assert!(matches!(err, WeaveError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "invalid configuration: fillDensity must be at least 3, got 2"
        );
    }

    #[test]
    fn test_surface_not_found_names_selector() {
        let err = WeaveError::SurfaceNotFound {
            selector: "#missing".to_string(),
        };
        assert!(err.to_string().contains("#missing"));
    }
}
