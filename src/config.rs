// Options and the resolved configuration
//
// `Options` is what a caller hands in: any subset of the recognised keys,
// typically read from JSON. `Config` is the immutable result of laying those
// options over the defaults and validating them. Unknown JSON keys are
// ignored, so option files can carry extra data.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Jitter radius as a fraction of the smaller grid step, used when
/// `corner_range` is 0
pub const CORNER_RANGE_WEIGHT: f64 = 0.6;

/// Caller-supplied overrides
///
/// Every field is optional. `None` means "keep the default".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub selector: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub side_ratio: Option<u32>,
    pub fill_density: Option<usize>,
    pub fill_speed: Option<u64>,
    pub corner_range: Option<u32>,
    pub use_color: Option<bool>,
    pub divider_point_weight: Option<u32>,
    pub shuffle_corners: Option<bool>,
    pub seed: Option<u64>,
}

impl Options {
    /// Parse an options object from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON options file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Layer `other` on top of `self`: keys set in `other` win
    pub fn merge(self, other: Options) -> Options {
        Options {
            selector: other.selector.or(self.selector),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            side_ratio: other.side_ratio.or(self.side_ratio),
            fill_density: other.fill_density.or(self.fill_density),
            fill_speed: other.fill_speed.or(self.fill_speed),
            corner_range: other.corner_range.or(self.corner_range),
            use_color: other.use_color.or(self.use_color),
            divider_point_weight: other.divider_point_weight.or(self.divider_point_weight),
            shuffle_corners: other.shuffle_corners.or(self.shuffle_corners),
            seed: other.seed.or(self.seed),
        }
    }
}

/// The resolved, validated configuration for one generation
///
/// Built once per session and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which surface to draw on
    pub selector: String,

    /// Surface size in pixels
    pub width: u32,
    pub height: u32,

    /// Each interior point sits 1/side_ratio of the way along its generating segment
    pub side_ratio: u32,

    /// Points per triangle, the three corners included
    pub fill_density: usize,

    /// Milliseconds between two segments of the same triangle
    pub fill_speed: u64,

    /// Jitter radius for grid corners; 0 derives it from the grid step
    pub corner_range: u32,

    /// Stroke each triangle in its own random colour instead of black
    pub use_color: bool,

    /// Target spacing between divider points in pixels
    pub divider_point_weight: u32,

    /// Randomly permute the corners of every triangle before subdividing
    pub shuffle_corners: bool,

    /// Seed for reproducible output
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selector: String::new(),
            width: 1000,
            height: 600,
            side_ratio: 10,
            fill_density: 90,
            fill_speed: 20,
            corner_range: 0,
            use_color: false,
            divider_point_weight: 100,
            shuffle_corners: false,
            seed: None,
        }
    }
}

impl Config {
    /// Lay `options` over the defaults and validate the result
    pub fn resolve(options: &Options) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let options = options.clone();

        let config = Config {
            selector: options.selector.unwrap_or(defaults.selector),
            width: options.width.unwrap_or(defaults.width),
            height: options.height.unwrap_or(defaults.height),
            side_ratio: options.side_ratio.unwrap_or(defaults.side_ratio),
            fill_density: options.fill_density.unwrap_or(defaults.fill_density),
            fill_speed: options.fill_speed.unwrap_or(defaults.fill_speed),
            corner_range: options.corner_range.unwrap_or(defaults.corner_range),
            use_color: options.use_color.unwrap_or(defaults.use_color),
            divider_point_weight: options
                .divider_point_weight
                .unwrap_or(defaults.divider_point_weight),
            shuffle_corners: options.shuffle_corners.unwrap_or(defaults.shuffle_corners),
            seed: options.seed.or(defaults.seed),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the scalar invariants
    ///
    /// Whether the grid has divider points on both axes depends on a
    /// combination of values and is checked by `GridLayout::plan`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("width", self.width as u64, 2)?;
        at_least("height", self.height as u64, 2)?;
        at_least("sideRatio", self.side_ratio as u64, 2)?;
        at_least("fillDensity", self.fill_density as u64, 3)?;
        at_least("dividerPointWeight", self.divider_point_weight as u64, 1)?;
        Ok(())
    }
}

fn at_least(name: &'static str, value: u64, min: u64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { name, min, value });
    }
    Ok(())
}
