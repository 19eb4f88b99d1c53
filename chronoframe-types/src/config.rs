//! Configuration types shared by series and frames.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handling of positive and negative infinities during cleaning.
///
/// Runs before the NaN strategy, so `AsNa` hands infinities over to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum InfHandling {
    /// Replace infinities with NaN.
    #[default]
    AsNa,
    /// Leave infinities in place.
    AsIs,
    /// Replace infinities with zero.
    Zero,
    /// Replace infinities with the given value.
    Value(f64),
}

/// Classification of a resample request relative to the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleDirection {
    /// Target is finer than the current index.
    Upsample,
    /// Target is coarser than (or a different grid of equal length to) the current index.
    Downsample,
    /// Target equals the current frequency.
    NoOp,
}

/// Default strategies applied to newly constructed series.
///
/// Strategies are stored by registry name so the configuration can be
/// serialized; custom functions are attached through builders instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Registry name of the missing-value strategy.
    pub strat_na: String,
    /// Infinite-value handling.
    pub strat_inf: InfHandling,
    /// Registry name of the upsample strategy.
    pub strat_up: String,
    /// Registry name of the downsample strategy.
    pub strat_down: String,
    /// Step of the duration index synthesized when a series has no index.
    ///
    /// Must be a whole number of seconds.
    pub default_index_step: Duration,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            strat_na: "asis".to_string(),
            strat_inf: InfHandling::AsNa,
            strat_up: "linear".to_string(),
            strat_down: "mean".to_string(),
            default_index_step: Duration::from_secs(86_400),
        }
    }
}

/// Configuration for a series frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Defaults used for members created by splitting a table.
    pub series: SeriesConfig,
    /// Reject members whose index kind cannot be aligned with the primary index.
    pub strict_members: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            series: SeriesConfig::default(),
            strict_members: true,
        }
    }
}
