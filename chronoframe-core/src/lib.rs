//! chronoframe-core
//!
//! Building blocks for modelling jagged, mixed-frequency time series.
//!
//! - `index`: timestamp, duration and period indexes, frequencies and their
//!   calendar grids.
//! - `values`: typed value columns and fill scalars.
//! - `transform`: size-preserving transformation pipelines.
//! - `strategy`: named, scalar, keyed and custom strategies for missing
//!   values, upsampling and downsampling.
//! - `timeseries`: the `Timeseries` type and its resampling.
//! - `source`: collaborator contracts for tables and holiday calendars.
//!
//! Everything here is synchronous and single-threaded; types are `Send +
//! Sync` so callers may move them across threads.
#![warn(missing_docs)]

/// Temporal indexes and frequencies.
pub mod index;
/// Collaborator traits.
pub mod source;
/// Missing-value, upsample and downsample strategies.
pub mod strategy;
/// Single series and resampling.
pub mod timeseries;
/// Transformation pipelines.
pub mod transform;
/// Value columns.
pub mod values;

pub use chronoframe_types::{
    ChronoError, Dtype, FrameConfig, InfHandling, MemberFailure, ResampleDirection, SeriesConfig,
    Stype, StypeEffect,
};
pub use index::{
    FreqUnit, Frequency, IndexKind, IndexLabels, IndexPoints, TimeIndex, TradingCalendar,
    estimate_step,
};
pub use source::{HolidayCalendar, Table, TableSource};
pub use strategy::{
    DownFn, DownStrategy, NaFn, NaStrategy, UpFn, UpStrategy, down_strategy_names,
    na_strategy_names, up_strategy_names,
};
pub use timeseries::{
    ResampleOptions, ResampleTarget, Series, Timeseries, TimeseriesBuilder, resample_direction,
};
pub use transform::{ArrayFn, TransformFn, Transformable, Transformation, function_names};
pub use values::{Scalar, Values};
