//! chronoframe keeps many independently configured time series aligned on a
//! shared temporal index.
//!
//! Overview
//! - A [`SeriesFrame`] owns named [`Timeseries`] members and one primary
//!   [`TimeIndex`] that acts as the alignment target.
//! - Each member keeps its own missing-value, upsample and downsample
//!   strategies and its own [`Transformation`]; the frame only coordinates.
//! - Tables from a [`TableSource`] are split into one member per column.
//!
//! Key behaviors
//! - Membership edits (`add`, `remove`, `replace`, `rename`) mutate the frame
//!   in place and enforce the identifier rule on member names.
//! - `access_series` and `access_transform` hand out mutable borrows of
//!   member state; the strategy accessors are read-only and the setters
//!   re-validate.
//! - `resample` returns a new frame. Every selected member is attempted and
//!   failures are reported together as [`ChronoError::MembersFailed`].
//!
//! Examples
//! ```
//! use chronoframe::{Frequency, SeriesFrame, Timeseries, Which};
//!
//! let gdp = Timeseries::builder(vec![1.0, 2.0, f64::NAN, 4.0])
//!     .labels(vec!["2020-01", "2020-02", "2020-03", "2020-04"])
//!     .strat_na("ffill")
//!     .build()?;
//! let mut frame = SeriesFrame::builder().series("gdp", gdp).build()?;
//! frame.access_transform("gdp")?.add_named("ln")?;
//!
//! let quarterly = frame.resample(Some(Frequency::quarter().into()), Which::All)?;
//! assert_eq!(quarterly.index().labels(), vec!["2020Q1", "2020Q2"]);
//! # Ok::<(), chronoframe::ChronoError>(())
//! ```
//!
//! See `chronoframe/examples/` for runnable end-to-end programs.
#![warn(missing_docs)]

pub(crate) mod core;
mod frame;

pub use core::{NewMember, SeriesFrame, SeriesFrameBuilder};
pub use frame::resample::Which;
pub use frame::table::split_table;
pub use frame::util::{collapse_failures, validate_identifier};

// Re-export core types for convenience
pub use chronoframe_core::{
    ArrayFn,
    ChronoError,
    DownFn,
    DownStrategy,
    Dtype,
    FrameConfig,
    FreqUnit,
    Frequency,
    HolidayCalendar,
    IndexKind,
    IndexLabels,
    IndexPoints,
    InfHandling,
    MemberFailure,
    NaFn,
    NaStrategy,
    ResampleDirection,
    ResampleOptions,
    ResampleTarget,
    Scalar,
    Series,
    SeriesConfig,
    Stype,
    StypeEffect,
    Table,
    TableSource,
    TimeIndex,
    Timeseries,
    TimeseriesBuilder,
    TradingCalendar,
    TransformFn,
    Transformable,
    Transformation,
    UpFn,
    UpStrategy,
    Values,
    down_strategy_names,
    estimate_step,
    function_names,
    na_strategy_names,
    resample_direction,
    up_strategy_names,
};
