//! Chronoframe-specific error, configuration, and statistical-type primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod stype;

pub use config::{FrameConfig, InfHandling, ResampleDirection, SeriesConfig};
pub use error::{ChronoError, MemberFailure};
pub use stype::{Dtype, Stype, StypeEffect};
