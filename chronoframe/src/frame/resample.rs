use chronoframe_core::{ChronoError, ResampleOptions, ResampleTarget, Timeseries};

use crate::SeriesFrame;
use crate::core::longest_index;
use crate::frame::util::collapse_failures;

/// Which members a frame resample touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Which {
    /// Every member.
    #[default]
    All,
    /// One named member.
    One(String),
    /// An explicit list of members.
    Many(Vec<String>),
}

impl From<&str> for Which {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for Which {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<&str>> for Which {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Which {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl Which {
    fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::One(n) => n == name,
            Self::Many(ns) => ns.iter().any(|n| n == name),
        }
    }

    fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::One(n) => std::slice::from_ref(n),
            Self::Many(ns) => ns,
        }
    }
}

impl SeriesFrame {
    /// Resample the selected members and return a new frame.
    ///
    /// Without a target the members are resampled onto the primary index,
    /// which the new frame keeps. With a frequency target the longest
    /// resampled member index becomes the new primary index; with an index
    /// target that index does. Unselected members are copied unchanged.
    ///
    /// # Errors
    /// See [`SeriesFrame::resample_with`].
    pub fn resample(
        &self,
        target: Option<ResampleTarget>,
        which: impl Into<Which>,
    ) -> Result<Self, ChronoError> {
        self.resample_with(target, which, ResampleOptions::default())
    }

    /// Resample with per-series options.
    ///
    /// Behavior:
    /// - Every selected member is attempted, even after a failure.
    /// - Each member uses its own upsample and downsample strategies.
    /// - The original frame is left untouched.
    ///
    /// # Errors
    /// `KeyNotFound` when `which` names an unknown member (nothing is
    /// attempted), otherwise `MembersFailed` carrying each failing member's
    /// error in member order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chronoframe::frame::resample",
            skip(self, target, which),
            fields(members = self.members.len(), use_original = opts.use_original),
        )
    )]
    pub fn resample_with(
        &self,
        target: Option<ResampleTarget>,
        which: impl Into<Which>,
        opts: ResampleOptions,
    ) -> Result<Self, ChronoError> {
        let which = which.into();
        if let Some(missing) = which.names().iter().find(|n| !self.contains(n)) {
            return Err(ChronoError::key_not_found(missing.as_str()));
        }
        let onto_primary = target.is_none();
        let target = target.unwrap_or_else(|| ResampleTarget::Index(self.index.clone()));

        let mut members: Vec<(String, Timeseries)> = Vec::with_capacity(self.members.len());
        let mut failures = Vec::new();
        let mut touched = Vec::new();
        for (name, ts) in &self.members {
            if !which.includes(name) {
                members.push((name.clone(), ts.clone()));
                continue;
            }
            match ts.resample_with(target.clone(), opts) {
                Ok(out) => {
                    touched.push(members.len());
                    members.push((name.clone(), out));
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(member = %name, error = %e, "member resample failed");
                    failures.push(ChronoError::for_member(name.clone(), e));
                }
            }
        }
        collapse_failures(failures)?;

        let index = match &target {
            _ if onto_primary => self.index.clone(),
            ResampleTarget::Index(index) => index.clone(),
            ResampleTarget::Freq(_) => {
                let resampled = touched.iter().filter_map(|&i| members.get(i));
                longest_index(resampled.map(|(_, ts)| ts.index()))
                    .unwrap_or_else(|| self.index.clone())
            }
        };
        let index = match (self.index.name(), index.name()) {
            (Some(name), None) => index.with_name(name),
            _ => index,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(resampled = touched.len(), primary_len = index.len(), "frame resampled");

        Ok(Self {
            members,
            index,
            cfg: self.cfg.clone(),
        })
    }
}
