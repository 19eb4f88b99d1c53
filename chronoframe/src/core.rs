use chronoframe_core::{
    ChronoError, FrameConfig, Frequency, IndexKind, IndexLabels, IndexPoints, Table, TableSource,
    TimeIndex, Timeseries, Values,
};

use crate::frame::table::split_table;
use crate::frame::util::validate_identifier;

/// Input accepted wherever a frame takes a new member.
///
/// Bare values are wrapped into a [`Timeseries`] on the frame's primary index
/// using the frame's series defaults.
#[derive(Debug, Clone)]
pub enum NewMember {
    /// A fully configured series.
    Series(Timeseries),
    /// Values laid on the primary index.
    Values(Values),
}

impl From<Timeseries> for NewMember {
    fn from(ts: Timeseries) -> Self {
        Self::Series(ts)
    }
}

impl From<Values> for NewMember {
    fn from(v: Values) -> Self {
        Self::Values(v)
    }
}

impl From<Vec<f64>> for NewMember {
    fn from(v: Vec<f64>) -> Self {
        Self::Values(v.into())
    }
}

/// Named time series aligned against one primary index.
#[derive(Debug, Clone)]
pub struct SeriesFrame {
    pub(crate) members: Vec<(String, Timeseries)>,
    pub(crate) index: TimeIndex,
    pub(crate) cfg: FrameConfig,
}

/// Builder for constructing a [`SeriesFrame`].
#[derive(Debug, Clone, Default)]
pub struct SeriesFrameBuilder {
    members: Vec<(String, NewMember)>,
    tables: Vec<Table>,
    index: Option<TimeIndex>,
    name_index: Option<String>,
    cfg: FrameConfig,
}

impl SeriesFrameBuilder {
    /// Create a builder with default configuration and no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member under `name`. Names are validated at build time.
    #[must_use]
    pub fn series(mut self, name: impl Into<String>, member: impl Into<NewMember>) -> Self {
        self.members.push((name.into(), member.into()));
        self
    }

    /// Add one member per column of `table`, after any members added so far.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Primary index. Defaults to the longest member index.
    #[must_use]
    pub fn index(mut self, index: TimeIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Name of the primary index.
    #[must_use]
    pub fn name_index(mut self, name: impl Into<String>) -> Self {
        self.name_index = Some(name.into());
        self
    }

    /// Replace the whole frame configuration.
    #[must_use]
    pub fn config(mut self, cfg: FrameConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Whether members whose index cannot align with the primary index are
    /// rejected.
    #[must_use]
    pub const fn strict_members(mut self, yes: bool) -> Self {
        self.cfg.strict_members = yes;
        self
    }

    /// Validate members and build the frame.
    ///
    /// Members keep insertion order, with table columns after them. Bare
    /// values need an explicit primary index or a series member to lay them
    /// on.
    ///
    /// # Errors
    /// `InvalidIdentifier` or `DuplicateKey` for bad member names,
    /// `TypeMismatch` for a member that cannot align with the primary index,
    /// plus any error from splitting tables or wrapping values.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chronoframe::core::build",
            skip(self),
            fields(members = self.members.len(), tables = self.tables.len()),
        )
    )]
    pub fn build(self) -> Result<SeriesFrame, ChronoError> {
        let mut members = self.members;
        for table in &self.tables {
            members.extend(
                split_table(table, &self.cfg.series)?
                    .into_iter()
                    .map(|(name, ts)| (name, NewMember::Series(ts))),
            );
        }

        let longest = longest_index(members.iter().filter_map(|(_, m)| match m {
            NewMember::Series(ts) => Some(ts.index()),
            NewMember::Values(_) => None,
        }));
        let has_values = members
            .iter()
            .any(|(_, m)| matches!(m, NewMember::Values(_)));
        let index = match (self.index, longest) {
            (Some(index), _) | (None, Some(index)) => index,
            (None, None) if !has_values => TimeIndex::empty(IndexKind::Duration),
            (None, None) => {
                return Err(ChronoError::TypeMismatch(
                    "bare values need a primary index or a series member".into(),
                ));
            }
        };
        let index = match self.name_index {
            Some(name) => index.with_name(name),
            None => index,
        };

        let mut frame = SeriesFrame {
            members: Vec::with_capacity(members.len()),
            index,
            cfg: self.cfg,
        };
        for (name, member) in members {
            frame.add(name, member)?;
        }
        Ok(frame)
    }
}

/// First index with the most points.
pub(crate) fn longest_index<'a>(
    indexes: impl Iterator<Item = &'a TimeIndex>,
) -> Option<TimeIndex> {
    let mut best: Option<&TimeIndex> = None;
    for index in indexes {
        if best.is_none_or(|b| index.len() > b.len()) {
            best = Some(index);
        }
    }
    best.cloned()
}

impl Default for SeriesFrame {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            index: TimeIndex::empty(IndexKind::Duration),
            cfg: FrameConfig::default(),
        }
    }
}

impl SeriesFrame {
    /// Start building a new frame.
    ///
    /// ```
    /// use chronoframe::{SeriesFrame, TimeIndex};
    /// use chrono::TimeDelta;
    ///
    /// let index = TimeIndex::duration_range(TimeDelta::days(1), 3)?;
    /// let frame = SeriesFrame::builder()
    ///     .index(index)
    ///     .series("level", vec![1.0, 2.0, 3.0])
    ///     .series("flag", vec![0.0, 1.0, 0.0])
    ///     .build()?;
    /// assert_eq!(frame.names(), vec!["level", "flag"]);
    /// # Ok::<(), chronoframe::ChronoError>(())
    /// ```
    #[must_use]
    pub fn builder() -> SeriesFrameBuilder {
        SeriesFrameBuilder::new()
    }

    /// Empty frame over an empty duration index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with a single member built from `values` on a default index.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a bad name, or any error building the series.
    pub fn from_values(
        name: impl Into<String>,
        values: impl Into<Values>,
    ) -> Result<Self, ChronoError> {
        let ts = Timeseries::from_values(values)?;
        Self::builder().series(name, ts).build()
    }

    /// Frame over existing series, in iteration order.
    ///
    /// # Errors
    /// See [`SeriesFrameBuilder::build`].
    pub fn from_series<I, S>(members: I) -> Result<Self, ChronoError>
    where
        I: IntoIterator<Item = (S, Timeseries)>,
        S: Into<String>,
    {
        members
            .into_iter()
            .fold(Self::builder(), |b, (name, ts)| b.series(name, ts))
            .build()
    }

    /// Frame with one member per column of `table`.
    ///
    /// # Errors
    /// See [`split_table`].
    pub fn from_table(table: Table) -> Result<Self, ChronoError> {
        Self::builder().table(table).build()
    }

    /// Load `key` from `source` and split it into a frame.
    ///
    /// # Errors
    /// Propagates the source's failure, then see [`split_table`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chronoframe::core::load",
            skip(source, cfg),
            fields(source = source.name()),
        )
    )]
    pub fn load(
        source: &dyn TableSource,
        key: &str,
        cfg: FrameConfig,
    ) -> Result<Self, ChronoError> {
        let table = source.load(key)?;
        Self::builder().config(cfg).table(table).build()
    }

    /// Frame configuration.
    #[must_use]
    pub const fn config(&self) -> &FrameConfig {
        &self.cfg
    }

    /// Primary index.
    #[must_use]
    pub const fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Replace the primary index.
    ///
    /// Members are not resampled; the new index only becomes the target of
    /// later `resample(None, ..)` calls.
    ///
    /// # Errors
    /// `TypeMismatch` under strict membership when a member index cannot be
    /// aligned with `index`.
    pub fn set_index(&mut self, index: TimeIndex) -> Result<(), ChronoError> {
        if self.cfg.strict_members {
            if let Some((name, ts)) = self
                .members
                .iter()
                .find(|(_, ts)| !ts.index().is_alignable_with(&index))
            {
                return Err(misaligned(name, ts.index(), &index));
            }
        }
        let index = match self.index.name() {
            Some(name) if index.name().is_none() => index.with_name(name),
            _ => index,
        };
        self.index = index;
        Ok(())
    }

    /// Name of the primary index.
    #[must_use]
    pub fn name_index(&self) -> Option<&str> {
        self.index.name()
    }

    /// Rename the primary index.
    pub fn set_name_index(&mut self, name: impl Into<String>) {
        self.index = self.index.clone().with_name(name);
    }

    /// Frequency of the primary index, declared or inferred.
    #[must_use]
    pub fn freq(&self) -> Option<Frequency> {
        self.index.effective_freq()
    }

    /// Number of members.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the frame has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether a member called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Timeseries)> {
        self.members.iter().map(|(n, ts)| (n.as_str(), ts))
    }

    /// Deep copy of the frame and every member.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|(n, _)| n == name)
    }

    pub(crate) fn member(&self, name: &str) -> Result<&Timeseries, ChronoError> {
        self.position(name)
            .map(|i| &self.members[i].1)
            .ok_or_else(|| ChronoError::key_not_found(name))
    }

    pub(crate) fn member_mut(&mut self, name: &str) -> Result<&mut Timeseries, ChronoError> {
        let i = self
            .position(name)
            .ok_or_else(|| ChronoError::key_not_found(name))?;
        Ok(&mut self.members[i].1)
    }

    /// Turn a new member into a named series that fits this frame.
    pub(crate) fn admit(&self, name: &str, member: NewMember) -> Result<Timeseries, ChronoError> {
        validate_identifier(name)?;
        let mut ts = match member {
            NewMember::Series(ts) => ts,
            NewMember::Values(values) => Timeseries::builder(values)
                .index(self.index.clone())
                .config(self.cfg.series.clone())
                .build()?,
        };
        if self.cfg.strict_members && !ts.index().is_alignable_with(&self.index) {
            return Err(misaligned(name, ts.index(), &self.index));
        }
        ts.set_name(name);
        Ok(ts)
    }

    /// Every member's transformed series aligned onto the primary index;
    /// points a member does not have are `NaN`.
    ///
    /// # Errors
    /// `TypeMismatch` for text members, `IncompatibleFrequency` for members
    /// that cannot align with the primary index.
    pub fn to_table(&self) -> Result<Table, ChronoError> {
        let labels = match self.index.points() {
            IndexPoints::Timestamps(v) => v.clone().into(),
            IndexPoints::Durations(v) => IndexLabels::Durations(v.clone()),
            IndexPoints::Periods(_) => IndexLabels::Text(self.index.labels()),
        };
        let mut table = Table::new(labels);
        table.freq = self.index.freq().cloned();
        for (name, ts) in &self.members {
            let series = ts.series()?;
            let positions = series.index.align_to(&self.index)?;
            let column: Vec<f64> = positions
                .iter()
                .map(|p| p.and_then(|i| series.values.get(i).copied()).unwrap_or(f64::NAN))
                .collect();
            table = table.with_column(name.clone(), column);
        }
        Ok(table)
    }
}

fn misaligned(name: &str, member: &TimeIndex, primary: &TimeIndex) -> ChronoError {
    ChronoError::TypeMismatch(format!(
        "member {name:?} has a {:?} index that cannot align with the {:?} primary index",
        member.kind(),
        primary.kind()
    ))
}
