use std::collections::HashSet;

use chronoframe_core::{ChronoError, SeriesConfig, Table, TimeIndex, Timeseries};

use crate::frame::util::validate_identifier;

/// Split a table into one named series per column.
///
/// The table index is coerced once and shared by every column. Each series
/// takes its column label as its name and `cfg` as its strategies.
///
/// # Errors
/// `InvalidIdentifier` for a column label that breaks the identifier rule,
/// `DuplicateKey` for a repeated label, `IncoercibleIndex` for unusable row
/// labels and `IndexIntegrity` for unordered rows or a column whose length
/// differs from the row count.
///
/// A column label is a member key, so a bad label is a key error. It is
/// reported as `InvalidIdentifier` rather than a generic key-lookup failure,
/// so callers can tell a malformed name from a repeated one.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "chronoframe::frame::split_table",
        skip(table, cfg),
        fields(rows = table.height(), columns = table.width()),
    )
)]
pub fn split_table(
    table: &Table,
    cfg: &SeriesConfig,
) -> Result<Vec<(String, Timeseries)>, ChronoError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(table.width());
    for (label, _) in &table.columns {
        validate_identifier(label)?;
        if !seen.insert(label.as_str()) {
            return Err(ChronoError::duplicate_key(label.clone()));
        }
    }

    let index = TimeIndex::coerce(table.index.clone(), table.freq.clone())?;
    #[cfg(feature = "tracing")]
    tracing::debug!(kind = ?index.kind(), freq = ?index.freq(), "table index coerced");

    table
        .columns
        .iter()
        .map(|(label, values)| {
            let ts = Timeseries::builder(values.clone())
                .index(index.clone())
                .config(cfg.clone())
                .name(label.clone())
                .build()?;
            Ok((label.clone(), ts))
        })
        .collect()
}
