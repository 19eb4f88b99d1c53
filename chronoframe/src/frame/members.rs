use chronoframe_core::{
    ChronoError, DownStrategy, NaStrategy, Timeseries, Transformation, UpStrategy,
};

use crate::frame::macros::member_strategy_methods;
use crate::frame::util::validate_identifier;
use crate::{NewMember, SeriesFrame};

impl SeriesFrame {
    /// Add a member under `name`.
    ///
    /// Bare values are laid on the primary index with the frame's series
    /// defaults. The member's own name is overwritten with `name`.
    ///
    /// # Errors
    /// `InvalidIdentifier` when `name` breaks the identifier rule,
    /// `DuplicateKey` when it is taken, `TypeMismatch` when the member index
    /// cannot align with the primary index under strict membership.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        member: impl Into<NewMember>,
    ) -> Result<(), ChronoError> {
        let name = name.into();
        validate_identifier(&name)?;
        if self.contains(&name) {
            return Err(ChronoError::duplicate_key(name));
        }
        let ts = self.admit(&name, member.into())?;
        self.members.push((name, ts));
        Ok(())
    }

    /// Add a series under its own name.
    ///
    /// # Errors
    /// `InvalidIdentifier` when the series has no name, otherwise as
    /// [`SeriesFrame::add`].
    pub fn add_named(&mut self, ts: Timeseries) -> Result<(), ChronoError> {
        let name = ts
            .name()
            .map(str::to_string)
            .ok_or_else(|| ChronoError::invalid_identifier(""))?;
        self.add(name, ts)
    }

    /// Remove a member and hand it back.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn remove(&mut self, name: &str) -> Result<Timeseries, ChronoError> {
        let i = self
            .position(name)
            .ok_or_else(|| ChronoError::key_not_found(name))?;
        Ok(self.members.remove(i).1)
    }

    /// Alias of [`SeriesFrame::remove`].
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn drop(&mut self, name: &str) -> Result<Timeseries, ChronoError> {
        self.remove(name)
    }

    /// Replace a member in place, keeping its position, and return the old
    /// one.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`, `TypeMismatch` when the
    /// replacement cannot align with the primary index.
    pub fn replace(
        &mut self,
        name: &str,
        member: impl Into<NewMember>,
    ) -> Result<Timeseries, ChronoError> {
        let i = self
            .position(name)
            .ok_or_else(|| ChronoError::key_not_found(name))?;
        let ts = self.admit(name, member.into())?;
        Ok(std::mem::replace(&mut self.members[i].1, ts))
    }

    /// Rename a member, keeping its position.
    ///
    /// # Errors
    /// `KeyNotFound` for an unknown `from`, `InvalidIdentifier` for a bad
    /// `to`, `DuplicateKey` when `to` names another member.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<(), ChronoError> {
        let to = to.into();
        let i = self
            .position(from)
            .ok_or_else(|| ChronoError::key_not_found(from))?;
        validate_identifier(&to)?;
        if to != from && self.contains(&to) {
            return Err(ChronoError::duplicate_key(to));
        }
        let (slot, ts) = &mut self.members[i];
        ts.set_name(to.clone());
        *slot = to;
        Ok(())
    }

    /// Borrow a member read-only.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn get(&self, name: &str) -> Result<&Timeseries, ChronoError> {
        self.member(name)
    }

    /// Mutable borrow of a stored member. Edits land directly in the frame.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn access_series(&mut self, name: &str) -> Result<&mut Timeseries, ChronoError> {
        self.member_mut(name)
    }

    /// Mutable borrow of a member's transformation. Edits land directly in
    /// the member.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn access_transform(&mut self, name: &str) -> Result<&mut Transformation, ChronoError> {
        Ok(self.member_mut(name)?.transform_mut())
    }

    /// Replace a member's transformation.
    ///
    /// # Errors
    /// `KeyNotFound` when no member is called `name`.
    pub fn set_transform(&mut self, name: &str, t: Transformation) -> Result<(), ChronoError> {
        self.member_mut(name)?.set_transform(t);
        Ok(())
    }

    member_strategy_methods! {
        /// Missing-value strategy of a member.
        access: access_strat_na,
        /// Replace a member's missing-value strategy; the member is re-cleaned
        /// from its raw values and left unchanged on failure.
        set: set_strat_na,
        strategy: NaStrategy,
        get: strat_na,
        put: set_strat_na
    }

    member_strategy_methods! {
        /// Upsample strategy of a member.
        access: access_strat_up,
        /// Replace a member's upsample strategy.
        set: set_strat_up,
        strategy: UpStrategy,
        get: strat_up,
        put: set_strat_up
    }

    member_strategy_methods! {
        /// Downsample strategy of a member.
        access: access_strat_down,
        /// Replace a member's downsample strategy.
        set: set_strat_down,
        strategy: DownStrategy,
        get: strat_down,
        put: set_strat_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use chronoframe_core::TimeIndex;

    fn frame() -> SeriesFrame {
        let index = TimeIndex::duration_range(TimeDelta::days(1), 3).unwrap();
        SeriesFrame::builder()
            .index(index)
            .series("a", vec![1.0, 2.0, 3.0])
            .series("b", vec![4.0, 5.0, 6.0])
            .build()
            .unwrap()
    }

    #[test]
    fn rename_keeps_position_and_member_name() {
        let mut f = frame();
        f.rename("a", "alpha").unwrap();
        assert_eq!(f.names(), vec!["alpha", "b"]);
        assert_eq!(f.get("alpha").unwrap().name(), Some("alpha"));
        assert_eq!(f.rename("b", "alpha"), Err(ChronoError::duplicate_key("alpha")));
        assert_eq!(f.rename("zz", "c"), Err(ChronoError::key_not_found("zz")));
        f.rename("b", "b").unwrap();
    }

    #[test]
    fn replace_keeps_position() {
        let mut f = frame();
        let old = f.replace("a", vec![7.0, 8.0, 9.0]).unwrap();
        assert_eq!(old.name(), Some("a"));
        assert_eq!(f.names(), vec!["a", "b"]);
        assert_eq!(f.get("a").unwrap().size(), 3);
        assert!(matches!(
            f.replace("c", vec![1.0]),
            Err(ChronoError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut f = frame();
        assert_eq!(
            f.add("a", vec![0.0, 0.0, 0.0]),
            Err(ChronoError::duplicate_key("a"))
        );
    }

    #[test]
    fn strategy_setters_validate() {
        let mut f = frame();
        f.set_strat_down("b", "sum").unwrap();
        assert_eq!(f.access_strat_down("b").unwrap().name(), Some("sum"));
        assert!(matches!(
            f.set_strat_up("b", "nope"),
            Err(ChronoError::IncompatibleStrategy(_))
        ));
        assert_eq!(f.access_strat_up("b").unwrap().name(), Some("linear"));
        assert!(f.access_strat_na("x").is_err());
    }
}
