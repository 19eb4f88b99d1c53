/// Generate the read accessor and validated setter for one member strategy.
///
/// The accessor borrows the member's strategy; the setter forwards to the
/// member's own setter so validation (and re-cleaning for the missing-value
/// strategy) happens in one place.
macro_rules! member_strategy_methods {
    (
        $(#[$ameta:meta])*
        access: $access:ident,
        $(#[$smeta:meta])*
        set: $set:ident,
        strategy: $ty:ty,
        get: $get:ident,
        put: $put:ident
    ) => {
        $(#[$ameta])*
        ///
        /// # Errors
        /// Returns `KeyNotFound` when no member is called `name`.
        pub fn $access(&self, name: &str) -> Result<&$ty, chronoframe_core::ChronoError> {
            Ok(self.member(name)?.$get())
        }

        $(#[$smeta])*
        ///
        /// # Errors
        /// Returns `KeyNotFound` when no member is called `name`, or
        /// `IncompatibleStrategy` when the member rejects the strategy.
        #[cfg_attr(
            feature = "tracing",
            tracing::instrument(target = "chronoframe::frame", skip(self, s))
        )]
        pub fn $set(
            &mut self,
            name: &str,
            s: impl Into<$ty>,
        ) -> Result<(), chronoframe_core::ChronoError> {
            self.member_mut(name)?.$put(s)
        }
    };
}

pub(crate) use member_strategy_methods;
