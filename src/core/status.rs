//! Lifecycle status of a query cycle.

use crate::status_enum;

status_enum! {
    /// Where a query manager stands in its fetch cycle.
    ///
    /// `Idle` is the initial status. `Loaded`, `Hydrated` and `Error` end a
    /// cycle; a new request starts the next one.
    #[derive(Copy, Eq, Hash, Default)]
    pub enum QueryStatus {
        /// Nothing requested yet, or reset.
        #[default]
        Idle,
        /// Primary fetch in flight.
        Loading,
        /// Primary fetch succeeded.
        Loaded,
        /// Hydration fetch in flight.
        Hydrating,
        /// Hydration fetch succeeded.
        Hydrated,
        /// The last fetch failed.
        Error,
    }
    final: [Loaded, Hydrated, Error]
    error: [Error]
    in_flight: [Loading, Hydrating]
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(crate::core::State::name(self))
    }
}
