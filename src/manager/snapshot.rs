//! Read-only view of a manager's state.

use crate::core::{QueryState, QueryStatus};
use serde::{Deserialize, Serialize};

/// What a caller sees of a query manager at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Set by the first successful fetch; cleared only by a reset.
    pub has_fetched: bool,
}

impl<T> QuerySnapshot<T> {
    pub(crate) fn from_state(state: &QueryState<T>, has_fetched: bool) -> Self
    where
        T: Clone,
    {
        Self {
            status: state.status,
            data: state.data.clone(),
            error: state.error.clone(),
            has_fetched,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Loading | QueryStatus::Hydrating)
    }
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            has_fetched: false,
        }
    }
}
