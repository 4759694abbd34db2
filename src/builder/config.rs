//! Manager configuration.

use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

/// What to do with a request that arrives while a fetch is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Cancel the in-flight call and start a new generation. The superseded
    /// call's result is discarded whenever it arrives.
    #[default]
    Supersede,
    /// Refuse the new request with [`QueryError::Busy`](crate::QueryError::Busy).
    Reject,
}

/// Tunables for a query manager.
///
/// ```rust
/// use querycycle::builder::{ManagerConfig, OverlapPolicy};
///
/// let config: ManagerConfig = serde_json::from_str(r#"{ "overlap": "reject" }"#).unwrap();
/// assert_eq!(config.overlap, OverlapPolicy::Reject);
/// assert_eq!(config.history_limit, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub overlap: OverlapPolicy,
    /// Number of status transitions kept in the manager's history.
    pub history_limit: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::Supersede,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
