//! Query options and the rules for combining them.
//!
//! A manager keeps one stored [`QueryOptions`]. Every request folds the
//! caller's partial options into it with [`merge`], after [`validate`] has
//! checked the incoming side.
//!
//! # Example
//!
//! ```rust
//! use querycycle::options::{merge, QueryOptions};
//! use serde_json::json;
//!
//! let stored = QueryOptions::new().param("page", 1).param("page_size", 30);
//! let next = merge(&stored, &QueryOptions::new().param("page", 2));
//!
//! assert_eq!(next.query["page"], json!(2));
//! assert_eq!(next.query["page_size"], json!(30));
//! ```

mod merge;
mod validation;

pub use merge::{merge, merge_query};
pub use validation::{check, validate, OptionsViolation, QueryScope, RESERVED_KEYS};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shallow map of query parameters.
pub type QueryMap = Map<String, Value>;

/// Options for one manager: the primary query, an optional hydration spec
/// and the pause flag.
///
/// Every field is optional so the same type describes both the stored
/// options and a caller's partial update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub query: QueryMap,
    /// Present (even if empty) when a hydration fetch should follow the
    /// primary one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydrate: Option<HydrateOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<bool>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one primary query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Request a hydration fetch with the given spec.
    pub fn hydrate(mut self, hydrate: HydrateOptions) -> Self {
        self.hydrate = Some(hydrate);
        self
    }

    pub fn pause(mut self, pause: bool) -> Self {
        self.pause = Some(pause);
        self
    }

    /// Whether the initial automatic request is suppressed.
    pub fn is_paused(&self) -> bool {
        self.pause.unwrap_or(false)
    }

    pub fn wants_hydration(&self) -> bool {
        self.hydrate.is_some()
    }
}

/// Parameters for the hydration fetch.
///
/// Hydration options cannot nest another hydration or carry a pause flag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrateOptions {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub query: QueryMap,
}

impl HydrateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one hydration query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

impl From<HydrateOptions> for QueryOptions {
    /// Options that only declare hydration parameters.
    fn from(hydrate: HydrateOptions) -> Self {
        Self {
            hydrate: Some(hydrate),
            ..Self::default()
        }
    }
}
