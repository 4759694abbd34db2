//! Querycycle: an asynchronous query lifecycle manager
//!
//! A [`QueryManager`] drives a two-phase fetch: a primary query, optionally
//! followed by a hydration query for auxiliary data. It exposes a small state
//! machine to its caller and supports cancellation and safe teardown.
//!
//! # Core Concepts
//!
//! - **Status**: `Idle → Loading → Loaded → Hydrating → Hydrated`, or `Error`
//! - **Options**: stored query parameters; each request merges a partial
//!   update into them
//! - **Generations**: every transport call gets a fresh cancellation token;
//!   only the current generation may change state
//! - **Transport**: the caller-supplied fetch, see [`transport::Transport`]
//!
//! The pure parts (transition function, option merging, validation) live in
//! [`core`] and [`options`]. The coordinator is the effectful shell around
//! them.
//!
//! # Example
//!
//! ```rust
//! use querycycle::{HydrateOptions, QueryManager, QueryStatus};
//! use querycycle::transport::{transport_fn, TransportError};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = QueryManager::builder()
//!     .transport(transport_fn(|request, _| async move {
//!         if request.hydrate {
//!             Ok::<_, TransportError>(json!({ "results": [{ "id": 1, "owner": "ana" }] }))
//!         } else {
//!             Ok(json!({ "results": [{ "id": 1 }] }))
//!         }
//!     }))
//!     .param("page", 1)
//!     .hydrate(HydrateOptions::new())
//!     .build()
//!     .unwrap();
//!
//! let mut updates = manager.subscribe();
//! let settled = updates
//!     .wait_for(|s| s.status == QueryStatus::Hydrated)
//!     .await
//!     .unwrap()
//!     .clone();
//! assert_eq!(settled.data.unwrap()["results"][0]["owner"], json!("ana"));
//! # }
//! ```

mod macros;

pub mod builder;
pub mod cancellation;
pub mod core;
pub mod error;
pub mod manager;
pub mod options;
pub mod transport;

mod coordinator;

// Re-export commonly used types
pub use crate::builder::{BuildError, ManagerConfig, OverlapPolicy, QueryManagerBuilder};
pub use crate::core::{QueryEvent, QueryState, QueryStatus, State, StatusHistory};
pub use crate::error::{ConfigError, QueryError};
pub use crate::manager::{QueryManager, QuerySnapshot};
pub use crate::options::{merge, HydrateOptions, QueryOptions};
pub use crate::transport::{Payload, Transport, TransportError, TransportRequest};
