//! The public face of a query lifecycle.
//!
//! A [`QueryManager`] owns one coordinator. Callers read snapshots and call
//! `request`, `abort` and `reset`; everything else happens inside.
//!
//! # Example
//!
//! ```rust
//! use querycycle::{QueryManager, QueryOptions, QueryStatus};
//! use querycycle::transport::{transport_fn, TransportError};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = QueryManager::builder()
//!     .transport(transport_fn(|request, _| async move {
//!         Ok::<_, TransportError>(json!({ "page": request.query["page"], "count": 120 }))
//!     }))
//!     .param("page", 1)
//!     .pause(true)
//!     .build()
//!     .unwrap();
//!
//! manager.request(QueryOptions::new().param("page", 2)).await.unwrap();
//!
//! let snapshot = manager.snapshot();
//! assert_eq!(snapshot.status, QueryStatus::Loaded);
//! assert_eq!(snapshot.data.unwrap()["page"], json!(2));
//! # }
//! ```

mod snapshot;

pub use snapshot::QuerySnapshot;

use crate::builder::QueryManagerBuilder;
use crate::coordinator::Coordinator;
use crate::core::{QueryStatus, StatusHistory};
use crate::error::QueryError;
use crate::options::QueryOptions;
use crate::transport::Transport;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Drives a two-phase fetch and exposes its state.
///
/// Dropping the manager tears it down: the in-flight call is cancelled and
/// any result that still arrives is discarded.
pub struct QueryManager<T: Transport> {
    coordinator: Coordinator<T>,
}

impl<T: Transport> QueryManager<T> {
    pub fn builder() -> QueryManagerBuilder<T> {
        QueryManagerBuilder::new()
    }

    pub(crate) fn from_coordinator(coordinator: Coordinator<T>) -> Self {
        Self { coordinator }
    }

    /// Unique id of this manager, attached to its log events.
    pub fn id(&self) -> Uuid {
        self.coordinator.id()
    }

    /// Merge `options` into the stored options and run a fetch cycle.
    ///
    /// Resolves once the cycle settles or is superseded. Transport failures
    /// are reported through the state, so the only errors here are invalid
    /// options, a rejected overlap, or a torn-down manager.
    pub async fn request(&self, options: QueryOptions) -> Result<(), QueryError> {
        self.coordinator.request(options).await
    }

    /// Run a fetch cycle with the stored options unchanged.
    pub async fn refetch(&self) -> Result<(), QueryError> {
        self.request(QueryOptions::new()).await
    }

    /// Run [`request`](Self::request) as a detached Tokio task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn_request(&self, options: QueryOptions) -> JoinHandle<Result<(), QueryError>> {
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move { coordinator.request(options).await })
    }

    /// Cancel the in-flight call, if any. Status is unchanged until the
    /// transport reacts.
    pub fn abort(&self) {
        self.coordinator.abort();
    }

    /// Cancel the in-flight call and return to the initial state.
    pub fn reset(&self) {
        self.coordinator.reset();
    }

    /// Stop accepting work and discard anything still in flight.
    pub fn teardown(&self) {
        self.coordinator.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.coordinator.is_torn_down()
    }

    pub fn snapshot(&self) -> QuerySnapshot<T::Output> {
        self.coordinator.snapshot()
    }

    pub fn status(&self) -> QueryStatus {
        self.snapshot().status
    }

    /// Receive a new snapshot after every applied transition.
    ///
    /// Intermediate snapshots may be skipped by a slow receiver; use
    /// [`history`](Self::history) for the full path.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T::Output>> {
        self.coordinator.subscribe()
    }

    /// Current stored options.
    pub fn options(&self) -> QueryOptions {
        self.coordinator.options()
    }

    /// Recorded status transitions.
    pub fn history(&self) -> StatusHistory<QueryStatus> {
        self.coordinator.history()
    }

    /// Current value of the generation counter.
    ///
    /// It advances for every transport call and for every reset, so a
    /// generation number is never reused. After a reset it names no call.
    pub fn generation(&self) -> u64 {
        self.coordinator.generation()
    }
}

impl<T: Transport> Drop for QueryManager<T> {
    fn drop(&mut self) {
        self.coordinator.teardown();
    }
}
