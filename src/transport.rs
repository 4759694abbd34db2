//! The boundary between a query manager and whatever performs the fetch.
//!
//! A [`Transport`] receives the merged query for one phase, a cancellation
//! token, and a [`HydrationHandle`] it may use to declare hydration
//! parameters it discovers while fetching.

use crate::error::ConfigError;
use crate::options::{HydrateOptions, QueryMap};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure reported by a transport.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Failed(String),
}

impl TransportError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Data a transport resolves with.
///
/// A payload may report an error even though the call itself succeeded; the
/// manager treats such a payload as a failure.
pub trait Payload: Clone + Send + Sync + 'static {
    /// Error carried inside the payload, if any.
    fn embedded_error(&self) -> Option<String> {
        None
    }
}

impl Payload for Value {
    /// A top-level `"error"` field that is neither `null` nor `false`.
    ///
    /// Strings are used as-is; objects with a string `"message"` use that;
    /// anything else is rendered as JSON.
    fn embedded_error(&self) -> Option<String> {
        match self.get("error")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) => Some(message.clone()),
            Value::Object(fields) => match fields.get("message") {
                Some(Value::String(message)) => Some(message.clone()),
                _ => Some(Value::Object(fields.clone()).to_string()),
            },
            other => Some(other.to_string()),
        }
    }
}

/// Everything a transport gets for one call.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// Merged query for this phase.
    pub query: QueryMap,
    /// Cancelled when the manager aborts this call.
    pub cancellation: CancellationToken,
    /// `true` for the hydration phase.
    pub hydrate: bool,
    /// Generation this call belongs to.
    pub generation: u64,
}

impl TransportRequest {
    /// Query fields plus the `hydrate` flag, as a flat parameter map.
    pub fn params(&self) -> QueryMap {
        let mut params = self.query.clone();
        params.insert("hydrate".to_string(), Value::Bool(self.hydrate));
        params
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

pub(crate) type DeclareFn =
    dyn Fn(u64, HydrateOptions) -> Result<(), ConfigError> + Send + Sync;

/// Lets a running transport call register hydration parameters.
///
/// Declarations are merged into the manager's stored options and take
/// effect for the hydration phase that follows this call. Declarations made
/// by a call that is no longer current are dropped.
#[derive(Clone)]
pub struct HydrationHandle {
    generation: u64,
    sink: Arc<DeclareFn>,
}

impl HydrationHandle {
    pub(crate) fn new(generation: u64, sink: Arc<DeclareFn>) -> Self {
        Self { generation, sink }
    }

    /// A handle that accepts and discards every declaration.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            sink: Arc::new(|_: u64, _: HydrateOptions| -> Result<(), ConfigError> { Ok(()) }),
        }
    }

    /// Merge `spec` into the stored hydration options.
    pub fn declare(&self, spec: HydrateOptions) -> Result<(), ConfigError> {
        (self.sink)(self.generation, spec)
    }
}

impl fmt::Debug for HydrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HydrationHandle")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Performs one fetch.
///
/// Implementations should watch `request.cancellation` and return
/// [`TransportError::Cancelled`] promptly once it fires. Timeouts are the
/// transport's business.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Output: Payload;

    async fn fetch(
        &self,
        request: TransportRequest,
        hydration: HydrationHandle,
    ) -> Result<Self::Output, TransportError>;
}

/// A [`Transport`] backed by an async closure. Built by [`transport_fn`].
pub struct FnTransport<F> {
    f: F,
}

/// Wrap an async closure as a [`Transport`].
///
/// ```rust
/// use querycycle::transport::{transport_fn, TransportError};
/// use serde_json::json;
///
/// let transport = transport_fn(|request, _hydration| async move {
///     Ok::<_, TransportError>(json!({ "echo": request.query }))
/// });
/// # let _ = transport;
/// ```
pub fn transport_fn<F, Fut, D>(f: F) -> FnTransport<F>
where
    F: Fn(TransportRequest, HydrationHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<D, TransportError>> + Send + 'static,
    D: Payload,
{
    FnTransport { f }
}

#[async_trait]
impl<F, Fut, D> Transport for FnTransport<F>
where
    F: Fn(TransportRequest, HydrationHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<D, TransportError>> + Send + 'static,
    D: Payload,
{
    type Output = D;

    async fn fetch(
        &self,
        request: TransportRequest,
        hydration: HydrationHandle,
    ) -> Result<D, TransportError> {
        (self.f)(request, hydration).await
    }
}
