//! Request coordination: the effectful shell around the pure core.
//!
//! A request merges options, then runs up to two transport calls:
//!
//! ```text
//! request(partial)
//!     │ validate + merge
//!     ▼
//! Start ──► Loading ── fetch(primary) ──┬─► Fail ──► Error
//!                                       │
//!                                       └─► Success ──► Loaded
//!                                                        │ hydrate spec stored?
//!                                                        ▼
//!                           StartHydrate ──► Hydrating ── fetch(hydrate) ──► Hydrated | Error
//! ```
//!
//! Each call runs under its own generation. Before applying a result the
//! coordinator checks that the manager is not torn down and that the call's
//! generation is still current; otherwise the result is dropped. The context
//! lock is never held across an await.
//!
//! Between the phases the coordinator publishes `Loaded` and yields once, so
//! subscribers get to see the primary payload before hydration starts.

mod context;

pub(crate) use context::Context;

use crate::builder::{ManagerConfig, OverlapPolicy};
use crate::cancellation::GenerationToken;
use crate::core::{QueryEvent, QueryStatus, StatusHistory};
use crate::error::{ConfigError, QueryError};
use crate::manager::QuerySnapshot;
use crate::options::{self, merge, HydrateOptions, QueryMap, QueryOptions};
use crate::transport::{HydrationHandle, Payload, Transport, TransportError, TransportRequest};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::runtime::Handle;
use tracing::{debug, debug_span, warn, Instrument, Span};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Primary,
    Hydrate,
}

/// What happened when a call's result came back.
#[derive(Debug, PartialEq, Eq)]
enum Settled {
    /// Applied; the cycle is over.
    Done,
    /// Primary fetch applied and hydration is wanted.
    Hydrate,
    /// Stale or torn down; nothing changed.
    Discarded,
}

pub(crate) struct Shared<D> {
    pub(crate) id: Uuid,
    pub(crate) config: ManagerConfig,
    pub(crate) context: Mutex<Context<D>>,
    pub(crate) snapshots: watch::Sender<QuerySnapshot<D>>,
}

impl<D: Payload> Shared<D> {
    fn publish(&self, ctx: &Context<D>) {
        self.snapshots.send_replace(ctx.snapshot());
    }

    fn declare_hydration(&self, generation: u64, declared: &QueryOptions) {
        let mut ctx = self.context.lock();
        if !ctx.accepts(generation) {
            debug!(generation, "dropping hydration declared by a stale call");
            return;
        }
        ctx.options = merge(&ctx.options, declared);
        debug!(generation, "hydration parameters declared");
    }
}

/// Drives request cycles for one manager.
pub struct Coordinator<T: Transport> {
    shared: Arc<Shared<T::Output>>,
    transport: Arc<T>,
}

impl<T: Transport> Clone for Coordinator<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Coordinator<T> {
    pub(crate) fn new(transport: T, options: QueryOptions, config: ManagerConfig) -> Self {
        let context = Context::new(options, config.history_limit);
        let (snapshots, _) = watch::channel(context.snapshot());
        Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                config,
                context: Mutex::new(context),
                snapshots,
            }),
            transport: Arc::new(transport),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Merge `incoming` into the stored options and run one request cycle.
    ///
    /// Returns `Err` only when the request could not start. Transport
    /// failures end up in the state, not in the return value.
    pub async fn request(&self, incoming: QueryOptions) -> Result<(), QueryError> {
        let span = self.span();
        self.run(incoming).instrument(span).await
    }

    async fn run(&self, incoming: QueryOptions) -> Result<(), QueryError> {
        let (token, query) = self.start(&incoming)?;
        self.drive(token, query).await;
        Ok(())
    }

    /// Admit the initial request now and run its transport calls on `runtime`.
    ///
    /// The manager is already Loading when this returns, so a request made
    /// right after construction supersedes (or is rejected by) this one.
    pub(crate) fn spawn_initial(&self, runtime: &Handle) -> Result<(), QueryError> {
        let span = self.span();
        let (token, query) = span.in_scope(|| self.start(&QueryOptions::new()))?;
        let coordinator = self.clone();
        runtime.spawn(async move { coordinator.drive(token, query).await }.instrument(span));
        Ok(())
    }

    fn span(&self) -> Span {
        debug_span!("query_request", manager_id = %self.shared.id)
    }

    /// Validate and admit a request: merge options, issue a generation and
    /// move to Loading. Nothing here awaits.
    fn start(&self, incoming: &QueryOptions) -> Result<(GenerationToken, QueryMap), QueryError> {
        options::check(incoming)?;
        self.begin(incoming)
    }

    /// Run the transport calls of an admitted request.
    async fn drive(&self, token: GenerationToken, query: QueryMap) {
        let result = self.call(&token, query, false).await;
        if self.settle(&token, result, Phase::Primary) != Settled::Hydrate {
            return;
        }

        tokio::task::yield_now().await;
        let Some((token, query)) = self.begin_hydration(token.generation()) else {
            return;
        };
        let result = self.call(&token, query, true).await;
        self.settle(&token, result, Phase::Hydrate);
    }

    fn begin(&self, incoming: &QueryOptions) -> Result<(GenerationToken, QueryMap), QueryError> {
        let mut guard = self.shared.context.lock();
        let ctx = &mut *guard;
        if ctx.torn_down {
            return Err(QueryError::TornDown);
        }

        match ctx.state.status {
            QueryStatus::Idle | QueryStatus::Loaded | QueryStatus::Hydrated | QueryStatus::Error => {}
            status @ (QueryStatus::Loading | QueryStatus::Hydrating) => {
                match self.shared.config.overlap {
                    OverlapPolicy::Reject => {
                        warn!(%status, "rejecting request while a fetch is in flight");
                        return Err(QueryError::Busy { status });
                    }
                    OverlapPolicy::Supersede => {
                        debug!(%status, "superseding in-flight fetch");
                        ctx.cancellation.abort();
                    }
                }
            }
        }

        ctx.options = merge(&ctx.options, incoming);
        let token = ctx.cancellation.issue();
        ctx.apply(QueryEvent::Start, token.generation());
        self.shared.publish(ctx);
        Ok((token, ctx.options.query.clone()))
    }

    async fn call(
        &self,
        token: &GenerationToken,
        query: QueryMap,
        hydrate: bool,
    ) -> Result<T::Output, TransportError> {
        let generation = token.generation();
        let request = TransportRequest {
            query,
            cancellation: token.token().clone(),
            hydrate,
            generation,
        };
        debug!(generation, hydrate, "calling transport");
        self.transport
            .fetch(request, self.hydration_handle(generation))
            .await
    }

    fn hydration_handle(&self, generation: u64) -> HydrationHandle {
        let shared: Weak<Shared<T::Output>> = Arc::downgrade(&self.shared);
        HydrationHandle::new(
            generation,
            Arc::new(
                move |generation: u64, spec: HydrateOptions| -> Result<(), ConfigError> {
                    let declared = QueryOptions::from(spec);
                    options::check(&declared)?;
                    if let Some(shared) = shared.upgrade() {
                        shared.declare_hydration(generation, &declared);
                    }
                    Ok(())
                },
            ),
        )
    }

    fn settle(
        &self,
        token: &GenerationToken,
        result: Result<T::Output, TransportError>,
        phase: Phase,
    ) -> Settled {
        let generation = token.generation();
        let mut guard = self.shared.context.lock();
        let ctx = &mut *guard;
        if !ctx.accepts(generation) {
            debug!(generation, ?phase, torn_down = ctx.torn_down, "discarding stale result");
            return Settled::Discarded;
        }

        let outcome = match result {
            Ok(payload) => match payload.embedded_error() {
                Some(message) => Err(message),
                None => Ok(payload),
            },
            Err(err) => Err(err.to_string()),
        };

        let payload = match outcome {
            Ok(payload) => payload,
            Err(message) => {
                warn!(generation, ?phase, error = %message, "fetch failed");
                ctx.apply(QueryEvent::Fail(message), generation);
                self.shared.publish(ctx);
                return Settled::Done;
            }
        };

        if ctx.apply(QueryEvent::Success(payload), generation) {
            ctx.has_fetched = true;
        }
        self.shared.publish(ctx);

        match phase {
            Phase::Primary if ctx.options.wants_hydration() => Settled::Hydrate,
            Phase::Primary | Phase::Hydrate => Settled::Done,
        }
    }

    /// Enter the hydration phase for the primary call of `generation`.
    ///
    /// Returns `None` when that call has been superseded, reset or torn down
    /// since its result was applied.
    fn begin_hydration(&self, generation: u64) -> Option<(GenerationToken, QueryMap)> {
        let mut guard = self.shared.context.lock();
        let ctx = &mut *guard;
        if !ctx.accepts(generation) {
            debug!(generation, "skipping hydration for a stale cycle");
            return None;
        }

        let query = ctx.options.hydrate.as_ref()?.query.clone();
        let token = ctx.cancellation.issue();
        ctx.apply(QueryEvent::StartHydrate, token.generation());
        self.shared.publish(ctx);
        Some((token, query))
    }

    /// Signal the current call's token. Status is left alone.
    pub fn abort(&self) {
        let mut ctx = self.shared.context.lock();
        if ctx.torn_down {
            return;
        }
        match ctx.state.status {
            QueryStatus::Loading | QueryStatus::Hydrating => {
                if ctx.cancellation.abort() {
                    debug!(manager_id = %self.shared.id, status = %ctx.state.status, "aborted current fetch");
                }
            }
            QueryStatus::Idle | QueryStatus::Loaded | QueryStatus::Hydrated | QueryStatus::Error => {
                debug!(manager_id = %self.shared.id, "nothing in flight to abort");
            }
        }
    }

    /// Abort, retire the current generation and return to the initial state.
    pub fn reset(&self) {
        let mut guard = self.shared.context.lock();
        let ctx = &mut *guard;
        if ctx.torn_down {
            debug!(manager_id = %self.shared.id, "ignoring reset after teardown");
            return;
        }
        ctx.cancellation.invalidate();
        ctx.apply(QueryEvent::Reset, 0);
        ctx.has_fetched = false;
        self.shared.publish(ctx);
    }

    /// Stop accepting work. Any result that arrives later is discarded.
    pub fn teardown(&self) {
        let mut ctx = self.shared.context.lock();
        if ctx.torn_down {
            return;
        }
        ctx.torn_down = true;
        ctx.cancellation.invalidate();
        debug!(manager_id = %self.shared.id, "torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.context.lock().torn_down
    }

    pub fn snapshot(&self) -> QuerySnapshot<T::Output> {
        self.shared.context.lock().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot<T::Output>> {
        self.shared.snapshots.subscribe()
    }

    pub fn options(&self) -> QueryOptions {
        self.shared.context.lock().options.clone()
    }

    pub fn history(&self) -> StatusHistory<QueryStatus> {
        self.shared.context.lock().history.clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.context.lock().cancellation.generation()
    }
}
