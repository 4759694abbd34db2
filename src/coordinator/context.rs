//! State owned by one manager and mutated only by its coordinator.

use crate::cancellation::CancellationController;
use crate::core::{transition, QueryEvent, QueryState, QueryStatus, StatusHistory, StatusTransition};
use crate::manager::QuerySnapshot;
use crate::options::QueryOptions;
use chrono::Utc;
use tracing::debug;

pub(crate) struct Context<D> {
    pub(crate) options: QueryOptions,
    pub(crate) state: QueryState<D>,
    pub(crate) has_fetched: bool,
    pub(crate) torn_down: bool,
    pub(crate) cancellation: CancellationController,
    pub(crate) history: StatusHistory<QueryStatus>,
}

impl<D: Clone> Context<D> {
    pub(crate) fn new(options: QueryOptions, history_limit: usize) -> Self {
        Self {
            options,
            state: QueryState::initial(),
            has_fetched: false,
            torn_down: false,
            cancellation: CancellationController::new(),
            history: StatusHistory::with_limit(history_limit),
        }
    }

    /// Whether a result from `generation` may still mutate state.
    pub(crate) fn accepts(&self, generation: u64) -> bool {
        !self.torn_down && self.cancellation.is_current(generation)
    }

    /// Feed `event` through the machine. Returns whether it was applied.
    ///
    /// Status changes are recorded in the history under `generation`.
    pub(crate) fn apply(&mut self, event: QueryEvent<D>, generation: u64) -> bool {
        let from = self.state.status;
        let event_name = event.name();
        let step = transition(std::mem::take(&mut self.state), event);
        let applied = step.is_applied();
        self.state = step.into_state();

        let to = self.state.status;
        if applied && from != to {
            self.history.record(StatusTransition {
                from,
                to,
                timestamp: Utc::now(),
                generation,
            });
        }
        debug!(event = event_name, %from, %to, applied, generation, "applied event");
        applied
    }

    pub(crate) fn snapshot(&self) -> QuerySnapshot<D> {
        QuerySnapshot::from_state(&self.state, self.has_fetched)
    }
}
