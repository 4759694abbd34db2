//! Pure transition function for the query lifecycle.
//!
//! The machine owns no I/O and no clock. Given a state and an event it
//! returns the next state and whether the event was applied. Pairs that the
//! transition table does not define leave the state untouched and report
//! [`Step::Ignored`].

use super::status::QueryStatus;
use serde::{Deserialize, Serialize};

/// Events the coordinator feeds into the machine.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryEvent<T> {
    /// Begin a primary fetch.
    Start,
    /// Begin a hydration fetch.
    StartHydrate,
    /// The current fetch resolved with a payload.
    Success(T),
    /// The current fetch failed with a message.
    Fail(String),
    /// Return to the initial state.
    Reset,
}

impl<T> QueryEvent<T> {
    /// Event name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::StartHydrate => "StartHydrate",
            Self::Success(_) => "Success",
            Self::Fail(_) => "Fail",
            Self::Reset => "Reset",
        }
    }
}

/// Status plus the data and error a query cycle has produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> QueryState<T> {
    /// The initial state: idle, no data, no error.
    pub fn initial() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

/// Outcome of feeding one event to the machine.
#[derive(Clone, Debug, PartialEq)]
pub enum Step<T> {
    /// The event matched a row of the table.
    Applied(QueryState<T>),
    /// The event is undefined for the current status; state is unchanged.
    Ignored(QueryState<T>),
}

impl<T> Step<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn state(&self) -> &QueryState<T> {
        match self {
            Self::Applied(state) | Self::Ignored(state) => state,
        }
    }

    pub fn into_state(self) -> QueryState<T> {
        match self {
            Self::Applied(state) | Self::Ignored(state) => state,
        }
    }
}

/// Apply `event` to `state`.
///
/// | From | Event | To |
/// |---|---|---|
/// | Idle, Loaded, Hydrated, Error | Start | Loading |
/// | Hydrating | Start | Loading |
/// | Loading, Loaded, Hydrating | StartHydrate | Hydrating |
/// | Loading | Success | Loaded (data replaced) |
/// | Hydrating | Success | Hydrated (data replaced) |
/// | any | Fail | Error (error set) |
/// | any | Reset | Idle (data and error cleared) |
///
/// `Loaded + StartHydrate` is the normal entry into the second phase: the
/// primary payload has landed and a hydration spec is stored.
/// `Hydrating + Start` lets a superseding request restart the cycle while
/// hydration is still outstanding. Every pair not listed is ignored.
pub fn transition<T>(state: QueryState<T>, event: QueryEvent<T>) -> Step<T> {
    use QueryStatus::*;

    match (state.status, event) {
        (Idle | Loaded | Hydrated | Error | Hydrating, QueryEvent::Start) => {
            Step::Applied(QueryState {
                status: Loading,
                ..state
            })
        }
        (Loading | Loaded | Hydrating, QueryEvent::StartHydrate) => Step::Applied(QueryState {
            status: Hydrating,
            ..state
        }),
        (Loading, QueryEvent::Success(payload)) => Step::Applied(QueryState {
            status: Loaded,
            data: Some(payload),
            ..state
        }),
        (Hydrating, QueryEvent::Success(payload)) => Step::Applied(QueryState {
            status: Hydrated,
            data: Some(payload),
            ..state
        }),
        (_, QueryEvent::Fail(message)) => Step::Applied(QueryState {
            status: Error,
            error: Some(message),
            ..state
        }),
        (_, QueryEvent::Reset) => Step::Applied(QueryState::initial()),
        (Loading, QueryEvent::Start)
        | (Idle | Hydrated | Error, QueryEvent::StartHydrate)
        | (Idle | Loaded | Hydrated | Error, QueryEvent::Success(_)) => Step::Ignored(state),
    }
}
