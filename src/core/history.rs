//! Status transition history.
//!
//! Keeps an ordered, bounded record of every transition a manager applied,
//! so callers can inspect the path a cycle took.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions a history retains.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use querycycle::core::{QueryStatus, StatusTransition};
/// use chrono::Utc;
///
/// let transition = StatusTransition {
///     from: QueryStatus::Idle,
///     to: QueryStatus::Loading,
///     timestamp: Utc::now(),
///     generation: 1,
/// };
/// assert_eq!(transition.generation, 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StatusTransition<S: State> {
    /// Status before the event
    pub from: S,
    /// Status after the event
    pub to: S,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
    /// Fetch generation that caused it (0 for transitions outside a fetch)
    pub generation: u64,
}

/// Bounded, ordered history of status transitions.
///
/// Once `limit` transitions are held, recording a new one evicts the oldest.
///
/// # Example
///
/// ```rust
/// use querycycle::core::{QueryStatus, StatusHistory, StatusTransition};
/// use chrono::Utc;
///
/// let mut history = StatusHistory::new();
/// history.record(StatusTransition {
///     from: QueryStatus::Idle,
///     to: QueryStatus::Loading,
///     timestamp: Utc::now(),
///     generation: 1,
/// });
/// history.record(StatusTransition {
///     from: QueryStatus::Loading,
///     to: QueryStatus::Loaded,
///     timestamp: Utc::now(),
///     generation: 1,
/// });
///
/// let path = history.path();
/// assert_eq!(path, vec![&QueryStatus::Idle, &QueryStatus::Loading, &QueryStatus::Loaded]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StatusHistory<S: State> {
    transitions: VecDeque<StatusTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StatusHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StatusHistory<S> {
    /// Create an empty history holding at most [`DEFAULT_HISTORY_LIMIT`] transitions.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history holding at most `limit` transitions.
    ///
    /// A limit of zero is raised to one.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StatusTransition<S>) {
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed: the `from` of the oldest retained transition, then
    /// the `to` of each transition in order.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// States entered by transitions of one generation, in order.
    pub fn path_for(&self, generation: u64) -> Vec<&S> {
        self.transitions
            .iter()
            .filter(|t| t.generation == generation)
            .map(|t| &t.to)
            .collect()
    }

    /// Time between the oldest and newest retained transition.
    ///
    /// Returns `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StatusTransition<S>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QueryStatus;

    fn step(from: QueryStatus, to: QueryStatus, generation: u64) -> StatusTransition<QueryStatus> {
        StatusTransition {
            from,
            to,
            timestamp: Utc::now(),
            generation,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StatusHistory<QueryStatus> = StatusHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn path_follows_recorded_order() {
        let mut history = StatusHistory::new();
        history.record(step(QueryStatus::Idle, QueryStatus::Loading, 1));
        history.record(step(QueryStatus::Loading, QueryStatus::Loaded, 1));
        history.record(step(QueryStatus::Loaded, QueryStatus::Hydrating, 2));
        history.record(step(QueryStatus::Hydrating, QueryStatus::Hydrated, 2));

        assert_eq!(
            history.path(),
            vec![
                &QueryStatus::Idle,
                &QueryStatus::Loading,
                &QueryStatus::Loaded,
                &QueryStatus::Hydrating,
                &QueryStatus::Hydrated,
            ]
        );
        assert_eq!(
            history.path_for(2),
            vec![&QueryStatus::Hydrating, &QueryStatus::Hydrated]
        );
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut history = StatusHistory::with_limit(2);
        history.record(step(QueryStatus::Idle, QueryStatus::Loading, 1));
        history.record(step(QueryStatus::Loading, QueryStatus::Loaded, 1));
        history.record(step(QueryStatus::Loaded, QueryStatus::Loading, 2));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.path(),
            vec![&QueryStatus::Loading, &QueryStatus::Loaded, &QueryStatus::Loading]
        );
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let mut history = StatusHistory::with_limit(0);
        history.record(step(QueryStatus::Idle, QueryStatus::Loading, 1));
        history.record(step(QueryStatus::Loading, QueryStatus::Error, 1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.limit(), 1);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let mut history = StatusHistory::new();
        history.record(step(QueryStatus::Idle, QueryStatus::Loading, 1));
        std::thread::sleep(std::time::Duration::from_millis(10));
        history.record(step(QueryStatus::Loading, QueryStatus::Loaded, 1));

        let duration = history.duration().unwrap();
        assert!(duration >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn history_serializes() {
        let mut history = StatusHistory::new();
        history.record(step(QueryStatus::Idle, QueryStatus::Loading, 3));

        let json = serde_json::to_string(&history).unwrap();
        let restored: StatusHistory<QueryStatus> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.transitions().next().unwrap().generation, 3);
    }
}
