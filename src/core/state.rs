//! Core State trait for lifecycle statuses.
//!
//! Anything tracked by a [`StatusHistory`](super::StatusHistory) implements this trait,
//! which provides pure methods for inspecting a status without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for lifecycle states.
///
/// All methods are pure. A state is an immutable value describing where a
/// query cycle currently stands.
///
/// # Required Traits
///
/// - `Clone` + `PartialEq`: states are compared and recorded in history
/// - `Debug`: states show up in diagnostics and log fields
/// - `Serialize` + `Deserialize`: snapshots of a manager are serializable
///
/// # Example
///
/// ```rust
/// use querycycle::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Upload {
///     Queued,
///     Sending,
///     Sent,
///     Rejected,
/// }
///
/// impl State for Upload {
///     fn name(&self) -> &str {
///         match self {
///             Self::Queued => "Queued",
///             Self::Sending => "Sending",
///             Self::Sent => "Sent",
///             Self::Rejected => "Rejected",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Sent | Self::Rejected)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Rejected)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used for display and log fields.
    fn name(&self) -> &str;

    /// Whether this state ends a cycle.
    ///
    /// A terminal state accepts a new cycle but no further progress within the
    /// current one. Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether this state represents a failure.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Whether work is outstanding while in this state.
    ///
    /// Default implementation returns `false`.
    fn is_in_flight(&self) -> bool {
        false
    }
}
