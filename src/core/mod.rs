//! Pure core of the query lifecycle.
//!
//! - The [`State`] trait and the [`QueryStatus`] enumeration
//! - The transition function over [`QueryState`] and [`QueryEvent`]
//! - Bounded [`StatusHistory`] of applied transitions
//!
//! Nothing in this module performs I/O or awaits.

mod history;
mod machine;
mod state;
mod status;

pub use history::{StatusHistory, StatusTransition, DEFAULT_HISTORY_LIMIT};
pub use machine::{transition, QueryEvent, QueryState, Step};
pub use state::State;
pub use status::QueryStatus;
