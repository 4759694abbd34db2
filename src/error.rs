//! Errors surfaced to callers of a query manager.
//!
//! Transport failures are not here: they end up in the manager's state as
//! an error message, never as an `Err` returned to the caller.

use crate::options::OptionsViolation;
use thiserror::Error;

/// Options were rejected before any state changed.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid query options: {}", render(.violations))]
pub struct ConfigError {
    pub violations: Vec<OptionsViolation>,
}

fn render(violations: &[OptionsViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a request was not started.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a fetch is already in flight (status: {status})")]
    Busy { status: crate::core::QueryStatus },

    #[error("query manager has been torn down")]
    TornDown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QueryScope;

    #[test]
    fn config_error_lists_every_violation() {
        let err = ConfigError {
            violations: vec![
                OptionsViolation::EmptyKey {
                    scope: QueryScope::Primary,
                },
                OptionsViolation::ReservedKey {
                    scope: QueryScope::Hydrate,
                    key: "hydrate".into(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid query options: primary query contains an empty key; \
             hydrate query key 'hydrate' is reserved by the transport"
        );
    }

    #[test]
    fn busy_names_the_status() {
        let err = QueryError::Busy {
            status: crate::core::QueryStatus::Hydrating,
        };
        assert_eq!(
            err.to_string(),
            "a fetch is already in flight (status: Hydrating)"
        );
    }
}
