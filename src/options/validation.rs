//! Options validation using Validation.
//!
//! Every rule is checked and all violations are reported together, so a
//! caller sees the whole problem with their options in one pass.

use super::{QueryMap, QueryOptions};
use crate::error::ConfigError;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Names the transport receives next to the query fields. A query key with
/// one of these names would be shadowed.
pub const RESERVED_KEYS: &[&str] = &["cancellationToken", "hydrate"];

/// Which query map a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Primary,
    Hydrate,
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Hydrate => f.write_str("hydrate"),
        }
    }
}

/// One broken options rule.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptionsViolation {
    #[error("{scope} query contains an empty key")]
    EmptyKey { scope: QueryScope },

    #[error("{scope} query key '{key}' is reserved by the transport")]
    ReservedKey { scope: QueryScope, key: String },
}

/// Check `options`, accumulating every violation.
pub fn validate(options: &QueryOptions) -> Validation<(), NonEmptyVec<OptionsViolation>> {
    let mut checks = query_checks(&options.query, QueryScope::Primary);
    if let Some(hydrate) = &options.hydrate {
        checks.extend(query_checks(&hydrate.query, QueryScope::Hydrate));
    }

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

/// [`validate`] as a `Result`, for `?` at the call site.
pub fn check(options: &QueryOptions) -> Result<(), ConfigError> {
    match validate(options) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(violations) => Err(ConfigError {
            violations: violations.iter().cloned().collect(),
        }),
    }
}

fn query_checks(
    query: &QueryMap,
    scope: QueryScope,
) -> Vec<Validation<(), NonEmptyVec<OptionsViolation>>> {
    query
        .keys()
        .map(|key| {
            if key.trim().is_empty() {
                Validation::fail(OptionsViolation::EmptyKey { scope })
            } else if RESERVED_KEYS.contains(&key.as_str()) {
                Validation::fail(OptionsViolation::ReservedKey {
                    scope,
                    key: key.clone(),
                })
            } else {
                Validation::success(())
            }
        })
        .collect()
}
