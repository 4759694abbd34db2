//! Folding incoming options into stored options.

use super::{HydrateOptions, QueryMap, QueryOptions};

/// Merge `incoming` over `stored`.
///
/// - `pause` takes the incoming value when set, otherwise the stored one.
/// - `query` merges key by key, incoming wins. Values are replaced whole;
///   nested objects are not merged.
/// - `hydrate` is present if either side has one, and its `query` merges
///   under the same rule, independently of the outer query.
///
/// Incoming wins on conflict, so the merge is not commutative. Applying the
/// same incoming options twice yields the same result as applying them once.
pub fn merge(stored: &QueryOptions, incoming: &QueryOptions) -> QueryOptions {
    let hydrate = match (&stored.hydrate, &incoming.hydrate) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(old), Some(new)) => Some(HydrateOptions {
            query: merge_query(&old.query, &new.query),
        }),
    };

    QueryOptions {
        query: merge_query(&stored.query, &incoming.query),
        hydrate,
        pause: incoming.pause.or(stored.pause),
    }
}

/// Shallow key-by-key merge, `incoming` overriding `stored`.
pub fn merge_query(stored: &QueryMap, incoming: &QueryMap) -> QueryMap {
    let mut merged = stored.clone();
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
