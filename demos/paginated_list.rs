//! Paginated list with lazy hydration against an in-memory backend.
//!
//! The primary fetch returns a page of ids and a total count. While fetching,
//! the transport declares those ids as hydration parameters, and the second
//! phase loads the expensive per-row details.
//!
//! Run with:
//!
//! ```text
//! RUST_LOG=querycycle=debug cargo run --example paginated_list
//! ```

use querycycle::transport::{transport_fn, HydrationHandle, TransportError, TransportRequest};
use querycycle::{HydrateOptions, QueryManager, QueryOptions, QueryStatus};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOTAL: u64 = 120;

async fn backend(request: TransportRequest, hydration: HydrationHandle) -> Result<Value, TransportError> {
    let latency = tokio::time::sleep(Duration::from_millis(50));
    tokio::select! {
        _ = request.cancellation.cancelled() => return Err(TransportError::Cancelled),
        _ = latency => {}
    }

    if request.hydrate {
        let ids = request.query.get("ids").cloned().unwrap_or_else(|| json!([]));
        let details: Vec<Value> = ids
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_u64)
            .map(|id| json!({"id": id, "owner": format!("user-{}", id % 7)}))
            .collect();
        return Ok(json!({"results": details, "count": TOTAL}));
    }

    let page = request.query.get("page").and_then(Value::as_u64).unwrap_or(1);
    let page_size = request.query.get("page_size").and_then(Value::as_u64).unwrap_or(30);
    let ids = page_ids(page, page_size);

    hydration
        .declare(HydrateOptions::new().param("ids", ids.clone()))
        .map_err(|err| TransportError::failed(err.to_string()))?;

    let rows: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    Ok(json!({"results": rows, "count": TOTAL}))
}

/// Ids on a 1-based page. Page 0 is treated as page 1.
fn page_ids(page: u64, page_size: u64) -> Vec<u64> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    (start..start.saturating_add(page_size).min(TOTAL)).collect()
}

fn summarize(label: &str, data: Option<&Value>) {
    let Some(data) = data else {
        info!(label, "no data");
        return;
    };
    let rows = data["results"].as_array().map(Vec::len).unwrap_or(0);
    info!(label, rows, count = %data["count"], first = %data["results"][0], "page");
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let manager = match QueryManager::builder()
        .transport(transport_fn(backend))
        .param("page", 1)
        .param("page_size", 30)
        .build()
    {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("failed to build manager: {err}");
            return;
        }
    };

    let mut updates = manager.subscribe();
    let first = updates
        .wait_for(|s| s.status == QueryStatus::Hydrated || s.status == QueryStatus::Error)
        .await
        .map(|s| s.clone());
    if let Ok(snapshot) = first {
        summarize("page 1", snapshot.data.as_ref());
    }

    if let Err(err) = manager.request(QueryOptions::new().param("page", 2)).await {
        eprintln!("request failed to start: {err}");
        return;
    }
    summarize("page 2", manager.snapshot().data.as_ref());

    let slow = manager.spawn_request(QueryOptions::new().param("page", 4));
    tokio::task::yield_now().await;
    manager.reset();
    let _ = slow.await;
    info!(status = %manager.status(), "after reset");

    for transition in manager.history().transitions() {
        info!(
            from = %transition.from,
            to = %transition.to,
            generation = transition.generation,
            "transition"
        );
    }
}
