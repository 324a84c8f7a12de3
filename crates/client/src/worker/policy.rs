//! Caching strategies.
//!
//! Every strategy returns a response; network and storage failures are
//! absorbed here. Storage errors count as a cache miss, network errors fall
//! back to the cache or to a synthetic 503.

use serde_json::json;
use swcache_core::{Error, Partition, PartitionKind, Request, Response};
use tokio::sync::oneshot;

use super::context::WorkerContext;
use super::router::Policy;

/// Body of the plain-text offline response.
pub const OFFLINE_TEXT: &str = "Offline - resource not available";

/// Synthetic 503 for cache-first and default paths.
pub fn offline_text() -> Response {
    Response::text(503, OFFLINE_TEXT)
}

/// Synthetic 503 for network-first (API) paths.
pub fn offline_json() -> Response {
    Response::json(
        503,
        &json!({
            "error": "offline",
            "message": "Network unavailable and no cached response",
        }),
    )
}

/// Run `policy` for `request` against the current version's `kind` partition.
pub async fn execute(ctx: &WorkerContext, policy: Policy, kind: PartitionKind, request: &Request) -> Response {
    match policy {
        Policy::CacheFirst => cache_first(ctx, kind, request).await,
        Policy::NetworkFirst => network_first(ctx, kind, request).await,
        Policy::StaleWhileRevalidate => stale_while_revalidate(ctx, kind, request).await,
    }
}

/// Serve from cache; on a miss fetch, store and return.
pub async fn cache_first(ctx: &WorkerContext, kind: PartitionKind, request: &Request) -> Response {
    let partition = open(ctx, kind).await;

    if let Some(cached) = lookup(ctx, partition.as_ref(), request).await {
        tracing::debug!("cache-first hit for {}", request.url);
        return cached;
    }

    match ctx.fetch(request).await {
        Ok(response) => {
            store(ctx, partition.as_ref(), request, &response).await;
            response
        }
        Err(e) => {
            tracing::debug!("cache-first miss and network failed for {}: {e}", request.url);
            offline_text()
        }
    }
}

/// Fetch and store; on network failure serve from cache.
pub async fn network_first(ctx: &WorkerContext, kind: PartitionKind, request: &Request) -> Response {
    let partition = open(ctx, kind).await;

    match ctx.fetch(request).await {
        Ok(response) => {
            store(ctx, partition.as_ref(), request, &response).await;
            response
        }
        Err(e) => {
            tracing::debug!("network-first falling back to cache for {}: {e}", request.url);
            match lookup(ctx, partition.as_ref(), request).await {
                Some(cached) => cached,
                None => offline_json(),
            }
        }
    }
}

/// Serve from cache immediately while refreshing in the background; on a
/// miss wait for that same refresh.
pub async fn stale_while_revalidate(ctx: &WorkerContext, kind: PartitionKind, request: &Request) -> Response {
    let partition = open(ctx, kind).await;
    let cached = lookup(ctx, partition.as_ref(), request).await;

    let (tx, rx) = oneshot::channel();
    let refresh_ctx = ctx.clone();
    let refresh_request = request.clone();
    ctx.background
        .spawn(async move { refresh(refresh_ctx, partition, refresh_request, tx).await })
        .await;

    if let Some(cached) = cached {
        tracing::debug!("stale-while-revalidate hit for {}", request.url);
        return cached;
    }

    match rx.await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::debug!("stale-while-revalidate miss and network failed for {}: {e}", request.url);
            offline_text()
        }
        Err(_) => offline_text(),
    }
}

/// Background half of stale-while-revalidate. The result is handed to any
/// waiting caller before the cache write starts.
async fn refresh(
    ctx: WorkerContext, partition: Option<Partition>, request: Request, tx: oneshot::Sender<Result<Response, Error>>,
) {
    let result = ctx.fetch(&request).await;
    let fresh = result.as_ref().ok().filter(|r| r.is_success()).cloned();

    if let Err(e) = &result {
        tracing::debug!("background refresh failed for {}: {e}", request.url);
    }

    // nobody is waiting on a cache hit
    let _ = tx.send(result);

    if let Some(response) = fresh {
        store(&ctx, partition.as_ref(), &request, &response).await;
    }
}

async fn open(ctx: &WorkerContext, kind: PartitionKind) -> Option<Partition> {
    match ctx.partition(kind).await {
        Ok(partition) => Some(partition),
        Err(e) => {
            tracing::warn!(partition = %kind, "failed to open partition, bypassing cache: {e}");
            None
        }
    }
}

async fn lookup(ctx: &WorkerContext, partition: Option<&Partition>, request: &Request) -> Option<Response> {
    let partition = partition?;
    match ctx.cache.match_request(partition, request).await {
        Ok(hit) => hit.map(|cached| cached.response),
        Err(e) => {
            report(partition, "lookup", request, &e);
            None
        }
    }
}

async fn store(ctx: &WorkerContext, partition: Option<&Partition>, request: &Request, response: &Response) {
    let Some(partition) = partition else { return };
    if !response.is_success() {
        return;
    }
    if let Err(e) = ctx.cache.put(partition, request, response).await {
        report(partition, "write", request, &e);
    }
}

/// Storage faults are worth a warning; anything else (a rejected record)
/// is routine.
fn report(partition: &Partition, op: &str, request: &Request, err: &Error) {
    if err.is_storage() {
        tracing::warn!(partition = partition.name(), "cache {op} failed for {}: {err}", request.url);
    } else {
        tracing::debug!(partition = partition.name(), "cache {op} skipped for {}: {err}", request.url);
    }
}
