//! Install/activate lifecycle.
//!
//! Install seeds the static partition all-or-nothing. Activate drops every
//! partition that does not belong to the current version and claims the
//! open page contexts.

use std::fmt;

use futures_util::future::try_join_all;
use swcache_core::{Error, PartitionKind, Request, Response};
use tokio::sync::Mutex;

use super::context::WorkerContext;
use crate::fetch::resolve;

/// Lifecycle phase of one worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    /// Steady-state request handling.
    Active,
    /// Install failed; the previous version keeps serving.
    Redundant,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninstalled => "uninstalled",
            Phase::Installing => "installing",
            Phase::Installed => "installed",
            Phase::Activating => "activating",
            Phase::Active => "active",
            Phase::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// Lifecycle state machine.
pub struct Lifecycle {
    phase: Mutex<Phase>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { phase: Mutex::new(Phase::Uninstalled) }
    }
}

impl Lifecycle {
    pub async fn phase(&self) -> Phase {
        *self.phase.lock().await
    }

    /// Handle the install trigger.
    ///
    /// Returns the number of manifest entries stored.
    pub async fn install(&self, ctx: &WorkerContext) -> Result<usize, Error> {
        self.transition(Phase::Uninstalled, Phase::Installing).await?;
        tracing::info!(version = %ctx.config.version, "installing");

        let (result, ()) = tokio::join!(populate_static(ctx), ctx.host.skip_waiting());

        let mut phase = self.phase.lock().await;
        match result {
            Ok(count) => {
                *phase = Phase::Installed;
                tracing::info!(version = %ctx.config.version, assets = count, "installed");
                Ok(count)
            }
            Err(e) => {
                *phase = Phase::Redundant;
                tracing::warn!(version = %ctx.config.version, "install failed: {e}");
                Err(e)
            }
        }
    }

    /// Handle the activate trigger.
    ///
    /// Returns the names of the partitions that were deleted.
    pub async fn activate(&self, ctx: &WorkerContext) -> Result<Vec<String>, Error> {
        self.transition(Phase::Installed, Phase::Activating).await?;
        tracing::info!(version = %ctx.config.version, "activating");

        match evict_stale_partitions(ctx).await {
            Ok(deleted) => {
                ctx.host.claim_clients().await;
                *self.phase.lock().await = Phase::Active;
                tracing::info!(version = %ctx.config.version, deleted = deleted.len(), "active");
                Ok(deleted)
            }
            Err(e) => {
                *self.phase.lock().await = Phase::Installed;
                Err(e)
            }
        }
    }

    async fn transition(&self, from: Phase, to: Phase) -> Result<(), Error> {
        let mut phase = self.phase.lock().await;
        if *phase != from {
            return Err(Error::InvalidState(format!("cannot enter {to} from {}", *phase)));
        }
        *phase = to;
        Ok(())
    }
}

/// Fetch every manifest asset, then store them in one transaction.
pub async fn populate_static(ctx: &WorkerContext) -> Result<usize, Error> {
    let partition = ctx.partition(PartitionKind::Static).await?;

    let requests = ctx
        .config
        .static_assets
        .iter()
        .map(|asset| {
            resolve(asset, ctx.origin())
                .map(Request::get)
                .map_err(|e| Error::InstallFailed(format!("{asset}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let entries: Vec<(Request, Response)> = try_join_all(requests.into_iter().map(|request| async move {
        let response = ctx
            .fetch(&request)
            .await
            .map_err(|e| Error::InstallFailed(format!("{}: {e}", request.url.path())))?;
        if !response.is_success() {
            return Err(Error::InstallFailed(format!("{} returned {}", request.url.path(), response.status)));
        }
        Ok::<_, Error>((request, response))
    }))
    .await?;

    ctx.cache.put_all(&partition, &entries).await?;
    Ok(entries.len())
}

/// Ensure the current partitions exist and delete every other one.
pub async fn evict_stale_partitions(ctx: &WorkerContext) -> Result<Vec<String>, Error> {
    let keep = ctx.config.current_partitions();
    for name in &keep {
        ctx.cache.open_partition(name).await?;
    }
    let deleted = ctx.cache.delete_all_except(&keep).await?;
    for name in &deleted {
        tracing::info!(partition = %name, "deleted stale partition");
    }
    Ok(deleted)
}
