//! The request interceptor.
//!
//! A [`Worker`] owns one version's lifecycle and routing table and handles
//! host events through [`Worker::dispatch`]:
//!
//! - `install` / `activate` drive the [`lifecycle`] state machine
//! - `fetch` is classified by the [`router`] and served by a [`policy`]
//! - `push` / `notificationclick` go to [`push`]
//! - `message` goes to [`message`]

pub mod context;
pub mod events;
pub mod lifecycle;
pub mod message;
pub mod policy;
pub mod push;
pub mod router;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{WorkerContext, WorkerHost};
pub use events::{EventOutcome, WorkerEvent};
pub use lifecycle::{Lifecycle, Phase};
pub use message::{ClientMessage, ReplyPort};
pub use push::{ClickOutcome, Notification, NotificationAction};
pub use router::{Policy, Route, Router};
pub use tasks::BackgroundTasks;

use swcache_core::{Error, Request};

/// One deployed version of the interceptor.
pub struct Worker {
    ctx: WorkerContext,
    router: Router,
    lifecycle: Lifecycle,
}

impl Worker {
    pub fn new(ctx: WorkerContext) -> Self {
        let router = Router::new(&ctx.config, ctx.origin().clone());
        Self { ctx, router, lifecycle: Lifecycle::default() }
    }

    pub fn context(&self) -> &WorkerContext {
        &self.ctx
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub async fn phase(&self) -> Phase {
        self.lifecycle.phase().await
    }

    /// Handle one host event.
    ///
    /// Install and activate are awaited to completion, so the host keeps the
    /// worker alive for as long as this call runs. Background refreshes are
    /// not; see [`Worker::settle`].
    ///
    /// # Errors
    ///
    /// Only lifecycle events fail: a failed install, or an event in the
    /// wrong phase. Fetches always produce an outcome.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome, Error> {
        tracing::debug!(event = event.kind(), "dispatching");
        match event {
            WorkerEvent::Install => {
                self.lifecycle.install(&self.ctx).await?;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Activate => {
                self.lifecycle.activate(&self.ctx).await?;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Fetch(request) => Ok(self.handle_fetch(&request).await),
            WorkerEvent::Push(payload) => {
                push::handle_push(&self.ctx, payload.as_deref()).await;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::NotificationClick { action } => {
                push::handle_click(&self.ctx, action.as_deref()).await?;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Message { data, reply } => {
                message::handle_message(&self.ctx, &data, reply).await;
                Ok(EventOutcome::Done)
            }
        }
    }

    /// Route one intercepted request.
    pub async fn handle_fetch(&self, request: &Request) -> EventOutcome {
        match self.router.classify(request) {
            Route::Passthrough => {
                tracing::debug!("passing through {} {}", request.method, request.url);
                EventOutcome::Passthrough
            }
            Route::Handle { policy, partition } => {
                tracing::debug!(?policy, %partition, "routing {}", request.url);
                EventOutcome::Respond(policy::execute(&self.ctx, policy, partition, request).await)
            }
        }
    }

    /// Wait for every background cache refresh to finish.
    pub async fn settle(&self) {
        self.ctx.background.settle().await;
    }
}
