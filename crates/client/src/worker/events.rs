//! Events the host delivers and what the worker answers.

use bytes::Bytes;
use serde_json::Value;
use swcache_core::{Request, Response};

use super::message::ReplyPort;

/// One host event.
#[derive(Debug)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    Push(Option<Bytes>),
    NotificationClick { action: Option<String> },
    Message { data: Value, reply: Option<ReplyPort> },
}

impl WorkerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Push(_) => "push",
            WorkerEvent::NotificationClick { .. } => "notificationclick",
            WorkerEvent::Message { .. } => "message",
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Handled; nothing to return to the host.
    Done,
    /// The worker supplies this response to the page.
    Respond(Response),
    /// The worker declined; the host performs the request untouched.
    Passthrough,
}
