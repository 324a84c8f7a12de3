//! Test doubles for the network and the host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use swcache_core::{AppConfig, CacheDb, Error, Network, Request, Response};
use url::Url;

use super::context::{WorkerContext, WorkerHost};
use super::push::Notification;

/// Scripted behaviour for one URL.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(Response),
    Fail,
    Hang,
}

#[derive(Default)]
struct Inner {
    scripts: HashMap<String, Script>,
    calls: HashMap<String, usize>,
}

/// Network double answering from a per-URL script. Unscripted URLs fail.
#[derive(Clone, Default)]
pub struct ScriptedNetwork {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, script: Script) {
        let key = Url::parse(url).unwrap().to_string();
        self.inner.lock().unwrap().scripts.insert(key, script);
    }

    pub fn calls(&self, url: &str) -> usize {
        let key = Url::parse(url).unwrap().to_string();
        self.inner.lock().unwrap().calls.get(&key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.values().sum()
    }
}

#[async_trait::async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let script = {
            let mut inner = self.inner.lock().unwrap();
            let key = request.url.to_string();
            *inner.calls.entry(key.clone()).or_default() += 1;
            inner.scripts.get(&key).cloned()
        };

        match script {
            Some(Script::Respond(response)) => Ok(response),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Fail) | None => Err(Error::Network(format!("unreachable: {}", request.url))),
        }
    }
}

/// Serve a 200 for every static asset in `config`.
pub fn serve_manifest(network: &ScriptedNetwork, config: &AppConfig) {
    let origin = config.origin_url().unwrap();
    for asset in &config.static_assets {
        let url = origin.join(asset).unwrap();
        network.script(url.as_str(), Script::Respond(Response::text(200, format!("asset {asset}"))));
    }
}

/// A call the worker made on its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SkipWaiting,
    ClaimClients,
    ShowNotification(Notification),
    OpenWindow(String),
}

/// Host double recording every capability call.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) {
        self.record(HostCall::SkipWaiting);
    }

    async fn claim_clients(&self) {
        self.record(HostCall::ClaimClients);
    }

    async fn show_notification(&self, notification: &Notification) {
        self.record(HostCall::ShowNotification(notification.clone()));
    }

    async fn open_window(&self, url: &Url) {
        self.record(HostCall::OpenWindow(url.to_string()));
    }
}

pub async fn test_context(network: ScriptedNetwork) -> (WorkerContext, Arc<RecordingHost>) {
    test_context_with(AppConfig::default(), network).await
}

pub async fn test_context_with(config: AppConfig, network: ScriptedNetwork) -> (WorkerContext, Arc<RecordingHost>) {
    let cache = CacheDb::open_in_memory().await.unwrap();
    let host = Arc::new(RecordingHost::default());
    let ctx = WorkerContext::new(config, cache, Arc::new(network), host.clone()).unwrap();
    (ctx, host)
}
