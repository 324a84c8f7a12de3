//! Request classification.
//!
//! Ordered, first-match rules:
//!
//! 1. non-GET → passthrough
//! 2. non-network scheme → passthrough
//! 3. same-origin API path → network-first (auth allow-list) or
//!    stale-while-revalidate, both on the `api` partition
//! 4. same-origin static manifest path (exact) → cache-first on `static`
//! 5. anything else → stale-while-revalidate on `general`

use std::collections::HashSet;

use swcache_core::{AppConfig, PartitionKind, Request};
use url::Url;

/// Caching strategy applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
}

/// Routing decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted; the host lets the network handle it untouched.
    Passthrough,
    /// Intercepted and served by `policy` against `partition`.
    Handle { policy: Policy, partition: PartitionKind },
}

/// Fixed classification table built from configuration.
#[derive(Debug, Clone)]
pub struct Router {
    origin: Url,
    api_prefix: String,
    network_first_routes: Vec<String>,
    static_assets: HashSet<String>,
}

impl Router {
    pub fn new(config: &AppConfig, origin: Url) -> Self {
        Self {
            origin,
            api_prefix: config.api_prefix.clone(),
            network_first_routes: config.network_first_routes.clone(),
            static_assets: config.static_assets.iter().cloned().collect(),
        }
    }

    pub fn classify(&self, request: &Request) -> Route {
        if !request.is_read() || !request.has_network_scheme() {
            return Route::Passthrough;
        }

        let path = request.path();
        let same_origin = request.url.origin() == self.origin.origin();

        if same_origin && path.starts_with(&self.api_prefix) {
            let policy = if self.is_network_first(path) { Policy::NetworkFirst } else { Policy::StaleWhileRevalidate };
            return Route::Handle { policy, partition: PartitionKind::Api };
        }

        if same_origin && self.static_assets.contains(path) {
            return Route::Handle { policy: Policy::CacheFirst, partition: PartitionKind::Static };
        }

        Route::Handle { policy: Policy::StaleWhileRevalidate, partition: PartitionKind::General }
    }

    /// Allow-list match on whole path segments, so `/api/auth/login/otp`
    /// matches `/api/auth/login` but `/api/auth/loginhistory` does not.
    fn is_network_first(&self, path: &str) -> bool {
        self.network_first_routes.iter().any(|route| {
            path.strip_prefix(route.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}
