//! Request identity and cache key generation.

use sha2::{Digest, Sha256};
use url::Url;

/// Canonical form of a request URL: host lower-cased, fragment removed,
/// query kept as-is.
pub fn canonical_url(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    if let Some(host) = url.host_str().map(str::to_lowercase)
        && canonical.set_host(Some(&host)).is_err()
    {
        tracing::debug!("keeping original host for {}", url);
    }
    canonical
}

/// Compute the cache key for a request identity.
pub fn compute_request_key(method: &str, url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical_url(url).as_str().as_bytes());
    hex::encode(hasher.finalize())
}
