//! Request URL resolution for hosts and manifest entries.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a URL string the way a page would issue it.
///
/// Resolution steps:
/// 1. Trim leading/trailing whitespace
/// 2. Root-relative paths (`/...`) resolve against `origin`
/// 3. Anything else must be an absolute URL; its scheme is kept as-is so
///    non-network schemes reach the router and get passed through
/// 4. Remove fragment (#...), keep query string intact
pub fn resolve(input: &str, origin: &Url) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        origin.join(trimmed)
    } else {
        Url::parse(trimmed)
    }
    .map_err(|e| UrlError::InvalidUrl(format!("{trimmed}: {e}")))?;

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost:3000").unwrap()
    }

    #[test]
    fn test_resolve_root_relative() {
        let url = resolve("/index.html", &origin()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/index.html");
    }

    #[test]
    fn test_resolve_absolute() {
        let url = resolve("https://cdn.example.com/app.js", &origin()).unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn test_resolve_lowercases_host() {
        let url = resolve("https://EXAMPLE.COM/a", &origin()).unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_resolve_remove_fragment() {
        let url = resolve("/page?a=1#section", &origin()).unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("a=1"));
    }

    #[test]
    fn test_resolve_keeps_extension_scheme() {
        let url = resolve("chrome-extension://abcdef/content.js", &origin()).unwrap();
        assert_eq!(url.scheme(), "chrome-extension");
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve("   ", &origin()), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_relative_without_slash() {
        assert!(matches!(resolve("index.html", &origin()), Err(UrlError::InvalidUrl(_))));
    }
}
