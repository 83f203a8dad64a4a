//! Caller identification.
//!
//! The API only needs to know whether a request is identified and by whom.
//! Authentication itself happens upstream.
use axum::http::{HeaderMap, HeaderName};
use review_votes_shared::types::CallerIdentity;

/// Maps request headers to the authenticated caller, if any.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity>;
}

/// Trusts a header set by the auth gateway in front of the API.
#[derive(Debug, Clone)]
pub struct HeaderIdentityResolver {
    header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .and_then(CallerIdentity::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn resolver() -> HeaderIdentityResolver {
        HeaderIdentityResolver::new(HeaderName::from_static("x-caller-identity"))
    }

    #[test]
    fn test_resolves_configured_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-caller-identity", HeaderValue::from_static("user-1"));

        let caller = resolver().resolve(&headers).unwrap();
        assert_eq!(caller.as_str(), "user-1");
    }

    #[test]
    fn test_missing_or_blank_header_is_anonymous() {
        assert!(resolver().resolve(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("x-caller-identity", HeaderValue::from_static("   "));
        assert!(resolver().resolve(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("x-other", HeaderValue::from_static("user-1"));
        assert!(resolver().resolve(&headers).is_none());
    }
}
