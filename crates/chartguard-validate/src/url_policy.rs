use chartguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Which external URLs may be linked from charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlPolicy {
    /// Reject anything but `https` when set; otherwise `http` is allowed too.
    pub require_https: bool,
    /// Hosts that are allowed, together with their subdomains.
    pub allowed_domains: Vec<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            require_https: true,
            allowed_domains: vec!["data.gov.rs".to_string()],
        }
    }
}

impl UrlPolicy {
    pub fn new<I, S>(allowed_domains: I, require_https: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            require_https,
            allowed_domains: allowed_domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse, check and canonicalize an untrusted absolute URL.
    pub fn sanitize_url(&self, raw: &str) -> Result<String> {
        let url = Url::parse(raw).map_err(|err| {
            tracing::debug!(event = "url_rejected", reason = "unparsable");
            Error::InvalidUrl(format!("'{raw}': {err}"))
        })?;

        let scheme_ok = match url.scheme() {
            "https" => true,
            "http" => !self.require_https,
            _ => false,
        };
        if !scheme_ok {
            tracing::debug!(event = "url_rejected", reason = "scheme", scheme = url.scheme());
            return Err(Error::SchemeNotAllowed(url.scheme().to_string()));
        }

        let host = url.host_str().unwrap_or_default();
        if !self.is_domain_allowed(host) {
            tracing::debug!(event = "url_rejected", reason = "domain", host = host);
            return Err(Error::DomainNotAllowed(host.to_string()));
        }

        Ok(url.to_string())
    }

    /// True when `host` equals an allowed domain or is one of its subdomains.
    pub fn is_domain_allowed(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        self.allowed_domains.iter().any(|domain| {
            let domain = domain.trim_matches('.').to_ascii_lowercase();
            !domain.is_empty()
                && (host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.')))
        })
    }
}

/// Sanitize `url` against `policy`.
pub fn sanitize_url(url: &str, policy: &UrlPolicy) -> Result<String> {
    policy.sanitize_url(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_domain_and_subdomains_only() {
        let policy = UrlPolicy::new(["data.gov.rs"], true);
        assert!(policy.is_domain_allowed("data.gov.rs"));
        assert!(policy.is_domain_allowed("API.Data.Gov.Rs"));
        assert!(policy.is_domain_allowed("data.gov.rs."));
        assert!(!policy.is_domain_allowed("evildata.gov.rs"));
        assert!(!policy.is_domain_allowed("data.gov.rs.evil.com"));
        assert!(!policy.is_domain_allowed(""));
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let policy = UrlPolicy::new(Vec::<String>::new(), false);
        assert!(matches!(
            policy.sanitize_url("https://data.gov.rs/"),
            Err(Error::DomainNotAllowed(_))
        ));
    }

    #[test]
    fn http_is_allowed_only_when_not_hardened() {
        let relaxed = UrlPolicy::new(["stat.gov.rs"], false);
        assert_eq!(
            relaxed.sanitize_url("http://stat.gov.rs/a").unwrap(),
            "http://stat.gov.rs/a"
        );
        let hardened = UrlPolicy::new(["stat.gov.rs"], true);
        assert!(matches!(
            hardened.sanitize_url("http://stat.gov.rs/a"),
            Err(Error::SchemeNotAllowed(_))
        ));
    }

    #[test]
    fn other_schemes_are_never_allowed() {
        let relaxed = UrlPolicy::new(["data.gov.rs"], false);
        for raw in ["ftp://data.gov.rs/x", "data:text/html,hi", "file:///etc/passwd"] {
            assert!(
                matches!(relaxed.sanitize_url(raw), Err(Error::SchemeNotAllowed(_))),
                "expected scheme rejection for {raw}"
            );
        }
    }
}
