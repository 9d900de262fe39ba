//! Identity provider configuration types
//!
//! Tokens are issued by an external OAuth2/OIDC provider (an Auth0 tenant in
//! the default deployment). The API only needs to know where the issuer lives
//! and which audience its tokens must carry.

use crate::{get_optional_env, parse_env, ConfigResult};

/// External token issuer configuration
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    /// Issuer domain, e.g. `tenant.eu.auth0.com`
    pub domain: Option<String>,

    /// Expected `aud` claim
    pub audience: Option<String>,

    /// How long a fetched JWKS document is reused, in seconds
    pub jwks_cache_ttl_secs: u64,

    /// Minimum time between key set refetches caused by unknown key ids, in seconds
    pub jwks_min_refresh_secs: u64,

    /// Allowed clock skew when checking `exp`/`nbf`, in seconds
    pub leeway_secs: u64,
}

impl IdentityConfig {
    /// Load identity configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            domain: get_optional_env("AUTH0_DOMAIN"),
            audience: get_optional_env("AUTH0_AUDIENCE"),
            jwks_cache_ttl_secs: parse_env("JWKS_CACHE_TTL_SECS", 300)?,
            jwks_min_refresh_secs: parse_env("JWKS_MIN_REFRESH_SECS", 30)?,
            leeway_secs: parse_env("JWT_LEEWAY_SECS", 60)?,
        })
    }

    /// Create a configuration for a given domain and audience (useful for testing)
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            audience: Some(audience.into()),
            jwks_cache_ttl_secs: 300,
            jwks_min_refresh_secs: 30,
            leeway_secs: 60,
        }
    }

    /// Issuer URL expected in the `iss` claim
    ///
    /// A bare domain becomes `https://{domain}/`; a value that already carries
    /// a scheme is used as-is apart from normalizing the trailing slash.
    pub fn issuer(&self) -> Option<String> {
        self.domain.as_deref().map(|domain| {
            let base = if domain.starts_with("http://") || domain.starts_with("https://") {
                domain.trim_end_matches('/').to_string()
            } else {
                format!("https://{}", domain.trim_end_matches('/'))
            };
            format!("{}/", base)
        })
    }

    /// Location of the issuer's JSON Web Key Set
    pub fn jwks_url(&self) -> Option<String> {
        self.issuer()
            .map(|issuer| format!("{}.well-known/jwks.json", issuer))
    }

    /// Check if both issuer and audience are configured
    pub fn is_configured(&self) -> bool {
        self.domain.is_some() && self.audience.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_from_bare_domain() {
        let config = IdentityConfig::new("tenant.auth0.com", "https://api.taskboard");
        assert_eq!(config.issuer().unwrap(), "https://tenant.auth0.com/");
        assert_eq!(
            config.jwks_url().unwrap(),
            "https://tenant.auth0.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_issuer_keeps_explicit_scheme() {
        let config = IdentityConfig::new("http://127.0.0.1:9000/", "aud");
        assert_eq!(config.issuer().unwrap(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_unconfigured() {
        let config = IdentityConfig::default();
        assert!(!config.is_configured());
        assert!(config.issuer().is_none());
        assert!(config.jwks_url().is_none());
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("AUTH0_DOMAIN", Some("example.auth0.com")),
                ("AUTH0_AUDIENCE", Some("taskboard")),
                ("JWKS_CACHE_TTL_SECS", Some("60")),
                ("JWKS_MIN_REFRESH_SECS", Some("5")),
                ("JWT_LEEWAY_SECS", None),
            ],
            || {
                let config = IdentityConfig::from_env().unwrap();
                assert!(config.is_configured());
                assert_eq!(config.jwks_cache_ttl_secs, 60);
                assert_eq!(config.jwks_min_refresh_secs, 5);
                assert_eq!(config.leeway_secs, 60);
            },
        );
    }
}
