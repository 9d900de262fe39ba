//! Access token verification
//!
//! Tokens are issued by an external identity provider. This service only
//! verifies them and reduces the claims to a [`Principal`]:
//! - RS256 tokens are checked against the issuer's JSON Web Key Set, which is
//!   cached and refreshed when a token names an unknown key id, at most once
//!   per refresh interval
//! - HS256 tokens signed with a shared secret are accepted for local
//!   development only

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{ApiError, ApiResult};
use crate::models::principal::Claims;
use crate::models::Principal;

/// Timeout for JWKS requests to the issuer
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum time between two key set fetches triggered by unknown key ids
pub const DEFAULT_JWKS_MIN_REFRESH: Duration = Duration::from_secs(30);

/// Where signing keys come from
#[derive(Debug, Clone)]
pub enum KeySource {
    /// RS256 keys published by the issuer
    ///
    /// The set is reused for `cache_ttl`. A token naming an unknown key id
    /// only triggers a refetch once the set is older than `min_refresh`.
    Jwks {
        url: String,
        cache_ttl: Duration,
        min_refresh: Duration,
    },
    /// HS256 shared secret
    Secret(String),
}

/// Token verifier configuration
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Expected `iss` claim; not checked when `None`
    pub issuer: Option<String>,
    /// Expected `aud` claim; not checked when `None`
    pub audience: Option<String>,
    /// Allowed clock skew in seconds
    pub leeway_secs: u64,
    pub keys: KeySource,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies bearer tokens and builds the request principal
pub struct TokenVerifier {
    config: VerifierConfig,
    http_client: reqwest::Client,
    jwks: RwLock<Option<CachedKeys>>,
}

impl TokenVerifier {
    /// Create a new token verifier
    pub fn new(config: VerifierConfig) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            http_client,
            jwks: RwLock::new(None),
        })
    }

    /// Verifier for an issuer publishing a JWKS document
    pub fn jwks(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_url: impl Into<String>,
        cache_ttl: Duration,
    ) -> ApiResult<Self> {
        Self::new(VerifierConfig {
            issuer: Some(issuer.into()),
            audience: Some(audience.into()),
            leeway_secs: 60,
            keys: KeySource::Jwks {
                url: jwks_url.into(),
                cache_ttl,
                min_refresh: DEFAULT_JWKS_MIN_REFRESH,
            },
        })
    }

    /// Verifier for HS256 tokens signed with `secret`
    pub fn shared_secret(secret: impl Into<String>) -> ApiResult<Self> {
        Self::new(VerifierConfig {
            issuer: None,
            audience: None,
            leeway_secs: 60,
            keys: KeySource::Secret(secret.into()),
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a bearer token and return the caller
    ///
    /// # Errors
    /// - `ApiError::InvalidToken` if the token is malformed, expired, signed
    ///   by an unknown key or carries the wrong issuer/audience
    /// - `ApiError::Jwks` if the issuer's key set cannot be fetched
    pub async fn verify(&self, token: &str) -> ApiResult<Principal> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Malformed token header");
            ApiError::InvalidToken(e.to_string())
        })?;

        let (key, algorithm) = match &self.config.keys {
            KeySource::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            KeySource::Jwks {
                url,
                cache_ttl,
                min_refresh,
            } => {
                let kid = header
                    .kid
                    .as_deref()
                    .ok_or_else(|| ApiError::InvalidToken("token has no key id".to_string()))?;
                let key = self.signing_key(url, *cache_ttl, *min_refresh, kid).await?;
                (key, Algorithm::RS256)
            }
        };

        if header.alg != algorithm {
            return Err(ApiError::InvalidToken(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        let data = decode::<Claims>(token, &key, &self.validation(algorithm)).map_err(|e| {
            tracing::debug!(error = %e, "Access token verification failed");
            ApiError::InvalidToken(e.to_string())
        })?;

        Ok(Principal::from(data.claims))
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = self.config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Find the decoding key for `kid`
    ///
    /// An unknown `kid` refetches the key set unless it was fetched less than
    /// `min_refresh` ago. Key ids come from the unverified header, so forged
    /// tokens must not reach the issuer more than once per interval.
    async fn signing_key(
        &self,
        url: &str,
        ttl: Duration,
        min_refresh: Duration,
        kid: &str,
    ) -> ApiResult<DecodingKey> {
        {
            let cached = self.jwks.read().await;
            if let Some(cached) = cached.as_ref().filter(|c| c.fetched_at.elapsed() < ttl) {
                if let Some(jwk) = cached.keys.find(kid) {
                    return Ok(DecodingKey::from_jwk(jwk)?);
                }
                if cached.fetched_at.elapsed() < min_refresh {
                    return Err(unknown_key(kid));
                }
            }
        }

        // Refreshes are serialized; whoever waited behind one reuses its result
        let mut cached = self.jwks.write().await;
        if let Some(fresh) = cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < ttl.min(min_refresh))
        {
            return match fresh.keys.find(kid) {
                Some(jwk) => Ok(DecodingKey::from_jwk(jwk)?),
                None => Err(unknown_key(kid)),
            };
        }

        let keys = self.fetch_jwks(url).await?;
        let key = keys.find(kid).map(DecodingKey::from_jwk).transpose()?;
        *cached = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| unknown_key(kid))
    }

    async fn fetch_jwks(&self, url: &str) -> ApiResult<JwkSet> {
        tracing::debug!(url, "Fetching JWKS");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::Jwks(format!("failed to fetch {}: {}", url, e)))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| ApiError::Jwks(format!("invalid key set from {}: {}", url, e)))
    }
}

fn unknown_key(kid: &str) -> ApiError {
    tracing::warn!(kid, "Token signed with unknown key");
    ApiError::InvalidToken(format!("unknown signing key: {}", kid))
}
