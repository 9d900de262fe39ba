//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use taskboard_shared_config::{
    get_optional_env, parse_env, CommonConfig, DatabaseConfig, Environment, IdentityConfig,
};

use crate::graphql::schema::DEFAULT_MAX_DEPTH;
use crate::services::{KeySource, VerifierConfig};

/// Minimum required length for JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Default per-operation deadline in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// HS256 secret for locally issued development tokens
    pub jwt_secret: Option<String>,

    /// Deadline for a single GraphQL operation
    pub request_timeout: Duration,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Maximum nesting depth of a GraphQL operation
    pub max_query_depth: usize,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `AUTH0_DOMAIN` and `AUTH0_AUDIENCE`: tokens must be verified
    ///   against the issuer's published keys
    /// - `DATABASE_URL`: Must be explicitly set (no insecure defaults)
    ///
    /// and rejects `JWT_SECRET`. In development either an issuer or a
    /// `JWT_SECRET` must be configured.
    pub fn from_env() -> Result<Self> {
        // Determine environment first to know if we need strict validation
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        if is_production {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let jwt_secret = Self::load_jwt_secret(is_production, &common.identity)?;

        let max_query_depth = parse_env("GRAPHQL_MAX_DEPTH", DEFAULT_MAX_DEPTH)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        if max_query_depth == 0 {
            bail!("GRAPHQL_MAX_DEPTH must be at least 1");
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            jwt_secret,

            request_timeout: Duration::from_secs(
                parse_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            ),

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),

            max_query_depth,
        })
    }

    /// Load and validate JWT_SECRET against the identity configuration
    ///
    /// In production the issuer must be configured and no shared secret may
    /// be set. Elsewhere a secret is accepted if it is long enough, and at
    /// least one of issuer or secret is required.
    fn load_jwt_secret(is_production: bool, identity: &IdentityConfig) -> Result<Option<String>> {
        let secret = get_optional_env("JWT_SECRET");

        if is_production {
            if secret.is_some() {
                bail!("JWT_SECRET must not be set in production; tokens are verified against AUTH0_DOMAIN");
            }
            if !identity.is_configured() {
                bail!("AUTH0_DOMAIN and AUTH0_AUDIENCE are required in production");
            }
            return Ok(None);
        }

        match secret {
            Some(secret) if secret.len() < MIN_JWT_SECRET_LENGTH => {
                bail!(
                    "JWT_SECRET must be at least {} characters (got {})",
                    MIN_JWT_SECRET_LENGTH,
                    secret.len()
                );
            }
            Some(secret) => {
                tracing::warn!("Accepting HS256 tokens signed with JWT_SECRET. Do not use this in production.");
                Ok(Some(secret))
            }
            None if identity.is_configured() => Ok(None),
            None => bail!("either AUTH0_DOMAIN/AUTH0_AUDIENCE or JWT_SECRET must be set"),
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Settings for the token verifier
    ///
    /// The issuer's key set wins when configured; otherwise the development
    /// secret is used, still checking issuer and audience if they are set.
    pub fn verifier(&self) -> Result<VerifierConfig> {
        let identity = &self.common.identity;

        let keys = match (identity.jwks_url(), &self.jwt_secret) {
            (Some(url), None) => KeySource::Jwks {
                url,
                cache_ttl: Duration::from_secs(identity.jwks_cache_ttl_secs),
                min_refresh: Duration::from_secs(identity.jwks_min_refresh_secs),
            },
            (_, Some(secret)) => KeySource::Secret(secret.clone()),
            (None, None) => bail!("no token verification method configured"),
        };

        Ok(VerifierConfig {
            issuer: identity.issuer(),
            audience: identity.audience.clone(),
            leeway_secs: identity.leeway_secs,
            keys,
        })
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
