use std::time::Duration;

use anyhow::Context;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info};

use super::claims::Claims;
use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid key material: {0}")]
    Key(String),
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims(e.to_string()),
            _ => TokenError::Malformed,
        }
    }
}

/// Converts the configured lifetime to a `Duration`, rejecting zero, negative
/// and overflowing values.
fn access_ttl_from_minutes(minutes: i64) -> anyhow::Result<Duration> {
    let minutes = u64::try_from(minutes)
        .ok()
        .filter(|m| *m > 0)
        .context("JWT_TTL_MINUTES must be positive")?;
    let secs = minutes
        .checked_mul(60)
        .filter(|s| i64::try_from(*s).is_ok())
        .context("JWT_TTL_MINUTES is too large")?;
    Ok(Duration::from_secs(secs))
}

/// RS256 key pair plus the claim settings used to issue access tokens.
///
/// Built once at startup and shared read-only through the application state.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
}

impl JwtKeys {
    pub fn from_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        access_ttl: Duration,
    ) -> Result<Self, TokenError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| TokenError::Key(format!("private key: {e}")))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| TokenError::Key(format!("public key: {e}")))?;
        Ok(Self {
            encoding,
            decoding,
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl,
        })
    }

    /// Reads both PEM files named in the config. Any failure here is fatal at startup.
    pub fn load(cfg: &JwtConfig) -> anyhow::Result<Self> {
        let private_pem = std::fs::read(&cfg.private_key_path)
            .with_context(|| format!("read private key {}", cfg.private_key_path))?;
        let public_pem = std::fs::read(&cfg.public_key_path)
            .with_context(|| format!("read public key {}", cfg.public_key_path))?;
        let access_ttl = access_ttl_from_minutes(cfg.ttl_minutes)?;
        let keys = Self::from_pem(
            &private_pem,
            &public_pem,
            cfg.issuer.clone(),
            cfg.audience.clone(),
            access_ttl,
        )?;
        info!(issuer = %keys.issuer, ttl_minutes = cfg.ttl_minutes, "jwt keys loaded");
        Ok(keys)
    }

    pub fn sign_access(&self, user_id: i64) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let ttl = i64::try_from(self.access_ttl.as_secs())
            .map_err(|_| TokenError::LifetimeOutOfRange)?;
        let exp = now
            .checked_add(TimeDuration::seconds(ttl))
            .ok_or(TokenError::LifetimeOutOfRange)?;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        let token = encode(&Header::new(Algorithm::RS256), claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id = claims.sub, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
