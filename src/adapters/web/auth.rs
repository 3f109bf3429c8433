//! Password hashing and bearer-token authentication.

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::error::FauxtickError;
use crate::domain::user::User;
use crate::ports::config_port::ConfigPort;
use crate::ports::user_store::UserStore;

use super::{ApiError, AppState};

const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 60 * 24 * 8;
const DEFAULT_CONFIRMATION_TOKEN_HOURS: i64 = 24;
const DEFAULT_RESET_TOKEN_HOURS: i64 = 24;

/// Minimum decoded secret length. Anything shorter is a config error.
const MIN_SECRET_BYTES: usize = 32;

pub fn hash_password(password: &str) -> Result<String, FauxtickError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FauxtickError::PasswordHash {
            reason: e.to_string(),
        })
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, FauxtickError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| FauxtickError::PasswordHash {
        reason: e.to_string(),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// Issues and verifies signed, time-limited tokens (HS256). One signer
/// covers access, confirmation and reset tokens; they differ only in
/// subject and lifetime.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    confirmation_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenSigner {
    pub fn new(
        secret: &[u8],
        access_ttl: Duration,
        confirmation_ttl: Duration,
        reset_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            confirmation_ttl,
            reset_ttl,
        }
    }

    /// Build a signer from the `[auth]` config section. The secret key is a
    /// hex string decoding to at least 32 bytes.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FauxtickError> {
        let secret_hex =
            config
                .get_string("auth", "secret_key")
                .ok_or_else(|| FauxtickError::ConfigMissing {
                    section: "auth".into(),
                    key: "secret_key".into(),
                })?;
        let secret =
            hex::decode(secret_hex.trim()).map_err(|e| FauxtickError::ConfigInvalid {
                section: "auth".into(),
                key: "secret_key".into(),
                reason: e.to_string(),
            })?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(FauxtickError::ConfigInvalid {
                section: "auth".into(),
                key: "secret_key".into(),
                reason: format!("secret must decode to at least {MIN_SECRET_BYTES} bytes"),
            });
        }

        let access_minutes =
            config.get_int("auth", "access_token_minutes", DEFAULT_ACCESS_TOKEN_MINUTES);
        let confirmation_hours = config.get_int(
            "auth",
            "confirmation_token_hours",
            DEFAULT_CONFIRMATION_TOKEN_HOURS,
        );
        let reset_hours = config.get_int("auth", "reset_token_hours", DEFAULT_RESET_TOKEN_HOURS);

        Ok(Self::new(
            &secret,
            Duration::minutes(access_minutes),
            Duration::hours(confirmation_hours),
            Duration::hours(reset_hours),
        ))
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, FauxtickError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            FauxtickError::Database {
                reason: format!("failed to sign token: {e}"),
            }
        })
    }

    /// Verify a token and return its subject. Every failure mode (bad
    /// signature, expiry, malformed payload) collapses to InvalidToken.
    pub fn verify(&self, token: &str) -> Result<String, FauxtickError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|_| FauxtickError::InvalidToken)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn confirmation_ttl(&self) -> Duration {
        self.confirmation_ttl
    }

    pub fn reset_ttl(&self) -> Duration {
        self.reset_ttl
    }
}

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. User-defined ticker lookups are scoped to this identity.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::from(FauxtickError::InvalidToken))?;

        let mut split = header.splitn(2, ' ');
        let (Some(scheme), Some(token)) = (split.next(), split.next()) else {
            return Err(FauxtickError::InvalidToken.into());
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(FauxtickError::InvalidToken.into());
        }

        let subject = state.tokens.verify(token.trim())?;
        let user_id =
            Uuid::parse_str(&subject).map_err(|_| ApiError::from(FauxtickError::InvalidToken))?;

        let user = state
            .user_store
            .get_by_id(user_id)?
            .ok_or_else(|| ApiError::not_found("user not found"))?;

        Ok(CurrentUser(user))
    }
}

pub fn require_superuser(user: &User) -> Result<(), FauxtickError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(FauxtickError::Forbidden)
    }
}
