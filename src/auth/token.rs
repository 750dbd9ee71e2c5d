use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::User;

/// Why a token was rejected (or could not be minted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Bad structure, bad signature, or a subject that is not a user id.
    #[error("malformed or tampered token ({0})")]
    Malformed(String),
    #[error("token has expired")]
    Expired,
    #[error("token subject does not match the user")]
    SubjectMismatch,
    #[error("expected a {expected} token, got a {actual} token")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Discriminates short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's id.
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| TokenError::Malformed("subject is not a user id".into()))
    }
}

/// Mints and verifies stateless HS256 bearer tokens.
///
/// Keys and TTLs are fixed at construction; nothing is read from the environment
/// afterwards. Tokens are never stored, so expiry is the only way one stops
/// being valid.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Lifetime of an access token, reported to clients as `expires_in`.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        self.mint(user, TokenType::Access, Utc::now())
    }

    pub fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
        self.mint(user, TokenType::Refresh, Utc::now())
    }

    /// Checks signature and expiry, then that the token was issued to `expected`.
    pub fn verify(&self, token: &str, expected: &User) -> Result<Claims, TokenError> {
        let claims = self.decode_verified(token)?;
        if claims.user_id()? != expected.id {
            return Err(TokenError::SubjectMismatch);
        }
        Ok(claims)
    }

    /// Returns the subject of a token whose signature and expiry have been checked.
    pub fn extract_subject(&self, token: &str) -> Result<Uuid, TokenError> {
        self.decode_verified(token)?.user_id()
    }

    /// Verifies a bearer token presented to a protected route. Only access
    /// tokens are accepted there.
    pub fn authenticate_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode_verified(token)?;
        claims.user_id()?;
        if claims.token_type != TokenType::Access {
            return Err(TokenError::WrongType {
                expected: TokenType::Access,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    fn mint(
        &self,
        user: &User,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let iat = issued_at.timestamp();
        let exp = iat
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Encoding("token expiry is out of range".into()))?;
        let claims = Claims {
            sub: user.id.to_string(),
            token_type,
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn decode_verified(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })
    }
}
