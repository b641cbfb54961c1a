use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod password;

/// Roles a user can hold. Stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: impl Into<String>, role: Role, ttl_secs: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: email.into(),
            role: role.as_str().to_string(),
            exp: iat + ttl_secs,
            iat,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

/// Access and refresh token pair handed out at login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Issues access and refresh tokens and validates access tokens. Both kinds share the
/// claim shape and lifetime but are signed with separate secrets.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    ttl_secs: i64,
    validation: Validation,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact, no grace window
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access: KeyPair::from_secret(&security.jwt_secret),
            refresh: KeyPair::from_secret(&security.jwt_refresh_secret),
            ttl_secs: security.token_ttl_secs,
            validation,
        }
    }

    pub fn issue_access(&self, email: &str, role: Role) -> Result<String, JwtError> {
        self.sign(&self.access, &Claims::new(email, role, self.ttl_secs))
    }

    pub fn issue_refresh(&self, email: &str, role: Role) -> Result<String, JwtError> {
        self.sign(&self.refresh, &Claims::new(email, role, self.ttl_secs))
    }

    pub fn issue_pair(&self, email: &str, role: Role) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            token: self.issue_access(email, role)?,
            refresh_token: self.issue_refresh(email, role)?,
        })
    }

    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(&self.access, token)
    }

    fn sign(&self, keys: &KeyPair, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    fn verify(&self, keys: &KeyPair, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::Invalid(e.to_string()))
    }
}
