use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::db::models::User;
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string.
    pub sub: String,
    pub email: String,
    /// Unique per token, so two tokens issued to the same user differ.
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
    /// Legacy subject claim some older clients still send; read as a
    /// fallback when `sub` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameid: Option<String>,
}

/// Login response payload: the signed token plus its absolute expiry
/// as epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: i64,
}

pub struct TokenIssuer;

impl TokenIssuer {
    /// Create a signed JWT for a user
    pub fn issue(config: &JwtConfig, user: &User) -> AppResult<AuthResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(config.expiration_seconds);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            nameid: None,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )?;

        Ok(AuthResponse {
            token,
            expires_at: expires_at.timestamp(),
        })
    }

    /// Decode and validate a JWT, returning the claims. Signature, expiry,
    /// issuer and audience are all checked.
    pub fn decode(config: &JwtConfig, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}
