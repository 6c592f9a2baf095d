use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use vidshelf_model::UserId;

/// Access token claims. `sub` is the numeric user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: i64,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret must not be empty")]
    EmptySecret,
    #[error("token lifetime is out of range")]
    InvalidLifetime,
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
}

/// Issues and validates HS256 access tokens signed with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| TokenError::InvalidLifetime)?;
        if ttl <= chrono::Duration::zero() {
            return Err(TokenError::InvalidLifetime);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.get(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the caller's id.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(UserId(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_validate_to_the_same_user() {
        let issuer = TokenIssuer::new("secret", Duration::from_secs(3600)).unwrap();
        let token = issuer.issue(UserId(42)).unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), UserId(42));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let issuer = TokenIssuer::new("secret", Duration::from_secs(3600)).unwrap();
        let other = TokenIssuer::new("other-secret", Duration::from_secs(3600)).unwrap();
        let token = other.issue(UserId(1)).unwrap();
        assert!(matches!(issuer.validate(&token), Err(TokenError::Rejected(_))));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issuer = TokenIssuer::new("secret", Duration::from_secs(3600)).unwrap();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 3600,
            iat: now - 7200,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(issuer.validate(&token).is_err());
    }

    #[test]
    fn rejects_empty_secret_and_zero_ttl() {
        assert!(matches!(
            TokenIssuer::new("", Duration::from_secs(60)),
            Err(TokenError::EmptySecret)
        ));
        assert!(matches!(
            TokenIssuer::new("secret", Duration::ZERO),
            Err(TokenError::InvalidLifetime)
        ));
        let issuer = TokenIssuer::new("secret", Duration::from_secs(60)).unwrap();
        assert!(issuer.validate("garbage").is_err());
    }
}
