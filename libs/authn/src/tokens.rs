use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims carried by Bloomwell identity tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token processing failed: {0}")]
    Internal(String),
}

/// Verifies bearer tokens for the auth guard.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Uuid, TokenError>;
}

/// HS256 issuer/verifier with a fixed lifetime and no refresh.
#[derive(Clone)]
pub struct JwtTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is exact, no grace period
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, now, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Internal(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl TokenVerifier for JwtTokens {
    fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode(token)?;
        Uuid::parse_str(&claims.sub).map_err(|e| TokenError::Invalid(format!("subject: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> JwtTokens {
        JwtTokens::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issued_token_decodes_to_user_id() {
        let id = Uuid::new_v4();
        let t = tokens();
        let token = t.issue(id).unwrap();
        assert_eq!(t.verify(&token).unwrap(), id);
    }

    #[test]
    fn claims_span_the_configured_lifetime() {
        let id = Uuid::new_v4();
        let t = tokens();
        let now = Utc::now();
        let claims = t.decode(&t.issue_at(id, now).unwrap()).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let t = tokens();
        let token = t
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(25))
            .unwrap();
        assert_eq!(t.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = JwtTokens::new(b"other-secret", Duration::hours(24));
        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(tokens().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_and_tampered_tokens_are_invalid() {
        let t = tokens();
        assert!(matches!(t.verify("not-a-jwt"), Err(TokenError::Invalid(_))));

        let mut token = t.issue(Uuid::new_v4()).unwrap();
        token.push('x');
        assert!(matches!(t.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn non_uuid_subject_is_invalid() {
        let t = tokens();
        let claims = Claims {
            sub: "42".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(t.verify(&token), Err(TokenError::Invalid(_))));
    }
}
