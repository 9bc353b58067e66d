use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's username.
    pub sub: String,
    /// The user's id.
    pub id: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and checks access tokens.
///
/// Built once from [`Config`] and shared with the app as `web::Data`, so the signing key
/// never has to be looked up from the environment at request time.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    grace: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration, grace: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
            grace,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.algorithm,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::minutes(config.refresh_grace_minutes),
        )
    }

    /// Issues a token for `username`/`user_id` expiring `ttl` from now.
    pub fn issue(&self, username: &str, user_id: i32) -> Result<String, AppError> {
        self.issue_at(username, user_id, Utc::now().timestamp())
    }

    /// Issues a token as if it were `issued_at` (seconds since epoch).
    pub fn issue_at(
        &self,
        username: &str,
        user_id: i32,
        issued_at: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            exp: issued_at + self.ttl.num_seconds(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Strict verification: the signature must check out and the token must not be expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AppError> {
        let claims = self.decode_signed(token)?;
        if claims.exp < now {
            return Err(AppError::Unauthorized("Token has expired".into()));
        }
        Ok(claims)
    }

    /// Checks the signature and claim shape only; expiry is left to the caller.
    pub fn decode_signed(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        if claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Invalid token: missing subject".into()));
        }
        Ok(claims)
    }

    /// Decides whether an already signature-checked token may be refreshed at `now`.
    ///
    /// Only expired tokens qualify, and only while `now` is within the grace window
    /// that starts at the token's expiry.
    pub fn check_refresh_window(&self, claims: &Claims, now: i64) -> Result<(), AppError> {
        if claims.exp >= now {
            return Err(AppError::BadRequest("Token has not expired yet".into()));
        }
        if now - claims.exp > self.grace.num_seconds() {
            return Err(AppError::Unauthorized("Token expired for too long".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: i64 = 20 * 60;
    const GRACE: i64 = 30 * 60;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(
            secret,
            Algorithm::HS256,
            Duration::minutes(20),
            Duration::minutes(30),
        )
    }

    #[test]
    fn test_token_generation_and_verification() {
        let issuer = issuer("test_secret_for_gen_verify");
        let token = issuer.issue("alice", 1).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.id, 1);
    }

    #[test]
    fn test_token_is_valid_until_expiry_and_not_after() {
        let issuer = issuer("test_secret_for_expiration");
        let issued_at = 1_700_000_000;
        let token = issuer.issue_at("alice", 2, issued_at).unwrap();
        let exp = issued_at + TTL;

        assert!(issuer.verify_at(&token, issued_at).is_ok());
        assert!(issuer.verify_at(&token, exp).is_ok());

        match issuer.verify_at(&token, exp + 1) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            other => panic!("Token should be rejected after expiry, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token_fails_strict_verification() {
        let issuer = issuer("test_secret_for_expiration");
        let token = issuer
            .issue_at("alice", 2, Utc::now().timestamp() - TTL - 120)
            .unwrap();
        assert!(matches!(issuer.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_invalid_token_signature() {
        let signed_elsewhere = issuer("some_other_secret").issue("alice", 1).unwrap();

        match issuer("a_completely_different_secret").verify(&signed_elsewhere) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            other => panic!("Token should have been rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_token_missing_id_claim_is_rejected() {
        #[derive(Serialize)]
        struct SubjectOnly {
            sub: String,
            exp: i64,
        }

        let token = encode(
            &Header::default(),
            &SubjectOnly {
                sub: "alice".into(),
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            issuer("secret").verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(matches!(
            issuer("secret").verify("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_refresh_window() {
        let issuer = issuer("secret");
        let claims = Claims {
            sub: "alice".into(),
            id: 1,
            exp: 1_700_000_000,
        };

        // Not yet expired.
        assert!(matches!(
            issuer.check_refresh_window(&claims, claims.exp - 60),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            issuer.check_refresh_window(&claims, claims.exp),
            Err(AppError::BadRequest(_))
        ));

        // Inside the grace window, including its last second.
        assert!(issuer.check_refresh_window(&claims, claims.exp + 1).is_ok());
        assert!(issuer.check_refresh_window(&claims, claims.exp + GRACE).is_ok());

        match issuer.check_refresh_window(&claims, claims.exp + GRACE + 1) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expired for too long"),
            other => panic!("Expected rejection beyond the grace window, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_signed_ignores_expiry() {
        let issuer = issuer("secret");
        let token = issuer.issue_at("alice", 3, 1_000).unwrap();
        let claims = issuer.decode_signed(&token).unwrap();
        assert_eq!(claims.exp, 1_000 + TTL);
    }
}
