// Signed identity tokens: HS256 JWTs with a fixed one-hour lifetime

use crate::auth::secret::SigningSecret;
use crate::core::errors::AuthError;
use crate::core::models::Identity;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime in seconds (issued-at + 1 hour)
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    id: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed, time-limited identity tokens
///
/// The signing key is taken from the `SigningSecret` passed at construction
/// and is read-only afterwards.
///
/// Tokens are HS256 JWTs with header `{"typ":"JWT","alg":"HS256"}` and
/// claims `{"id","iat","exp"}`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service keyed with the process signing secret
    pub fn new(secret: &SigningSecret) -> Self {
        // Expiry is checked against the caller's clock in `verify_at`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_bytes()),
            decoding_key: DecodingKey::from_secret(secret.expose_bytes()),
            validation,
        }
    }

    /// Issue a token for `identity`, valid for one hour from now
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            id: identity.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    ///
    /// The signature is checked before the claims are trusted; expiry is
    /// inclusive (`now >= exp` is expired). Any header algorithm other than
    /// HS256 is malformed.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            },
        )?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        let id = Uuid::parse_str(&claims.id).map_err(|_| AuthError::Malformed)?;
        Ok(Identity::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SigningSecret::new(secret).unwrap())
    }

    #[test]
    fn test_issue_then_verify_returns_identity() {
        let tokens = service("test-secret");
        let identity = Identity::new(Uuid::new_v4());

        let token = tokens.issue(&identity).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), identity);
    }

    #[test]
    fn test_token_has_three_segments() {
        let tokens = service("test-secret");
        let token = tokens.issue(&Identity::new(Uuid::new_v4())).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let tokens = service("test-secret");
        let identity = Identity::new(Uuid::new_v4());
        let issued_at = Utc::now();
        let token = tokens.issue_at(&identity, issued_at).unwrap();

        let just_before = issued_at + Duration::seconds(TOKEN_TTL_SECS - 1);
        assert_eq!(tokens.verify_at(&token, just_before).unwrap(), identity);

        let at_expiry = issued_at + Duration::seconds(TOKEN_TTL_SECS);
        assert_eq!(tokens.verify_at(&token, at_expiry), Err(AuthError::Expired));

        let long_after = issued_at + Duration::days(2);
        assert_eq!(tokens.verify_at(&token, long_after), Err(AuthError::Expired));
    }

    #[test]
    fn test_other_secret_fails_signature() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");
        let token = issuer.issue(&Identity::new(Uuid::new_v4())).unwrap();

        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_tampered_claims_fail_signature() {
        let tokens = service("test-secret");
        let token = tokens.issue(&Identity::new(Uuid::new_v4())).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&serde_json::json!({
                "id": Uuid::new_v4().to_string(),
                "iat": 0,
                "exp": i64::MAX,
            }))
            .unwrap(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert_eq!(tokens.verify(&forged), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let tokens = service("test-secret");
        for bad in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            assert_eq!(tokens.verify(bad), Err(AuthError::Malformed), "token: {:?}", bad);
        }
    }

    #[test]
    fn test_rejects_unsigned_algorithm() {
        let tokens = service("test-secret");
        let token = tokens.issue(&Identity::new(Uuid::new_v4())).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let none_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{}.{}.", none_header, parts[1]);

        assert_eq!(tokens.verify(&forged), Err(AuthError::Malformed));
    }

    #[test]
    fn test_signed_claims_with_bad_identity_are_malformed() {
        let tokens = service("test-secret");
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            id: "not-a-uuid".to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding_key).unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthError::Malformed));
    }

    #[test]
    fn test_other_hmac_algorithm_is_malformed() {
        let tokens = service("test-secret");
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            id: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let token = encode(&Header::new(Algorithm::HS384), &claims, &tokens.encoding_key).unwrap();

        assert_eq!(tokens.verify(&token), Err(AuthError::Malformed));
    }

    #[test]
    fn test_header_declares_hs256_jwt() {
        let tokens = service("test-secret");
        let token = tokens.issue(&Identity::new(Uuid::new_v4())).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }
}
