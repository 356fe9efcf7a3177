use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Signed payload as it travels inside the token.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Verified token contents, in the shape the application uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// HS256 token issuer/verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    fn sign(&self, claims: &WireClaims) -> AppResult<String> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::operational("token signing failed")
        })
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let claims = WireClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            token_type: "Bearer",
            expires_in: self.ttl_seconds,
        })
    }

    /// Signature, expiry and a UUID subject are all required.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AppError::unauthorized("invalid or expired token")
            })?;
        let claims = data.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("invalid token subject"))?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| AppError::unauthorized("invalid token timestamps"))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::unauthorized("invalid token timestamps"))?;

        Ok(Claims {
            user_id,
            token_id: claims.jti,
            issued_at,
            expires_at,
        })
    }
}
