use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::error::AppError;

/// Claims embedded in a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct BearerClaims {
    /// The user's id.
    sub: String,
    /// The user's display handle.
    #[serde(rename = "userName")]
    user_name: String,
    /// Expiration timestamp (Unix seconds).
    exp: i64,
}

/// Default token lifetime when no explicit expiry is given.
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Sign a bearer token for the given identity.
///
/// # Arguments
/// * `secret` — The HMAC secret shared with the token-issuing front door.
/// * `user_id` / `user_name` — The identity embedded in the claims.
/// * `expires_at` — Optional expiration time; defaults to 24 hours out.
pub fn issue_token(
    secret: &str,
    user_id: &str,
    user_name: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<String, AppError> {
    let exp = expires_at
        .unwrap_or_else(|| Utc::now() + Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS))
        .timestamp();

    let claims = BearerClaims {
        sub: user_id.to_string(),
        user_name: user_name.to_string(),
        exp,
    };

    let header = Header::default(); // HS256
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| AppError::Internal(format!("Failed to sign bearer token: {e}")))
}

/// Verify a bearer token and extract the caller identity.
pub fn verify_token(secret: &str, token: &str) -> Result<AuthenticatedUser, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default(); // HS256, exp checked

    let data = decode::<BearerClaims>(token, &key, &validation)
        .map_err(|e| AppError::Auth(format!("Invalid bearer token: {e}")))?;

    Ok(AuthenticatedUser {
        user_id: data.claims.sub,
        user_name: data.claims.user_name,
    })
}
