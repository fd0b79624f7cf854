//! Admin authentication
//!
//! Provides:
//! - Shared-token login (compared by SHA-256 digest)
//! - Signed, expiring session tokens carried in an HTTP-only cookie
//! - The [`AdminSession`] extractor gating every admin route

use crate::config::AuthConfig;
use crate::errors::{AppError, Result};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Subject claim carried by every admin session
pub const ADMIN_SUBJECT: &str = "admin";

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject, always [`ADMIN_SUBJECT`]
    pub sub: String,

    /// Random session id
    pub sid: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Signs and verifies session tokens
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl SessionManager {
    /// Create a new session manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Mint a new session token
    pub fn issue(&self) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = SessionClaims {
            sub: ADMIN_SUBJECT.to_string(),
            sid: generate_session_id(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to sign session: {}", e)
            })
    }

    /// Validate and decode a session token
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::ExpiredToken
                    }
                    _ => AppError::InvalidToken,
                }
            })?;

        if claims.sub != ADMIN_SUBJECT {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Admin gate: holds the token digest and the session signer
pub struct AdminAuth {
    token_hash: Option<String>,
    sessions: SessionManager,
    cookie_name: String,
    ttl_secs: u64,
    secure: bool,
}

impl AdminAuth {
    pub fn new(config: &AuthConfig) -> Self {
        let admin_token = config
            .admin_token
            .as_deref()
            .filter(|t| !t.is_empty());

        // A secret is always needed to build the signer, even when login is
        // disabled; in that case no token is ever issued.
        let secret = match (&config.session_secret, admin_token) {
            (Some(secret), _) if !secret.is_empty() => secret.clone(),
            (_, Some(token)) => hash_token(&format!("namehub-session:{}", token)),
            _ => hex::encode(rand::random::<[u8; 32]>()),
        };

        Self {
            token_hash: admin_token.map(hash_token),
            sessions: SessionManager::new(&secret, config.session_ttl_secs),
            cookie_name: config.cookie_name.clone(),
            ttl_secs: config.session_ttl_secs,
            secure: config.secure_cookie,
        }
    }

    /// Compare a submitted token and, on success, return the `Set-Cookie`
    /// header value for a fresh session.
    pub fn login(&self, token: &str) -> Result<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("token", "Token is required"));
        }

        let expected = self.token_hash.as_deref().ok_or_else(|| AppError::Configuration {
            message: "ADMIN_TOKEN is not configured".to_string(),
        })?;

        if !validate_token(token, expected) {
            return Err(AppError::Unauthorized {
                message: "Invalid token".to_string(),
            });
        }

        let session = self.sessions.issue()?;
        Ok(self.session_cookie(&session, self.ttl_secs))
    }

    /// `Set-Cookie` value that clears the session
    pub fn logout_cookie(&self) -> String {
        self.session_cookie("", 0)
    }

    /// Verify the session cookie carried by a request
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<SessionClaims> {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| extract_cookie(v, &self.cookie_name))
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing session cookie".to_string(),
            })?;

        self.sessions.verify(token)
    }

    fn session_cookie(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Hash a token for comparison
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate a token against a stored hash
pub fn validate_token(token: &str, stored_hash: &str) -> bool {
    hash_token(token) == stored_hash
}

/// Generate a random session id
pub fn generate_session_id() -> String {
    let random_bytes: [u8; 16] = rand::random();
    hex::encode(random_bytes)
}

/// Extract a named cookie from a `Cookie` header value
pub fn extract_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Proof that the request carries a valid admin session
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub session_id: String,
}

impl<S> FromRequestParts<S> for AdminSession
where
    Arc<AdminAuth>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let auth = Arc::<AdminAuth>::from_ref(state);
        let claims = auth.verify_headers(&parts.headers)?;

        Ok(AdminSession {
            session_id: claims.sid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth_with_token(token: Option<&str>) -> AdminAuth {
        AdminAuth::new(&AuthConfig {
            admin_token: token.map(String::from),
            ..AuthConfig::default()
        })
    }

    fn cookie_value(set_cookie: &str) -> &str {
        set_cookie.split(';').next().unwrap()
    }

    #[test]
    fn test_hash_token() {
        let hash = hash_token("s3cret");
        assert!(validate_token("s3cret", &hash));
        assert!(!validate_token("wrong", &hash));
    }

    #[test]
    fn test_extract_cookie() {
        let header = "theme=dark; admin_session=abc.def; other=1";
        assert_eq!(extract_cookie(header, "admin_session"), Some("abc.def"));
        assert_eq!(extract_cookie(header, "missing"), None);
        assert_eq!(extract_cookie("admin_session=", "admin_session"), None);
    }

    #[test]
    fn test_session_roundtrip() {
        let manager = SessionManager::new("test_secret", 3600);
        let token = manager.issue().unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.sid.len(), 32);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_session_signed_with_other_secret_is_rejected() {
        let token = SessionManager::new("one", 3600).issue().unwrap();
        let result = SessionManager::new("two", 3600).verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_login_sets_http_only_cookie() {
        let auth = auth_with_token(Some("s3cret"));
        let cookie = auth.login("s3cret").unwrap();

        assert!(cookie.starts_with("admin_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_login_failures() {
        let auth = auth_with_token(Some("s3cret"));
        assert!(matches!(auth.login("   "), Err(AppError::Validation { .. })));
        assert!(matches!(auth.login("nope"), Err(AppError::Unauthorized { .. })));

        let unconfigured = auth_with_token(None);
        assert!(matches!(
            unconfigured.login("anything"),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_verify_headers() {
        let auth = auth_with_token(Some("s3cret"));
        let cookie = auth.login("s3cret").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_value(&cookie)).unwrap());
        assert!(auth.verify_headers(&headers).is_ok());

        let mut forged = HeaderMap::new();
        forged.insert(header::COOKIE, HeaderValue::from_static("admin_session=1234abcd"));
        assert!(matches!(auth.verify_headers(&forged), Err(AppError::InvalidToken)));

        assert!(matches!(
            auth.verify_headers(&HeaderMap::new()),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_extractor_carries_session_id() {
        let auth = Arc::new(auth_with_token(Some("s3cret")));
        let cookie = auth.login("s3cret").unwrap();
        let token = cookie_value(&cookie).trim_start_matches("admin_session=");
        let expected = auth.sessions.verify(token).unwrap().sid;

        let (mut parts, _) = axum::http::Request::builder()
            .header(header::COOKIE, cookie_value(&cookie))
            .body(())
            .unwrap()
            .into_parts();

        let session = AdminSession::from_request_parts(&mut parts, &auth).await.unwrap();
        assert_eq!(session.session_id, expected);
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let auth = auth_with_token(Some("s3cret"));
        assert!(auth.logout_cookie().starts_with("admin_session=;"));
        assert!(auth.logout_cookie().contains("Max-Age=0"));
    }
}
