//! Cookie-backed staff sessions.
//!
//! A session is an HS256-signed claims token carried in an HttpOnly cookie.
//! Login issues the cookie, logout replaces it with an expired one; handlers
//! receive the decoded claims through the `SessionUser` extractor in
//! `api::middleware`.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "vida_en_mano_session";

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username of the logged-in staff member.
    pub sub: String,
    /// Role stored for UI purposes.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens and builds their cookies.
#[derive(Clone)]
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::days(config.ttl_days),
            cookie_secure: config.cookie_secure,
        }
    }

    /// Issue a signed token for a freshly authenticated user.
    pub fn issue(&self, username: &str, role: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_owned(),
            role: role.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(ApiError::Session)
    }

    /// Verify a token from the session cookie. Any decoding failure,
    /// including expiry, reads as "not authenticated".
    pub fn verify(&self, token: &str) -> Result<SessionClaims, ApiError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized)
    }

    /// Cookie carrying a newly issued session token.
    pub fn login_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(CookieDuration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    /// Expired cookie that removes the session from the browser.
    pub fn logout_cookie() -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::ZERO)
            .finish()
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::Validation("password could not be hashed".into()))
}

/// Verify a password against a stored hash. Malformed stored hashes deny
/// authentication rather than erroring out.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if password.is_empty() || stored_hash.is_empty() {
        return false;
    }
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(&SessionConfig {
            secret: "test-secret-key-that-is-long-enough".into(),
            ttl_days: 7,
            cookie_secure: false,
        })
    }

    #[test]
    fn issued_token_round_trips() {
        let sessions = manager();
        let token = sessions.issue("enfermero1", "nurse").unwrap();
        let claims = sessions.verify(&token).unwrap();
        assert_eq!(claims.sub, "enfermero1");
        assert_eq!(claims.role, "nurse");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let sessions = manager();
        assert!(matches!(
            sessions.verify("not-a-token"),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let sessions = manager();
        let other = SessionManager::new(&SessionConfig {
            secret: "a-completely-different-secret-key".into(),
            ttl_days: 7,
            cookie_secure: false,
        });
        let token = other.issue("admin", "admin").unwrap();
        assert!(sessions.verify(&token).is_err());
    }

    #[test]
    fn password_hash_round_trips() {
        let hash = hash_password("123456").unwrap();
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
    }

    #[test]
    fn malformed_stored_hash_denies_login() {
        assert!(!verify_password("123456", "not-an-argon2-hash"));
        assert!(!verify_password("123456", ""));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = SessionManager::logout_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.value(), "");
    }
}
