pub mod password;

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::{Identity, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(identity: &Identity, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: identity.user_id,
            email: identity.email.clone(),
            role: identity.role,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.email.clone(), self.role)
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Issues and verifies session credentials.
///
/// The credential is a signed JWT, self-contained: nothing is stored server
/// side, so revocation means telling the browser to drop the cookie.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
    cookie_name: String,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(secret: &str, expiry_hours: u64, cookie_name: impl Into<String>, secure_cookies: bool) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
            cookie_name: cookie_name.into(),
            secure_cookies,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(
            &security.jwt_secret,
            security.jwt_expiry_hours,
            security.session_cookie_name.clone(),
            security.secure_cookies,
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a credential for the given identity
    pub fn create_credential(&self, identity: &Identity) -> Result<String, JwtError> {
        let claims = Claims::new(identity, self.expiry_hours);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Validate a credential and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    /// Resolve the request credential to claims.
    ///
    /// Missing, malformed, expired or forged credentials all resolve to `None`.
    pub fn resolve_credential(&self, headers: &HeaderMap) -> Option<Claims> {
        let token = self
            .token_from_cookie(headers)
            .or_else(|| token_from_bearer(headers))?;

        match self.verify(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!("Rejected session credential: {}", e);
                None
            }
        }
    }

    /// `Set-Cookie` value that installs a freshly issued credential
    pub fn session_cookie(&self, token: &str) -> String {
        self.cookie(token.to_string(), CookieDuration::hours(self.expiry_hours as i64))
    }

    /// `Set-Cookie` value that revokes the credential in the browser
    pub fn revoke_cookie(&self) -> String {
        self.cookie(String::new(), CookieDuration::ZERO)
    }

    fn cookie(&self, value: String, max_age: CookieDuration) -> String {
        Cookie::build((self.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .build()
            .to_string()
    }

    fn token_from_cookie(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value))
            .filter_map(Result::ok)
            .filter(|cookie| cookie.name() == self.cookie_name)
            .map(|cookie| cookie.value_trimmed().to_string())
            .find(|value| !value.is_empty())
    }
}

fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn manager() -> SessionManager {
        SessionManager::new("test-secret", 1, "session", false).unwrap()
    }

    fn member() -> Identity {
        Identity::new(Uuid::new_v4(), "m1@example.com", Role::Member)
    }

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            SessionManager::new("", 1, "session", false),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[test]
    fn credential_resolves_from_cookie() {
        let sessions = manager();
        let identity = member();
        let token = sessions.create_credential(&identity).unwrap();

        let headers = cookie_headers(&format!("theme=dark; session={}", token));
        let claims = sessions.resolve_credential(&headers).unwrap();
        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn credential_resolves_from_bearer_header() {
        let sessions = manager();
        let identity = member();
        let token = sessions.create_credential(&identity).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(sessions.resolve_credential(&headers).unwrap().identity(), identity);
    }

    #[test]
    fn missing_credential_is_anonymous() {
        assert!(manager().resolve_credential(&HeaderMap::new()).is_none());
        assert!(manager().resolve_credential(&cookie_headers("session=")).is_none());
    }

    #[test]
    fn credential_signed_with_other_secret_is_rejected() {
        let other = SessionManager::new("other-secret", 1, "session", false).unwrap();
        let token = other.create_credential(&member()).unwrap();

        assert!(manager().resolve_credential(&cookie_headers(&format!("session={}", token))).is_none());
    }

    #[test]
    fn expired_credential_is_rejected() {
        let identity = member();
        let past = Utc::now() - Duration::hours(3);
        let claims = Claims {
            sub: identity.user_id,
            email: identity.email.clone(),
            role: identity.role,
            exp: (past + Duration::minutes(5)).timestamp(),
            iat: past.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(manager().verify(&token).is_err());
    }

    #[test]
    fn unknown_role_in_credential_is_rejected() {
        let now = Utc::now();
        let claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "email": "x@example.com",
            "role": "ADMIN",
            "exp": (now + Duration::hours(1)).timestamp(),
            "iat": now.timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(manager().verify(&token).is_err());
    }

    #[test]
    fn quoted_cookie_value_resolves() {
        let sessions = manager();
        let identity = member();
        let token = sessions.create_credential(&identity).unwrap();

        let headers = cookie_headers(&format!("session=\"{}\"", token));
        assert_eq!(sessions.resolve_credential(&headers).unwrap().identity(), identity);
    }

    #[test]
    fn empty_cookie_does_not_hide_a_later_one() {
        let sessions = manager();
        let identity = member();
        let token = sessions.create_credential(&identity).unwrap();

        let headers = cookie_headers(&format!("session=; session={}", token));
        assert_eq!(sessions.resolve_credential(&headers).unwrap().identity(), identity);
    }

    #[test]
    fn session_cookie_attributes() {
        let set_cookie = manager().session_cookie("tok");
        let cookie = Cookie::parse(set_cookie.as_str()).unwrap();
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(1)));
    }

    #[test]
    fn revoke_cookie_expires_immediately() {
        let set_cookie = manager().revoke_cookie();
        let cookie = Cookie::parse(set_cookie.as_str()).unwrap();
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    #[test]
    fn secure_flag_follows_configuration() {
        let secure = SessionManager::new("s", 1, "session", true).unwrap();
        let issued = secure.session_cookie("t");
        assert_eq!(Cookie::parse(issued.as_str()).unwrap().secure(), Some(true));
        assert!(!manager().session_cookie("t").contains("Secure"));
    }
}
