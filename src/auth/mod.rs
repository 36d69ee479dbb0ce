//! Accounts, password hashing and bearer-token sessions
//!
//! All auth state lives in [`AuthService`], owned by `AppState` and handed to
//! handlers explicitly. Token validity is decided by
//! [`token::validate_token`], a pure function of the token, the current time
//! and the revoked token ids.

pub mod token;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::Record;
use crate::store::RecordStore;
pub use token::{encode_token, validate_token, Claims};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("signing secret rejected")]
    InvalidSecret,
    #[error("token lifetime overflows the expiry timestamp")]
    TokenLifetime,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    /// Argon2id PHC string (embeds its own salt and parameters)
    password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// User as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
    pub user: UserProfile,
}

// ============================================================================
// Password hashing
// ============================================================================

/// Argon2id hash of `password` in PHC string form, salted with a fresh UUID
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Unparsable hashes never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AuthError::InvalidInput(format!("invalid email address: {}", raw.trim())))
    }
}

// ============================================================================
// Service
// ============================================================================

pub struct AuthService {
    secret: Vec<u8>,
    token_ttl_secs: i64,
    // jti -> exp; entries drop out once the token would have expired anyway
    revoked: RwLock<FxHashMap<String, i64>>,
    // Serializes the email-uniqueness check with the insert
    registration: Mutex<()>,
}

impl AuthService {
    pub fn new(secret: impl Into<Vec<u8>>, token_ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_secs,
            revoked: RwLock::new(FxHashMap::default()),
            registration: Mutex::new(()),
        }
    }

    pub async fn register(
        &self,
        users: &RecordStore<User>,
        req: RegisterRequest,
    ) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&req.email)?;
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if req.name.trim().is_empty() {
            return Err(AuthError::InvalidInput("name is required".to_string()));
        }

        let _guard = self.registration.lock().await;
        if users.find(|u| u.email == email).await.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name: req.name.trim().to_string(),
            phone: req.phone,
            password_hash: hash_password(&req.password)?,
            created_at: Utc::now(),
        };
        users.insert(user.clone()).await;
        tracing::info!("Registered user {}", user.id);

        self.issue(&user, Utc::now().timestamp())
    }

    pub async fn login(
        &self,
        users: &RecordStore<User>,
        req: LoginRequest,
    ) -> Result<AuthResponse, AuthError> {
        let email = req.email.trim().to_lowercase();
        let user = users
            .find(|u| u.email == email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&req.password, &user.password_hash) {
            tracing::debug!("Failed login for {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(&user, Utc::now().timestamp())
    }

    fn issue(&self, user: &User, now: i64) -> Result<AuthResponse, AuthError> {
        let exp = now
            .checked_add(self.token_ttl_secs)
            .ok_or(AuthError::TokenLifetime)?;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        Ok(AuthResponse {
            access_token: encode_token(&claims, &self.secret)?,
            token_type: "bearer",
            expires_at: claims.exp,
            user: UserProfile::from(user),
        })
    }

    /// Validate a bearer token at `now` against the current revocations
    pub async fn authenticate(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let revoked = self.revoked.read().await;
        validate_token(token, &self.secret, now, &revoked)
    }

    /// Revoke the session behind `claims`, dropping entries that have
    /// expired by `now`
    pub async fn revoke(&self, claims: &Claims, now: i64) {
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        if claims.exp > now {
            revoked.insert(claims.jti.clone(), claims.exp);
        }
    }

    pub async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "correct horse".to_string(),
            name: "Forest Owner".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not a phc string"));

        // Fresh salt per hash
        assert_ne!(hash_password("hunter22").unwrap(), hash);
    }

    #[test]
    fn test_email_validation() {
        assert_eq!(normalize_email(" Grower@Example.COM ").unwrap(), "grower@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@localhost").is_err());
    }

    #[tokio::test]
    async fn test_register_login_logout() {
        let auth = AuthService::new("secret", 3600);
        let users = RecordStore::new();

        let registered = auth.register(&users, register_req("a@example.com")).await.unwrap();
        assert_eq!(registered.token_type, "bearer");
        assert_eq!(registered.user.email, "a@example.com");

        let login = auth
            .login(&users, LoginRequest { email: "A@example.com".to_string(), password: "correct horse".to_string() })
            .await
            .unwrap();
        let now = Utc::now().timestamp();
        let claims = auth.authenticate(&login.access_token, now).await.unwrap();
        assert_eq!(claims.sub, registered.user.id);

        auth.revoke(&claims, now).await;
        assert_eq!(auth.authenticate(&login.access_token, now).await, Err(AuthError::Revoked));
        // Revoking one session leaves the other valid
        assert!(auth.authenticate(&registered.access_token, now).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let auth = AuthService::new("secret", 3600);
        let users = RecordStore::new();
        auth.register(&users, register_req("a@example.com")).await.unwrap();

        assert_eq!(
            auth.register(&users, register_req("A@EXAMPLE.com")).await.err(),
            Some(AuthError::EmailTaken)
        );

        let mut short = register_req("b@example.com");
        short.password = "short".to_string();
        assert!(matches!(auth.register(&users, short).await, Err(AuthError::InvalidInput(_))));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let auth = AuthService::new("secret", 3600);
        let users = RecordStore::new();
        auth.register(&users, register_req("a@example.com")).await.unwrap();

        let wrong = LoginRequest { email: "a@example.com".to_string(), password: "wrong password".to_string() };
        assert_eq!(auth.login(&users, wrong).await.err(), Some(AuthError::InvalidCredentials));

        let unknown = LoginRequest { email: "z@example.com".to_string(), password: "correct horse".to_string() };
        assert_eq!(auth.login(&users, unknown).await.err(), Some(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_an_error() {
        let auth = AuthService::new("secret", i64::MAX);
        let users = RecordStore::new();

        assert_eq!(
            auth.register(&users, register_req("a@example.com")).await.err(),
            Some(AuthError::TokenLifetime)
        );
    }

    #[tokio::test]
    async fn test_revocations_are_pruned_after_expiry() {
        let auth = AuthService::new("secret", 3600);
        let claims = |jti: &str, exp: i64| Claims {
            sub: "user-1".to_string(),
            email: "a@example.com".to_string(),
            iat: 0,
            exp,
            jti: jti.to_string(),
        };

        auth.revoke(&claims("first", 100), 0).await;
        auth.revoke(&claims("second", 200), 50).await;
        assert_eq!(auth.revoked_count().await, 2);

        // "first" has expired by now=150 and is dropped
        auth.revoke(&claims("third", 300), 150).await;
        assert_eq!(auth.revoked_count().await, 2);

        // Already-expired tokens are not recorded at all
        auth.revoke(&claims("stale", 120), 250).await;
        assert_eq!(auth.revoked_count().await, 1);
    }

    #[tokio::test]
    async fn test_token_expiry() {
        let auth = AuthService::new("secret", 60);
        let users = RecordStore::new();
        let resp = auth.register(&users, register_req("a@example.com")).await.unwrap();

        assert_eq!(
            auth.authenticate(&resp.access_token, resp.expires_at).await,
            Err(AuthError::Expired)
        );
    }
}
