pub mod firebase;

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

pub use firebase::{FirebaseAuthClient, FirebaseConfig};

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub id_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
}

/// The hosted authentication provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;
    /// A fresh identity token for `user`.
    async fn id_token(&self, user: &AuthUser) -> Result<String, AppError>;
}

/// Single fixed account, for running against the local SQLite store.
pub struct StaticIdentity {
    uid: String,
    password: Option<String>,
}

impl StaticIdentity {
    pub fn new(uid: impl Into<String>, password: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            password,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        if let Some(expected) = &self.password {
            if expected != password {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
        }
        Ok(AuthUser {
            uid: self.uid.clone(),
            email: Some(email.to_string()),
            id_token: uuid::Uuid::new_v4().to_string(),
            refresh_token: None,
        })
    }

    async fn id_token(&self, user: &AuthUser) -> Result<String, AppError> {
        Ok(user.id_token.clone())
    }
}

/// Ask the provider for a fresh token and wrap it in a site-wide session
/// cookie. No expiry is set, so it lasts for the browser session.
pub async fn set_session_cookie(
    provider: &dyn IdentityProvider,
    user: &AuthUser,
) -> Result<Cookie<'static>, AppError> {
    let token = provider.id_token(user).await?;
    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .secure(true)
        .same_site(SameSite::Strict)
        .build())
}

/// An already-expired `session` cookie that overwrites the current one.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}
