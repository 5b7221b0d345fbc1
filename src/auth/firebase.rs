use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AuthUser, IdentityProvider};
use crate::error::AppError;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: String,
}

impl FirebaseConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let project_id = env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| AppError::Config("FIREBASE_PROJECT_ID is not set".to_string()))?;
        let api_key = env::var("FIREBASE_API_KEY")
            .map_err(|_| AppError::Config("FIREBASE_API_KEY is not set".to_string()))?;

        Ok(Self {
            project_id,
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
}

/// Firebase Authentication over its REST endpoints.
pub struct FirebaseAuthClient {
    client: Client,
    config: FirebaseConfig,
}

impl FirebaseAuthClient {
    pub fn new(config: FirebaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let url = format!(
            "{}/accounts:signInWithPassword?key={}",
            IDENTITY_TOOLKIT_URL, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("sign-in rejected: {} {}", status, body);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let body: SignInResponse = response.json().await?;
        debug!("signed in {} on project {}", body.local_id, self.config.project_id);

        Ok(AuthUser {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
        })
    }

    async fn id_token(&self, user: &AuthUser) -> Result<String, AppError> {
        let Some(refresh_token) = &user.refresh_token else {
            return Ok(user.id_token.clone());
        };
        let url = format!("{}/token?key={}", SECURE_TOKEN_URL, self.config.api_key);

        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Unauthorized(format!(
                "Token refresh failed: {} {}",
                status, body
            )));
        }

        let body: RefreshResponse = response.json().await?;
        Ok(body.id_token)
    }
}
