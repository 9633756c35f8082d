use crate::config::ApiConfig;
use crate::error::AppError;
use crate::logging::SensitiveValue;
use crate::models::amadeus::TokenResponse;
use crate::oauth::types::AccessToken;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;

/// Refresh when the cached token has less than this many seconds left
const REFRESH_MARGIN_SECS: i64 = 60;

/// Client-credentials token manager
///
/// Exchanges a fixed client ID/secret pair for a bearer token and keeps it
/// until it is about to expire.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    timeout: Duration,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            cached: Mutex::new(None),
        }
    }

    /// Get a valid token, fetching a new one if none is cached or the cached
    /// one is expiring
    pub async fn get_valid_token(&self) -> Result<AccessToken, AppError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if !token.expires_within(now, REFRESH_MARGIN_SECS) {
                return Ok(token.clone());
            }
            tracing::info!(
                expires_in = token.expires_at - now,
                "Token expiring soon, refreshing"
            );
        }

        let token = self.fetch_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Perform one client-credentials exchange, bypassing the cache
    pub async fn fetch_token(&self) -> Result<AccessToken, AppError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        tracing::debug!(
            token_url = %self.token_url,
            client_id = %SensitiveValue::new(&self.client_id),
            "Requesting access token"
        );

        let response = self
            .client
            .post(&self.token_url)
            .timeout(self.timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::TokenFetch {
                status: None,
                message: format!("Token request failed: {}", e),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::TokenFetch {
                status: Some(status),
                message: error_text,
            });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| AppError::TokenFetch {
                status: Some(status),
                message: format!("Failed to parse token response: {}", e),
            })?;

        let token = AccessToken::from_response(token_response, Utc::now().timestamp());

        tracing::info!(
            access_token = %SensitiveValue::new(&token.access_token),
            expires_at = token.expires_at,
            "Access token obtained"
        );

        Ok(token)
    }
}
