use crate::models::amadeus::TokenResponse;

/// Bearer token with its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Access token for API calls
    pub access_token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,
}

impl AccessToken {
    pub fn from_response(response: TokenResponse, now: i64) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at: now + response.expires_in,
        }
    }

    /// True when fewer than `margin_secs` seconds of validity remain
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - now < margin_secs
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
