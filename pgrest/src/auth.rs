use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ErrorBody;
use crate::ServiceUrl;

/// Tokens are treated as expired this long before their actual expiry.
const EXPIRY_LEEWAY_SECS: i64 = 30;

/// A signed-in session issued by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which `access_token` is rejected.
    pub expires_at: Option<i64>,
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl Credentials {
    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in(
        url: &ServiceUrl,
        api_key: &str,
        email: &str,
        password: &str,
    ) -> Result<Credentials, AuthError> {
        request_token(url, api_key, "password", &PasswordGrant { email, password }).await
    }

    /// `POST /auth/v1/token?grant_type=refresh_token`
    pub async fn refresh(&self, url: &ServiceUrl, api_key: &str) -> Result<Credentials, AuthError> {
        request_token(
            url,
            api_key,
            "refresh_token",
            &RefreshGrant {
                refresh_token: &self.refresh_token,
            },
        )
        .await
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - EXPIRY_LEEWAY_SECS <= now.timestamp(),
            None => false,
        }
    }
}

async fn request_token(
    url: &ServiceUrl,
    api_key: &str,
    grant_type: &str,
    body: &impl Serialize,
) -> Result<Credentials, AuthError> {
    let token_url = url.auth("token").with_param("grant_type", grant_type);
    tracing::debug!("requesting token with grant_type={}", grant_type);

    let resp = reqwest::Client::new()
        .post(token_url.as_ref())
        .header("apikey", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| AuthError::Transport(format!("Failed to reach auth service: {}", e)))?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let message = ErrorBody::parse(&text)
            .message()
            .unwrap_or_else(|| format!("Auth service returned {}", status));
        return Err(AuthError::Rejected(message));
    }

    let token = resp
        .json::<TokenResponse>()
        .await
        .map_err(|e| AuthError::Decode(format!("Failed to parse token response: {}", e)))?;

    Ok(token.into_credentials(Utc::now()))
}

impl TokenResponse {
    fn into_credentials(self, issued_at: DateTime<Utc>) -> Credentials {
        let expires_at = self.expires_at.or_else(|| {
            self.expires_in
                .map(|secs| (issued_at + Duration::seconds(secs)).timestamp())
        });

        Credentials {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user_id: self.user.id,
            email: self.user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;
    use chrono::TimeZone;

    fn credentials(expires_at: Option<i64>) -> Credentials {
        Credentials {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user_id: "user-1".to_string(),
            email: None,
        }
    }

    #[test]
    fn expiry_applies_leeway() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let ts = now.timestamp();

        assert!(credentials(Some(ts)).is_expired(now));
        assert!(credentials(Some(ts + 10)).is_expired(now));
        assert!(!credentials(Some(ts + 3600)).is_expired(now));
        assert!(!credentials(None).is_expired(now));
    }

    #[test]
    fn expires_in_is_used_when_expires_at_is_missing() {
        let issued_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let token = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: None,
            expires_in: Some(3600),
            user: TokenUser {
                id: "u".to_string(),
                email: Some("me@example.com".to_string()),
            },
        };

        let creds = token.into_credentials(issued_at);
        assert_eq!(creds.expires_at, Some(issued_at.timestamp() + 3600));
        assert_eq!(creds.email.as_deref(), Some("me@example.com"));
    }

    #[tokio::test]
    async fn sign_in_reads_user_and_tokens() {
        let server = serve_once(
            200,
            r#"{"access_token":"jwt","token_type":"bearer","expires_in":3600,"expires_at":1740830400,"refresh_token":"rt","user":{"id":"5b1f","email":"me@example.com"}}"#,
        )
        .await;

        let creds = Credentials::sign_in(
            &ServiceUrl::new(&server.base_url),
            "anon-key",
            "me@example.com",
            "hunter2",
        )
        .await
        .unwrap();

        assert_eq!(creds.user_id, "5b1f");
        assert_eq!(creds.access_token, "jwt");
        assert_eq!(creds.refresh_token, "rt");
        assert_eq!(creds.expires_at, Some(1740830400));

        let request = server.request().await;
        assert!(request.starts_with("POST /auth/v1/token?grant_type=password HTTP/1.1"));
        assert!(request.contains(r#""email":"me@example.com""#));
    }

    #[tokio::test]
    async fn rejected_sign_in_carries_description() {
        let server = serve_once(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .await;

        let err = Credentials::sign_in(
            &ServiceUrl::new(&server.base_url),
            "anon-key",
            "me@example.com",
            "wrong",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid login credentials"));
    }
}
