//! Google OAuth client for the sign-in flow.
//!
//! The storefront runs the authorization-code flow against Google and then
//! hands the resulting ID token to the backend's `/api/auth/google-login`
//! endpoint, which verifies it and issues the usual bearer token. Google
//! never talks to the backend directly.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use crate::config::GoogleOAuthConfig;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Errors from the Google OAuth flow.
#[derive(Debug, thiserror::Error)]
pub enum GoogleOAuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google rejected the code exchange.
    #[error("Google token exchange failed ({status}): {body}")]
    Exchange { status: u16, body: String },

    /// The token response carried no ID token.
    #[error("Google token response missing id_token")]
    MissingIdToken,
}

/// Google's token endpoint response.
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    #[serde(default)]
    id_token: Option<String>,
}

/// Client for Google's OAuth 2.0 / `OpenID` Connect endpoints.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GoogleClient {
    /// Create a new Google OAuth client.
    #[must_use]
    pub fn new(config: &GoogleOAuthConfig) -> Self {
        Self {
            inner: Arc::new(GoogleClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_owned(),
            }),
        }
    }

    /// Build the authorization URL the shopper is redirected to.
    ///
    /// `state` is the CSRF token and `nonce` the `OpenID` replay guard;
    /// both must be validated on the callback.
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        format!(
            "{AUTHORIZATION_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&nonce={}",
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state),
            urlencoding::encode(nonce),
        )
    }

    /// Exchange an authorization code for an ID token.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange is rejected or the response has no
    /// `id_token`.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, GoogleOAuthError> {
        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.inner.client_id.as_str()),
                ("client_secret", self.inner.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleOAuthError::Exchange {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let token: GoogleTokenResponse = response.json().await?;
        token.id_token.ok_or(GoogleOAuthError::MissingIdToken)
    }
}

/// Extract the `nonce` claim from an ID token.
///
/// The backend verifies the token's signature against Google's keys; the
/// storefront only checks that the nonce matches the one it minted for
/// this session, so the payload is decoded without signature validation.
#[must_use]
pub fn id_token_nonce(id_token: &str) -> Option<String> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("nonce")?.as_str().map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_authorization_url_encodes_params() {
        let client = GoogleClient::new(&GoogleOAuthConfig {
            client_id: "abc 123".to_owned(),
            client_secret: SecretString::from("s3cr3t-value"),
        });

        let url = client.authorization_url(
            "https://shop.example/auth/google/callback",
            "st/ate",
            "non+ce",
        );

        assert!(url.starts_with(AUTHORIZATION_ENDPOINT));
        assert!(url.contains("client_id=abc%20123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fshop.example%2Fauth%2Fgoogle%2Fcallback"));
        assert!(url.contains("state=st%2Fate"));
        assert!(url.contains("nonce=non%2Bce"));
        assert!(url.contains("scope=openid%20email%20profile"));
    }

    fn fake_id_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_id_token_nonce_reads_the_claim() {
        let token = fake_id_token(&serde_json::json!({
            "sub": "10987",
            "email": "asha@velvetloom.example",
            "nonce": "n-1f9c"
        }));
        assert_eq!(id_token_nonce(&token).as_deref(), Some("n-1f9c"));
    }

    #[test]
    fn test_id_token_nonce_absent_or_malformed() {
        let no_nonce = fake_id_token(&serde_json::json!({ "sub": "10987" }));
        assert_eq!(id_token_nonce(&no_nonce), None);
        assert_eq!(id_token_nonce("not-a-jwt"), None);
        assert_eq!(id_token_nonce("a.!!!.c"), None);
    }
}
