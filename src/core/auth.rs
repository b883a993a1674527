use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::Credentials;
use crate::error::FaucetError;

/// Authenticated handle onto the streaming service: a bearer token plus
/// the HTTP client it was issued to.
#[derive(Debug, Clone)]
pub struct Session {
    pub bearer_token: String,
    pub http: Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges long-lived app credentials for a bearer token.
///
/// There is no retry: malformed or revoked credentials are a fatal
/// startup error surfaced to the caller.
pub struct StreamAuthenticator {
    credentials: Credentials,
    token_url: String,
}

impl StreamAuthenticator {
    pub fn new(credentials: Credentials, token_url: impl Into<String>) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
        }
    }

    pub async fn authenticate(&self) -> Result<Session, FaucetError> {
        let http = Client::new();

        let response = http
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.consumer_key,
                Some(&self.credentials.consumer_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| FaucetError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FaucetError::Auth(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FaucetError::Auth(format!("unreadable token response: {e}")))?;

        info!("stream authentication succeeded");

        Ok(Session {
            bearer_token: token.access_token,
            http,
        })
    }
}
