//! HTTP client for the hosted GoTrue-style identity service.

use async_trait::async_trait;
use credview_core::{
    IdentityProvider, Principal, ProviderError, Result, SessionGrant, SessionTokens,
};
use serde::Deserialize;
use url::Url;

/// Client for the provider's REST auth API.
///
/// Validation always goes back to the service; nothing is decoded or cached
/// locally, so revocation takes effect on the next request.
pub struct GotrueProvider {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

/// User record as the provider returns it.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    user: Option<UserPayload>,
}

/// The provider is inconsistent about which field carries the error text.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorPayload {
    fn into_message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| "Authentication failed".to_string())
    }
}

impl From<UserPayload> for Principal {
    fn from(user: UserPayload) -> Self {
        Principal {
            id: user.id,
            email: user.email.unwrap_or_default(),
            name: user.user_metadata.full_name.or(user.user_metadata.name),
            avatar_url: user.user_metadata.avatar_url,
        }
    }
}

impl GotrueProvider {
    pub fn new(base_url: Url, anon_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ProviderError::transport)
    }

    /// POST to the token endpoint and normalize the response into a grant.
    async fn token_request(&self, grant_type: &str, body: serde_json::Value) -> Result<SessionGrant> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::transport)?;

        let status = response.status();
        if status.is_client_error() {
            let payload: ErrorPayload = response.json().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                message: payload.into_message(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::transport(format!(
                "token endpoint returned {status}"
            )));
        }

        let payload: TokenPayload = response.json().await.map_err(ProviderError::transport)?;
        let principal = payload.user.ok_or(ProviderError::MissingPrincipal)?.into();

        Ok(SessionGrant {
            principal,
            tokens: SessionTokens {
                access_token: payload.access_token,
                refresh_token: payload.refresh_token,
                expires_in: payload.expires_in,
            },
        })
    }
}

#[async_trait]
impl IdentityProvider for GotrueProvider {
    async fn authorize_url(&self, provider: &str, redirect_to: &Url) -> Result<Url> {
        let mut url = self.endpoint("/auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to.as_str());
        Ok(url)
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>> {
        let response = self
            .http
            .get(self.endpoint("/auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(ProviderError::transport)?;

        let status = response.status();
        if status.is_success() {
            let user: UserPayload = response.json().await.map_err(ProviderError::transport)?;
            return Ok(Some(user.into()));
        }
        // 401/403 means the provider examined the token and rejected it:
        // expired, revoked, or garbage. That is "no principal", not an error.
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        Err(ProviderError::transport(format!(
            "user endpoint returned {status}"
        )))
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionGrant> {
        self.token_request("pkce", serde_json::json!({ "auth_code": code }))
            .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionGrant> {
        self.token_request(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(ProviderError::transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::transport(format!(
                "logout endpoint returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_payload_prefers_error_description() {
        let payload = ErrorPayload {
            error_description: Some("Invalid code".to_string()),
            msg: Some("other".to_string()),
            message: None,
        };
        assert_eq!(payload.into_message(), "Invalid code");
    }

    #[test]
    fn error_payload_falls_back_to_generic_message() {
        assert_eq!(ErrorPayload::default().into_message(), "Authentication failed");
    }

    #[test]
    fn user_payload_maps_profile_metadata() {
        let payload: UserPayload = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "email": "a@b.com",
            "user_metadata": { "full_name": "Ada", "avatar_url": "http://img/a.png" }
        }))
        .unwrap();

        let principal = Principal::from(payload);
        assert_eq!(principal.id, "u-1");
        assert_eq!(principal.email, "a@b.com");
        assert_eq!(principal.name.as_deref(), Some("Ada"));
        assert_eq!(principal.avatar_url.as_deref(), Some("http://img/a.png"));
    }

    #[test]
    fn user_payload_tolerates_missing_metadata() {
        let payload: UserPayload =
            serde_json::from_value(serde_json::json!({ "id": "u-2" })).unwrap();

        let principal = Principal::from(payload);
        assert_eq!(principal.email, "");
        assert_eq!(principal.name, None);
    }

    #[tokio::test]
    async fn authorize_url_carries_provider_and_redirect() {
        let client = GotrueProvider::new(
            Url::parse("http://localhost:9999").unwrap(),
            "anon".to_string(),
        );

        let url = client
            .authorize_url(
                "google",
                &Url::parse("http://localhost:3000/auth/callback").unwrap(),
            )
            .await
            .unwrap();

        assert!(url.path().ends_with("/auth/v1/authorize"));
        let query = url.query().unwrap();
        assert!(query.contains("provider=google"));
        assert!(query.contains("redirect_to="));
    }
}
